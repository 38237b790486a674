//! Recursive-descent parser for the generic signature grammar.

use std::iter::Peekable;
use std::str::Chars;

use crate::jvm::parsing::ParseError;
use crate::signature::ast::{
    ClassSignature, ClassTypeSignature, MethodSignature, PrimitiveType, ReturnType,
    SimpleClassTypeSignature, ThrowsSignature, TypeArgument, TypeParameter, TypeSignature,
};

/// Parses a `Signature` attribute's value as a class or interface declaration's signature.
pub fn parse_class_signature(input: &str) -> Result<ClassSignature, ParseError> {
    let mut parser = Parser::new(input);
    let signature = parser.class_signature()?;
    parser.expect_end()?;
    Ok(signature)
}

/// Parses a `Signature` attribute's value as a method declaration's signature.
pub fn parse_method_signature(input: &str) -> Result<MethodSignature, ParseError> {
    let mut parser = Parser::new(input);
    let signature = parser.method_signature()?;
    parser.expect_end()?;
    Ok(signature)
}

/// Parses a `Signature` attribute's value as a field declaration's signature.
pub fn parse_field_signature(input: &str) -> Result<TypeSignature, ParseError> {
    let mut parser = Parser::new(input);
    let signature = parser.reference_type_signature()?;
    parser.expect_end()?;
    Ok(signature)
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
        }
    }

    fn fail(&self, reason: impl Into<String>) -> ParseError {
        ParseError::InvalidSignature {
            signature: self.input.to_owned(),
            reason: reason.into(),
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.chars.peek().is_some() {
            return Err(self.fail("trailing characters after a complete signature"));
        }
        Ok(())
    }

    fn bump(&mut self) -> Result<char, ParseError> {
        self.chars.next().ok_or_else(|| self.fail("unexpected end of signature"))
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump()? {
            c if c == expected => Ok(()),
            c => Err(self.fail(format!("expected '{expected}', found '{c}'"))),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// An `Identifier`: any run of characters other than `.;[/<>:`.
    fn identifier(&mut self) -> Result<String, ParseError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, '.' | ';' | '[' | '/' | '<' | '>' | ':') {
                break;
            }
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.fail("expected an identifier"));
        }
        Ok(ident)
    }

    fn class_signature(&mut self) -> Result<ClassSignature, ParseError> {
        let type_parameters = self.optional_type_parameters()?;
        let superclass = self.class_type_signature()?;
        let mut superinterfaces = Vec::new();
        while self.peek() == Some('L') {
            superinterfaces.push(self.class_type_signature()?);
        }
        Ok(ClassSignature {
            type_parameters,
            superclass,
            superinterfaces,
        })
    }

    fn method_signature(&mut self) -> Result<MethodSignature, ParseError> {
        let type_parameters = self.optional_type_parameters()?;
        self.expect('(')?;
        let mut parameters = Vec::new();
        while self.peek() != Some(')') {
            parameters.push(self.java_type_signature()?);
        }
        self.expect(')')?;
        let return_type = if self.peek() == Some('V') {
            self.chars.next();
            ReturnType::Void
        } else {
            ReturnType::Type(self.java_type_signature()?)
        };
        let mut throws = Vec::new();
        while self.peek() == Some('^') {
            self.chars.next();
            throws.push(if self.peek() == Some('T') {
                ThrowsSignature::Variable(self.type_variable_name()?)
            } else {
                ThrowsSignature::Class(self.class_type_signature()?)
            });
        }
        Ok(MethodSignature {
            type_parameters,
            parameters,
            return_type,
            throws,
        })
    }

    fn optional_type_parameters(&mut self) -> Result<Vec<TypeParameter>, ParseError> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        self.chars.next();
        let mut parameters = Vec::new();
        while self.peek() != Some('>') {
            parameters.push(self.type_parameter()?);
        }
        self.expect('>')?;
        Ok(parameters)
    }

    fn type_parameter(&mut self) -> Result<TypeParameter, ParseError> {
        let name = self.identifier()?;
        self.expect(':')?;
        let class_bound = if self.peek() == Some(':') {
            None
        } else {
            Some(self.reference_type_signature()?)
        };
        let mut interface_bounds = Vec::new();
        while self.peek() == Some(':') {
            self.chars.next();
            interface_bounds.push(self.reference_type_signature()?);
        }
        Ok(TypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
    }

    fn java_type_signature(&mut self) -> Result<TypeSignature, ParseError> {
        match self.peek() {
            Some(c) if PrimitiveType::from_descriptor_char(c).is_some() => {
                self.chars.next();
                Ok(TypeSignature::Base(PrimitiveType::from_descriptor_char(c).unwrap()))
            }
            _ => self.reference_type_signature(),
        }
    }

    fn reference_type_signature(&mut self) -> Result<TypeSignature, ParseError> {
        match self.peek() {
            Some('L') => Ok(TypeSignature::Class(self.class_type_signature()?)),
            Some('T') => Ok(TypeSignature::Variable(self.type_variable_name()?)),
            Some('[') => {
                self.chars.next();
                Ok(TypeSignature::Array(Box::new(self.java_type_signature()?)))
            }
            Some(c) => Err(self.fail(format!("expected a reference type, found '{c}'"))),
            None => Err(self.fail("expected a reference type, found end of signature")),
        }
    }

    fn type_variable_name(&mut self) -> Result<String, ParseError> {
        self.expect('T')?;
        let name = self.identifier()?;
        self.expect(';')?;
        Ok(name)
    }

    fn class_type_signature(&mut self) -> Result<ClassTypeSignature, ParseError> {
        self.expect('L')?;
        let mut segments = vec![self.identifier()?];
        while self.peek() == Some('/') {
            self.chars.next();
            segments.push(self.identifier()?);
        }
        let (package, first_simple_name) = match segments.split_last() {
            Some((last, init)) if !init.is_empty() => (Some(init.join(".")), last.clone()),
            Some((last, _)) => (None, last.clone()),
            None => unreachable!("identifier() never yields an empty segment"),
        };

        let mut path = vec![SimpleClassTypeSignature {
            name: first_simple_name,
            type_arguments: self.optional_type_arguments()?,
        }];
        while self.peek() == Some('.') {
            self.chars.next();
            let name = self.identifier()?;
            let type_arguments = self.optional_type_arguments()?;
            path.push(SimpleClassTypeSignature { name, type_arguments });
        }
        self.expect(';')?;
        Ok(ClassTypeSignature { package, path })
    }

    fn optional_type_arguments(&mut self) -> Result<Vec<TypeArgument>, ParseError> {
        if self.peek() != Some('<') {
            return Ok(Vec::new());
        }
        self.chars.next();
        let mut arguments = Vec::new();
        while self.peek() != Some('>') {
            arguments.push(self.type_argument()?);
        }
        self.expect('>')?;
        Ok(arguments)
    }

    fn type_argument(&mut self) -> Result<TypeArgument, ParseError> {
        match self.peek() {
            Some('*') => {
                self.chars.next();
                Ok(TypeArgument::Wildcard)
            }
            Some('+') => {
                self.chars.next();
                Ok(TypeArgument::Extends(self.reference_type_signature()?))
            }
            Some('-') => {
                self.chars.next();
                Ok(TypeArgument::Super(self.reference_type_signature()?))
            }
            _ => Ok(TypeArgument::Exact(self.reference_type_signature()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_superclass_and_interface() {
        let sig = parse_class_signature("Ljava/lang/Object;Ljava/io/Serializable;").unwrap();
        assert_eq!(sig.superclass.binary_name(), "java.lang.Object");
        assert_eq!(sig.superinterfaces.len(), 1);
        assert_eq!(sig.superinterfaces[0].binary_name(), "java.io.Serializable");
    }

    #[test]
    fn parses_generic_superclass_with_type_parameters() {
        let sig = parse_class_signature(
            "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TT;>;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters.len(), 1);
        assert_eq!(sig.type_parameters[0].name, "T");
        assert_eq!(sig.superinterfaces[0].binary_name(), "java.util.List");
    }

    #[test]
    fn parses_nested_class_suffix() {
        let sig = parse_field_signature("Ljava/util/Map<Ljava/lang/String;Ljava/lang/Integer;>.Entry;").unwrap();
        match sig {
            TypeSignature::Class(class_type) => {
                assert_eq!(class_type.path.len(), 2);
                assert_eq!(class_type.path[1].name, "Entry");
            }
            other => panic!("expected a class type, got {other:?}"),
        }
    }

    #[test]
    fn parses_wildcards() {
        let sig = parse_field_signature("Ljava/util/List<+Ljava/lang/Number;>;").unwrap();
        match sig {
            TypeSignature::Class(class_type) => {
                assert_eq!(class_type.path[0].type_arguments.len(), 1);
                assert!(matches!(class_type.path[0].type_arguments[0], TypeArgument::Extends(_)));
            }
            other => panic!("expected a class type, got {other:?}"),
        }
    }

    #[test]
    fn parses_method_signature_with_throws() {
        let sig = parse_method_signature("<T:Ljava/lang/Exception;>(I)V^TT;").unwrap();
        assert_eq!(sig.type_parameters.len(), 1);
        assert_eq!(sig.parameters, vec![TypeSignature::Base(PrimitiveType::Int)]);
        assert_eq!(sig.return_type, ReturnType::Void);
        assert_eq!(sig.throws, vec![ThrowsSignature::Variable("T".to_owned())]);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse_field_signature("Ljava/lang/Object;extra").is_err());
    }

    #[test]
    fn rejects_truncated_signature() {
        assert!(parse_field_signature("Ljava/lang/Object").is_err());
    }
}
