//! Renders the signature AST back into the JVM's textual grammar, so that
//! `parse(x).to_string() == x` for any well-formed `x`.

use std::fmt;

use crate::signature::ast::{
    ClassSignature, ClassTypeSignature, MethodSignature, PrimitiveType, ReturnType,
    SimpleClassTypeSignature, ThrowsSignature, TypeArgument, TypeParameter, TypeSignature,
};

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor_char())
    }
}

impl fmt::Display for SimpleClassTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        write_type_arguments(f, &self.type_arguments)
    }
}

fn write_type_arguments(f: &mut fmt::Formatter<'_>, arguments: &[TypeArgument]) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    write!(f, "<")?;
    for argument in arguments {
        write!(f, "{argument}")?;
    }
    write!(f, ">")
}

impl fmt::Display for ClassTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L")?;
        if let Some(package) = &self.package {
            write!(f, "{}/", package.replace('.', "/"))?;
        }
        let mut segments = self.path.iter();
        if let Some(first) = segments.next() {
            write!(f, "{first}")?;
        }
        for segment in segments {
            write!(f, ".{segment}")?;
        }
        write!(f, ";")
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(t) => write!(f, "{t}"),
            Self::Extends(t) => write!(f, "+{t}"),
            Self::Super(t) => write!(f, "-{t}"),
            Self::Wildcard => write!(f, "*"),
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(p) => write!(f, "{p}"),
            Self::Class(c) => write!(f, "{c}"),
            Self::Array(component) => write!(f, "[{component}"),
            Self::Variable(name) => write!(f, "T{name};"),
        }
    }
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if let Some(bound) = &self.class_bound {
            write!(f, "{bound}")?;
        }
        for bound in &self.interface_bounds {
            write!(f, ":{bound}")?;
        }
        Ok(())
    }
}

fn write_type_parameters(f: &mut fmt::Formatter<'_>, parameters: &[TypeParameter]) -> fmt::Result {
    if parameters.is_empty() {
        return Ok(());
    }
    write!(f, "<")?;
    for parameter in parameters {
        write!(f, "{parameter}")?;
    }
    write!(f, ">")
}

impl fmt::Display for ClassSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type_parameters(f, &self.type_parameters)?;
        write!(f, "{}", self.superclass)?;
        for interface in &self.superinterfaces {
            write!(f, "{interface}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "V"),
            Self::Type(t) => write!(f, "{t}"),
        }
    }
}

impl fmt::Display for ThrowsSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "^{c}"),
            Self::Variable(name) => write!(f, "^T{name};"),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type_parameters(f, &self.type_parameters)?;
        write!(f, "(")?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, ")")?;
        write!(f, "{}", self.return_type)?;
        for throws in &self.throws {
            write!(f, "{throws}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::signature::parser::{parse_class_signature, parse_field_signature, parse_method_signature};

    #[test]
    fn round_trips_class_signature() {
        let text = "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TT;>;";
        let sig = parse_class_signature(text).unwrap();
        assert_eq!(sig.to_string(), text);
    }

    #[test]
    fn round_trips_nested_class_with_wildcard() {
        let text = "Ljava/util/Map<+Ljava/lang/Number;-Ljava/lang/Integer;>.Entry;";
        let sig = parse_field_signature(text).unwrap();
        assert_eq!(sig.to_string(), text);
    }

    #[test]
    fn round_trips_method_signature() {
        let text = "<T:Ljava/lang/Exception;>(I)V^TT;";
        let sig = parse_method_signature(text).unwrap();
        assert_eq!(sig.to_string(), text);
    }
}
