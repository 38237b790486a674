//! The generic signature grammar's abstract syntax, per JVM spec §4.7.9.1.

/// A JVM primitive type, as it appears inside a signature or a plain descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// `byte`.
    Byte,
    /// `char`.
    Char,
    /// `double`.
    Double,
    /// `float`.
    Float,
    /// `int`.
    Int,
    /// `long`.
    Long,
    /// `short`.
    Short,
    /// `boolean`.
    Boolean,
}

impl PrimitiveType {
    pub(crate) fn from_descriptor_char(c: char) -> Option<Self> {
        Some(match c {
            'B' => Self::Byte,
            'C' => Self::Char,
            'D' => Self::Double,
            'F' => Self::Float,
            'I' => Self::Int,
            'J' => Self::Long,
            'S' => Self::Short,
            'Z' => Self::Boolean,
            _ => return None,
        })
    }

    pub(crate) fn descriptor_char(self) -> char {
        match self {
            Self::Byte => 'B',
            Self::Char => 'C',
            Self::Double => 'D',
            Self::Float => 'F',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Short => 'S',
            Self::Boolean => 'Z',
        }
    }
}

/// One segment of a (possibly nested) class type, e.g. the `Entry<K, V>` in
/// `Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleClassTypeSignature {
    /// The segment's simple name.
    pub name: String,
    /// Its type arguments, empty if it is raw or non-generic.
    pub type_arguments: Vec<TypeArgument>,
}

/// A reference to a (possibly generic, possibly nested) class or interface type.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTypeSignature {
    /// The dotted package prefix, e.g. `java.util`. `None` for the unnamed package.
    pub package: Option<String>,
    /// The outer-to-inner chain of simple class type segments.
    pub path: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// The dotted binary name formed by joining the package and the outer-to-inner simple
    /// names with `.`, ignoring type arguments — e.g. `java.util.Map.Entry`.
    #[must_use]
    pub fn binary_name(&self) -> String {
        let segments = self.path.iter().map(|s| s.name.as_str());
        match &self.package {
            Some(package) => std::iter::once(package.as_str()).chain(segments).collect::<Vec<_>>().join("."),
            None => segments.collect::<Vec<_>>().join("."),
        }
    }
}

/// One type argument inside `< ... >`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeArgument {
    /// A plain type argument, e.g. `List<String>`'s `String`.
    Exact(TypeSignature),
    /// An upper-bounded wildcard, `? extends T`.
    Extends(TypeSignature),
    /// A lower-bounded wildcard, `? super T`.
    Super(TypeSignature),
    /// An unbounded wildcard, `?`.
    Wildcard,
}

/// A field-position generic type: a class type, an array, a type variable, or a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSignature {
    /// A primitive type (only appears inside method signatures, never as a field signature).
    Base(PrimitiveType),
    /// A class or interface type.
    Class(ClassTypeSignature),
    /// An array type, `component[]`.
    Array(Box<TypeSignature>),
    /// A reference to a type parameter in scope.
    Variable(String),
}

/// One declared type parameter, e.g. the `T extends Number & Comparable<T>` in `class Box<T ...>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    /// The type variable's name.
    pub name: String,
    /// The class bound, if present (absent only when there are interface bounds and no class
    /// bound, per the grammar's optional `ClassBound`).
    pub class_bound: Option<TypeSignature>,
    /// Zero or more interface bounds.
    pub interface_bounds: Vec<TypeSignature>,
}

impl TypeParameter {
    /// This type parameter's first declared bound — the class bound if present, otherwise its
    /// first interface bound. `None` when neither is present, meaning the implicit bound
    /// `java.lang.Object` applies.
    #[must_use]
    pub fn first_bound(&self) -> Option<&TypeSignature> {
        self.class_bound.as_ref().or_else(|| self.interface_bounds.first())
    }
}

fn object_type() -> TypeSignature {
    TypeSignature::Class(ClassTypeSignature {
        package: Some("java.lang".to_owned()),
        path: vec![SimpleClassTypeSignature {
            name: "Object".to_owned(),
            type_arguments: Vec::new(),
        }],
    })
}

/// Resolves `variable_name` against `type_parameters` to a concrete (non-`Variable`) bound,
/// following a chain of type-variable-bounded-by-type-variable references (e.g. `<T, U extends
/// T>`) until a class, array, or primitive bound is reached, or `java.lang.Object` is assumed by
/// default. Returns `None` only when `variable_name` does not name any declared type parameter.
///
/// Guards against a self-referential or circular bound (which the grammar permits but no real
/// class file should declare) by capping the chase at the number of declared type parameters —
/// one more hop than any acyclic chain could need.
#[must_use]
pub fn resolve_bound(variable_name: &str, type_parameters: &[TypeParameter]) -> Option<TypeSignature> {
    let mut current = type_parameters.iter().find(|p| p.name == variable_name)?;
    for _ in 0..=type_parameters.len() {
        match current.first_bound() {
            None => return Some(object_type()),
            Some(TypeSignature::Variable(next_name)) => {
                match type_parameters.iter().find(|p| &p.name == next_name) {
                    Some(next) => current = next,
                    None => return Some(object_type()),
                }
            }
            Some(bound) => return Some(bound.clone()),
        }
    }
    // A cycle: every type parameter in the chain bounds some other, never bottoming out.
    Some(object_type())
}

/// A class or interface declaration's generic signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSignature {
    /// Type parameters declared by the class itself.
    pub type_parameters: Vec<TypeParameter>,
    /// The generic superclass.
    pub superclass: ClassTypeSignature,
    /// The generic superinterfaces, in declaration order.
    pub superinterfaces: Vec<ClassTypeSignature>,
}

impl ClassSignature {
    /// Resolves a `TypeSignature::Variable(name)` appearing anywhere in this signature to its
    /// declared (or implicit `java.lang.Object`) bound. See [`resolve_bound`].
    #[must_use]
    pub fn resolve_bound(&self, variable_name: &str) -> Option<TypeSignature> {
        resolve_bound(variable_name, &self.type_parameters)
    }
}

/// A method's return type: `void`, or an ordinary type.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnType {
    /// `void`.
    Void,
    /// Any other return type.
    Type(TypeSignature),
}

/// One entry of a method's `throws` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ThrowsSignature {
    /// A checked exception class type.
    Class(ClassTypeSignature),
    /// A type variable bounded by an exception type.
    Variable(String),
}

/// A method declaration's generic signature.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    /// Type parameters declared by the method itself.
    pub type_parameters: Vec<TypeParameter>,
    /// The formal parameter types, in declaration order.
    pub parameters: Vec<TypeSignature>,
    /// The return type.
    pub return_type: ReturnType,
    /// The `throws` clause, in declaration order.
    pub throws: Vec<ThrowsSignature>,
}

impl MethodSignature {
    /// Resolves a `TypeSignature::Variable(name)` appearing anywhere in this signature to its
    /// declared (or implicit `java.lang.Object`) bound. See [`resolve_bound`].
    #[must_use]
    pub fn resolve_bound(&self, variable_name: &str) -> Option<TypeSignature> {
        resolve_bound(variable_name, &self.type_parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_bound(name: &str) -> TypeSignature {
        TypeSignature::Class(ClassTypeSignature {
            package: Some("com.example".to_owned()),
            path: vec![SimpleClassTypeSignature {
                name: name.to_owned(),
                type_arguments: Vec::new(),
            }],
        })
    }

    #[test]
    fn resolves_declared_class_bound() {
        let params = vec![TypeParameter {
            name: "T".to_owned(),
            class_bound: Some(class_bound("Number")),
            interface_bounds: Vec::new(),
        }];
        assert_eq!(resolve_bound("T", &params), Some(class_bound("Number")));
    }

    #[test]
    fn falls_back_to_first_interface_bound_when_no_class_bound() {
        let params = vec![TypeParameter {
            name: "T".to_owned(),
            class_bound: None,
            interface_bounds: vec![class_bound("Comparable")],
        }];
        assert_eq!(resolve_bound("T", &params), Some(class_bound("Comparable")));
    }

    #[test]
    fn unbounded_variable_resolves_to_object() {
        let params = vec![TypeParameter {
            name: "T".to_owned(),
            class_bound: None,
            interface_bounds: Vec::new(),
        }];
        assert_eq!(resolve_bound("T", &params), Some(object_type()));
    }

    #[test]
    fn follows_a_variable_bound_by_another_variable() {
        // <T, U extends T extends Number>
        let params = vec![
            TypeParameter {
                name: "T".to_owned(),
                class_bound: Some(class_bound("Number")),
                interface_bounds: Vec::new(),
            },
            TypeParameter {
                name: "U".to_owned(),
                class_bound: Some(TypeSignature::Variable("T".to_owned())),
                interface_bounds: Vec::new(),
            },
        ];
        assert_eq!(resolve_bound("U", &params), Some(class_bound("Number")));
    }

    #[test]
    fn unknown_variable_name_resolves_to_none() {
        let params = vec![TypeParameter {
            name: "T".to_owned(),
            class_bound: None,
            interface_bounds: Vec::new(),
        }];
        assert_eq!(resolve_bound("U", &params), None);
    }

    #[test]
    fn circular_variable_bound_falls_back_to_object_instead_of_looping() {
        // Not producible by a real compiler, but the grammar permits it; must not hang.
        let params = vec![
            TypeParameter {
                name: "T".to_owned(),
                class_bound: Some(TypeSignature::Variable("U".to_owned())),
                interface_bounds: Vec::new(),
            },
            TypeParameter {
                name: "U".to_owned(),
                class_bound: Some(TypeSignature::Variable("T".to_owned())),
                interface_bounds: Vec::new(),
            },
        ];
        assert_eq!(resolve_bound("T", &params), Some(object_type()));
    }
}
