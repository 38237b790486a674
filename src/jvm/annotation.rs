//! Annotation value model, decoded from `RuntimeVisibleAnnotations` and friends.

use crate::jvm::fact::ConstantValue;

/// One `@Annotation(...)` occurrence, with its element-value pairs in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// The annotation interface's dotted binary name.
    pub type_name: String,
    /// `(element name, value)` pairs, in the order they appear in the class file.
    pub elements: Vec<(String, ElementValue)>,
}

/// The value of one annotation element, per JVM spec §4.7.16.1.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// A primitive or `String` constant.
    Const(ConstantValue),
    /// An enum constant, given as `(enum type descriptor, constant name)`.
    Enum {
        /// The enum type's descriptor, e.g. `Ljava/time/DayOfWeek;`.
        type_descriptor: String,
        /// The enum constant's name.
        const_name: String,
    },
    /// A `Class` literal, given as its raw type descriptor (`V` is used for `void.class`).
    ClassLiteral(String),
    /// A nested annotation.
    Annotation(Box<Annotation>),
    /// An array of element values.
    Array(Vec<ElementValue>),
}
