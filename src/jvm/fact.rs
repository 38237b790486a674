//! The per-classfile record emitted by the decoder and consumed by the hierarchy graph.

use crate::jvm::access_flags::{
    ClassAccessFlags, FieldAccessFlags, MethodAccessFlags, NestedClassAccessFlags,
    ParameterAccessFlags,
};

/// What kind of type declaration a [`ClassFact`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// An ordinary class.
    Class,
    /// An interface. Annotation interfaces are reported as [`Self::Annotation`] instead.
    Interface,
    /// An annotation interface.
    Annotation,
    /// An `enum` class.
    Enum,
}

impl ClassKind {
    /// Whether classes of this kind participate in the interface graph rather than the class
    /// graph.
    #[must_use]
    pub fn is_interface_like(self) -> bool {
        matches!(self, Self::Interface | Self::Annotation)
    }
}

/// A literal constant, as recorded by a field's `ConstantValue` attribute or decoded from an
/// annotation element.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// An `int` (or `boolean`/`byte`/`char`/`short`, which share the `I` descriptor slot).
    Integer(i32),
    /// A `long`.
    Long(i64),
    /// A `float`.
    Float(f32),
    /// A `double`.
    Double(f64),
    /// A `String` literal (already decoded from modified UTF-8).
    String(String),
}

/// One parameter of a [`MethodFact`], as recorded by `MethodParameters` and the parameter
/// annotation attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterFact {
    /// The parameter's name, if `MethodParameters` was present and enabled.
    pub name: Option<String>,
    /// The parameter's modifiers.
    pub access_flags: ParameterAccessFlags,
    /// Annotation type names declared directly on this parameter.
    pub annotations: Vec<String>,
}

/// A field declared by a class or interface (optional section, gated by
/// `enable_field_info`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFact {
    /// The field's simple name.
    pub name: String,
    /// The raw JVM type descriptor, e.g. `I` or `Ljava/lang/String;`.
    pub descriptor: String,
    /// The raw generic field signature, if present and `Signature` parsing is requested.
    pub signature: Option<String>,
    /// The field's modifiers.
    pub access_flags: FieldAccessFlags,
    /// Annotation type names declared on this field.
    pub annotations: Vec<String>,
    /// The field's `ConstantValue`, if it is a compile-time constant primitive or `String`.
    pub constant_value: Option<ConstantValue>,
}

/// A method declared by a class or interface (optional section, gated by
/// `enable_method_info`).
#[derive(Debug, Clone, PartialEq)]
pub struct MethodFact {
    /// The method's simple name (`<init>` and `<clinit>` included).
    pub name: String,
    /// The raw JVM method descriptor, e.g. `(I)V`.
    pub descriptor: String,
    /// The raw generic method signature, if present and `Signature` parsing is requested.
    pub signature: Option<String>,
    /// The method's modifiers.
    pub access_flags: MethodAccessFlags,
    /// Per-parameter facts, populated from `MethodParameters` and the parameter-annotation
    /// attributes when enabled.
    pub parameters: Vec<ParameterFact>,
    /// Annotation type names declared on this method.
    pub annotations: Vec<String>,
    /// Checked-exception class names declared in an `Exceptions` attribute.
    pub exceptions: Vec<String>,
}

/// One member listed in a class's `InnerClasses` attribute: a class or interface (not necessarily
/// this one) that is a member of another.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerClassFact {
    /// The inner class's own dotted binary name.
    pub inner_name: String,
    /// The enclosing class's dotted binary name, absent for a local or anonymous class.
    pub outer_name: Option<String>,
    /// The inner class's simple name as declared in source, absent for an anonymous class.
    pub inner_simple_name: Option<String>,
    /// The inner class's source-level modifiers.
    pub access_flags: NestedClassAccessFlags,
}

/// An `EnclosingMethod` attribute: identifies the method or constructor that immediately encloses
/// a local or anonymous class.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethodFact {
    /// The dotted binary name of the innermost enclosing class.
    pub class_name: String,
    /// The enclosing method's name, absent when the class isn't enclosed by a method body (e.g.
    /// a field initializer or instance initializer).
    pub method_name: Option<String>,
    /// The enclosing method's raw descriptor, present iff `method_name` is.
    pub method_descriptor: Option<String>,
}

/// The fully decoded, queryable content of one class file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFact {
    /// The fully qualified, dotted binary name, e.g. `com.example.Widget`.
    pub binary_name: String,
    /// The kind of type declaration.
    pub kind: ClassKind,
    /// The raw access-flag bitmask.
    pub access_flags: ClassAccessFlags,
    /// The direct superclass's dotted name. Absent for interfaces and for `java.lang.Object`.
    pub super_name: Option<String>,
    /// Directly declared superinterfaces' dotted names, in declaration order, deduplicated.
    pub interfaces: Vec<String>,
    /// Declared annotation type names (dotted), runtime-visible plus optionally
    /// runtime-invisible per `include_runtime_invisible_annotations`.
    pub annotations: Vec<String>,
    /// The raw generic class signature, if present and `Signature` parsing is requested.
    pub signature: Option<String>,
    /// Declared fields, if `enable_field_info` was set.
    pub fields: Option<Vec<FieldFact>>,
    /// Declared methods, if `enable_method_info` was set.
    pub methods: Option<Vec<MethodFact>>,
    /// The method or constructor lexically enclosing this class, if it is local or anonymous.
    pub enclosing_method: Option<EnclosingMethodFact>,
    /// Nested-class membership entries from this class's `InnerClasses` attribute, in declaration
    /// order. Includes entries for classes other than this one (siblings and ancestors), exactly
    /// as the class file records them.
    pub inner_classes: Vec<InnerClassFact>,
    /// Index of the classpath root this fact was decoded from, used to resolve shadowing.
    /// Filled in by the classpath walker, not by the decoder itself.
    pub root_index: usize,
}

impl ClassFact {
    /// Deduplicates `interfaces` while preserving first-occurrence order.
    pub(crate) fn dedup_interfaces_preserving_order(interfaces: Vec<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::with_capacity(interfaces.len());
        interfaces
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }
}
