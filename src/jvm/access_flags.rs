//! Access-flag bitmasks, as read directly from the class file.

use bitflags::bitflags;

bitflags! {
    /// The `access_flags` of a `ClassFile` structure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassAccessFlags: u16 {
        /// Declared `public`.
        const PUBLIC = 0x0001;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by `invokespecial`.
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`.
        const ABSTRACT = 0x0400;
        /// Declared synthetic, not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an `enum` class.
        const ENUM = 0x4000;
        /// Is a module, not a class or interface.
        const MODULE = 0x8000;
    }

    /// The `access_flags` of a `field_info` structure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldAccessFlags: u16 {
        /// Declared `public`.
        const PUBLIC = 0x0001;
        /// Declared `private`.
        const PRIVATE = 0x0002;
        /// Declared `protected`.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Declared `volatile`.
        const VOLATILE = 0x0040;
        /// Declared `transient`.
        const TRANSIENT = 0x0080;
        /// Declared synthetic, not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an `enum` class.
        const ENUM = 0x4000;
    }

    /// The `access_flags` of a `method_info` structure.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodAccessFlags: u16 {
        /// Declared `public`.
        const PUBLIC = 0x0001;
        /// Declared `private`.
        const PRIVATE = 0x0002;
        /// Declared `protected`.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Declared `synchronized`.
        const SYNCHRONIZED = 0x0020;
        /// A bridge method generated by the compiler.
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments.
        const VARARGS = 0x0080;
        /// Declared `native`.
        const NATIVE = 0x0100;
        /// Declared `abstract`.
        const ABSTRACT = 0x0400;
        /// Declared `strictfp`.
        const STRICT = 0x0800;
        /// Declared synthetic, not present in the source code.
        const SYNTHETIC = 0x1000;
    }

    /// The `access_flags` of a `parameter` entry in a `MethodParameters` attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParameterAccessFlags: u16 {
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Declared synthetic, not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Implicitly declared in the source code.
        const MANDATED = 0x8000;
    }

    /// The `inner_class_access_flags` of one `InnerClasses` entry. As declared at the source, not
    /// as it would appear on the inner class's own `ClassFile` (a private nested class still
    /// carries `ClassAccessFlags::PUBLIC` on its own `access_flags`, since the source-level
    /// `private` only exists here).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NestedClassAccessFlags: u16 {
        /// Declared `public`.
        const PUBLIC = 0x0001;
        /// Declared `private`.
        const PRIVATE = 0x0002;
        /// Declared `protected`.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`.
        const ABSTRACT = 0x0400;
        /// Declared synthetic, not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an `enum` class.
        const ENUM = 0x4000;
    }
}

impl ClassAccessFlags {
    /// Determines the [`crate::jvm::fact::ClassKind`] implied by this bitmask.
    #[must_use]
    pub fn kind(self) -> crate::jvm::fact::ClassKind {
        use crate::jvm::fact::ClassKind;
        if self.contains(Self::ANNOTATION) {
            ClassKind::Annotation
        } else if self.contains(Self::INTERFACE) {
            ClassKind::Interface
        } else if self.contains(Self::ENUM) {
            ClassKind::Enum
        } else {
            ClassKind::Class
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::fact::ClassKind;

    #[test]
    fn annotation_implies_annotation_kind_even_with_interface_bit() {
        let flags = ClassAccessFlags::INTERFACE | ClassAccessFlags::ANNOTATION;
        assert_eq!(flags.kind(), ClassKind::Annotation);
    }

    #[test]
    fn plain_interface_bit_is_interface_kind() {
        assert_eq!(ClassAccessFlags::INTERFACE.kind(), ClassKind::Interface);
    }

    #[test]
    fn enum_bit_is_enum_kind() {
        assert_eq!(ClassAccessFlags::ENUM.kind(), ClassKind::Enum);
    }

    #[test]
    fn no_distinguishing_bit_is_class_kind() {
        assert_eq!(
            (ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL).kind(),
            ClassKind::Class
        );
    }
}
