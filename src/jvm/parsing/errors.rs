//! Errors raised while decoding the byte stream of a single class file.
//!
//! A [`ParseError`] never aborts a scan by itself; the classpath walker catches it and turns it
//! into a [`crate::Diagnostic::Format`].

use thiserror::Error;

/// Something about a class file's byte stream did not conform to the format.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The class file ended before all expected structures were read.
    #[error("unexpected end of class file")]
    UnexpectedEof(#[from] std::io::Error),

    /// The first four bytes were not `0xCAFEBABE`.
    #[error("bad magic number {0:#010X}")]
    InvalidMagic(u32),

    /// The major class file version falls outside the range this decoder understands.
    #[error("unsupported class file major version {0}")]
    UnsupportedVersion(u16),

    /// A constant pool index pointed outside the pool, at slot zero, or at the upper half of a
    /// `Long`/`Double` entry.
    #[error("invalid constant pool index {0}")]
    InvalidConstantPoolIndex(u16),

    /// A constant pool index resolved to an entry of the wrong kind for its use site.
    #[error("constant pool entry at index {index} has the wrong kind, expected {expected}")]
    ConstantPoolEntryMismatch {
        /// The offending index.
        index: u16,
        /// What kind of entry was expected there.
        expected: &'static str,
    },

    /// A constant pool entry's tag byte did not match any defined `CONSTANT_*` tag.
    #[error("unrecognized constant pool tag {0}")]
    InvalidConstantPoolTag(u8),

    /// A `CONSTANT_Utf8` entry's bytes were not valid modified UTF-8.
    #[error("malformed modified UTF-8 in constant pool")]
    MalformedModifiedUtf8,

    /// An attribute's `attribute_length` did not match the bytes the decoder consumed for it.
    #[error("attribute {name} declared length {declared}, decoder consumed {consumed}")]
    AttributeLengthMismatch {
        /// The attribute's name.
        name: String,
        /// The length the attribute's header declared.
        declared: u32,
        /// The number of bytes actually consumed while decoding it.
        consumed: u32,
    },

    /// An attribute that may appear at most once on its owner appeared more than once.
    #[error("duplicate {0} attribute")]
    DuplicateAttribute(&'static str),

    /// A field or method descriptor did not parse as a valid JVM type or method descriptor.
    #[error("invalid descriptor {0:?}")]
    InvalidDescriptor(String),

    /// A generic signature string did not match the JVM signature grammar.
    #[error("invalid signature {signature:?}: {reason}")]
    InvalidSignature {
        /// The offending signature string.
        signature: String,
        /// Where and why the recursive-descent parser gave up.
        reason: String,
    },
}
