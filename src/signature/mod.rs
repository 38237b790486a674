//! Generic signature parsing: the `Signature` attribute's grammar, independent of class file
//! decoding proper.

pub mod ast;
mod display;
pub mod parser;

pub use ast::{
    resolve_bound, ClassSignature, ClassTypeSignature, MethodSignature, PrimitiveType, ReturnType,
    SimpleClassTypeSignature, ThrowsSignature, TypeArgument, TypeParameter, TypeSignature,
};
pub use parser::{parse_class_signature, parse_field_signature, parse_method_signature};
