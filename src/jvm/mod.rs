//! JVM class file decoding: constant pool, access flags, annotations, and the fact types the
//! rest of the crate builds its hierarchy graph from.

pub mod access_flags;
pub mod annotation;
pub mod constant_pool;
pub mod fact;
pub mod parsing;
