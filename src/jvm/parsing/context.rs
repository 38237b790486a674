//! Knobs that control how much of a class file the decoder bothers to extract.
//!
//! These mirror [`crate::config::ScanConfig`]'s corresponding fields; the scan driver threads a
//! `DecodeOptions` through to every call of [`super::class_file::decode_class`] rather than
//! having the decoder reach back into the config type.

/// Which optional sections of a class file to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode and keep each class's declared fields.
    pub enable_field_info: bool,
    /// Decode and keep each class's declared methods.
    pub enable_method_info: bool,
    /// Also decode `RuntimeInvisibleAnnotations` (and the parameter/field equivalents), not just
    /// the runtime-visible ones.
    pub include_runtime_invisible_annotations: bool,
    /// Decode class-, field-, and method-level annotation type names at all. When `false`,
    /// annotation lists are always empty and the underlying attributes aren't even parsed.
    pub enable_annotation_info: bool,
    /// Decode `static final` constant values (`ConstantValue` attributes) on fields.
    pub enable_static_final_constants: bool,
    /// Include fields regardless of visibility. When `false`, only `public`/`protected` fields
    /// are retained.
    pub ignore_visibility_for_fields: bool,
    /// Include methods regardless of visibility. When `false`, only `public`/`protected` methods
    /// are retained.
    pub ignore_visibility_for_methods: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            enable_field_info: false,
            enable_method_info: false,
            include_runtime_invisible_annotations: false,
            enable_annotation_info: false,
            enable_static_final_constants: false,
            ignore_visibility_for_fields: true,
            ignore_visibility_for_methods: true,
        }
    }
}
