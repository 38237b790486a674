//! The scan configuration builder, in the same fluent-builder idiom as this codebase's
//! `ClassLoader`/`ClassPath` pairing.

use std::sync::Arc;

use regex::Regex;

use crate::classpath::Root;
use crate::error::ScanError;
use crate::filter::Filter;
use crate::jvm::parsing::DecodeOptions;

/// A callback registered via [`ScanConfig::on_resource_match`]: given a root-relative path and
/// the matching regex's captures, does whatever the caller wants with the resource's bytes.
pub type ResourceCallback = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

/// One `pathMatches`-style registration: a compiled pattern tested against every non-`.class`
/// resource path the walker visits, firing `callback` on each match.
#[derive(Clone)]
pub struct ResourcePattern {
    pub(crate) regex: Regex,
    pub(crate) callback: ResourceCallback,
}

impl std::fmt::Debug for ResourcePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePattern").field("regex", &self.regex.as_str()).finish()
    }
}

/// Configures a scan before it runs. This is the "Configuring" state of the scan lifecycle;
/// calling [`crate::scan`] consumes it and moves to "Scanning", then "Scanned".
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    roots: Vec<Root>,
    decode_options: DecodeOptions,
    name_filter: Filter,
    path_filter: Filter,
    jar_filter: Filter,
    resource_patterns: Vec<ResourcePattern>,
}

impl ScanConfig {
    /// An empty configuration: no roots, no optional decoding, no filtering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one classpath root, in the order roots should be consulted for shadowing.
    #[must_use]
    pub fn add_root(mut self, root: Root) -> Self {
        self.roots.push(root);
        self
    }

    /// Appends several classpath roots, preserving relative order.
    #[must_use]
    pub fn add_roots(mut self, roots: impl IntoIterator<Item = Root>) -> Self {
        self.roots.extend(roots);
        self
    }

    /// Decodes and retains each class's declared fields (off by default).
    #[must_use]
    pub fn enable_field_info(mut self, enabled: bool) -> Self {
        self.decode_options.enable_field_info = enabled;
        self
    }

    /// Decodes and retains each class's declared methods (off by default).
    #[must_use]
    pub fn enable_method_info(mut self, enabled: bool) -> Self {
        self.decode_options.enable_method_info = enabled;
        self
    }

    /// Also decodes `RuntimeInvisibleAnnotations` and its parameter/field equivalents, not just
    /// the runtime-visible ones (off by default).
    #[must_use]
    pub fn include_runtime_invisible_annotations(mut self, enabled: bool) -> Self {
        self.decode_options.include_runtime_invisible_annotations = enabled;
        self
    }

    /// Decodes class-, field-, and method-level annotation type names at all (off by default).
    #[must_use]
    pub fn enable_annotation_info(mut self, enabled: bool) -> Self {
        self.decode_options.enable_annotation_info = enabled;
        self
    }

    /// Decodes `static final` constant values on fields (off by default).
    #[must_use]
    pub fn enable_static_final_constants(mut self, enabled: bool) -> Self {
        self.decode_options.enable_static_final_constants = enabled;
        self
    }

    /// Whether fields are retained regardless of visibility. Defaults to `true`; set to `false`
    /// to restrict decoded fields to `public`/`protected` ones.
    #[must_use]
    pub fn ignore_visibility_for_fields(mut self, enabled: bool) -> Self {
        self.decode_options.ignore_visibility_for_fields = enabled;
        self
    }

    /// Whether methods are retained regardless of visibility. Defaults to `true`; set to `false`
    /// to restrict decoded methods to `public`/`protected` ones.
    #[must_use]
    pub fn ignore_visibility_for_methods(mut self, enabled: bool) -> Self {
        self.decode_options.ignore_visibility_for_methods = enabled;
        self
    }

    /// Restricts the scan to binary (package/class dotted) names accepted by `filter`. The
    /// default filter accepts everything.
    #[must_use]
    pub fn name_filter(mut self, filter: Filter) -> Self {
        self.name_filter = filter;
        self
    }

    /// Restricts which root-relative filesystem paths are descended into and decoded, using the
    /// strict (`/`-aware) glob dialect. Applied during the walk itself, before decoding, so a
    /// rejecting path filter can prune whole subtrees.
    #[must_use]
    pub fn path_filter(mut self, filter: Filter) -> Self {
        self.path_filter = filter;
        self
    }

    /// Restricts which `.jar`/`.zip` archive roots are scanned at all, matched against each
    /// root's file leafname.
    #[must_use]
    pub fn jar_filter(mut self, filter: Filter) -> Self {
        self.jar_filter = filter;
        self
    }

    /// Registers a callback invoked for every non-`.class` resource whose root-relative path
    /// matches `pattern`, passing the path and the resource's raw bytes.
    pub fn on_resource_match(
        mut self,
        pattern: &str,
        callback: impl Fn(&str, &[u8]) + Send + Sync + 'static,
    ) -> Result<Self, ScanError> {
        let regex = Regex::new(pattern)
            .map_err(|e| ScanError::argument(format!("invalid resource pattern {pattern:?}: {e}")))?;
        self.resource_patterns.push(ResourcePattern {
            regex,
            callback: Arc::new(callback),
        });
        Ok(self)
    }

    pub(crate) fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub(crate) fn decode_options(&self) -> DecodeOptions {
        self.decode_options
    }

    pub(crate) fn name_filter_ref(&self) -> &Filter {
        &self.name_filter
    }

    pub(crate) fn path_filter_ref(&self) -> &Filter {
        &self.path_filter
    }

    pub(crate) fn jar_filter_ref(&self) -> &Filter {
        &self.jar_filter
    }

    pub(crate) fn resource_patterns(&self) -> &[ResourcePattern] {
        &self.resource_patterns
    }
}
