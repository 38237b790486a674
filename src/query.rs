//! The query engine: the "Scanned" state of the scan lifecycle, offering read-only hierarchy
//! queries over a completed scan.

use crate::error::{Diagnostic, ScanError};
use crate::graph::HierarchyGraph;
use crate::jvm::fact::ClassFact;

/// A completed scan: an immutable hierarchy graph plus the diagnostics collected while building
/// it.
pub struct Scan {
    pub(crate) graph: HierarchyGraph,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl Scan {
    /// The diagnostics collected during the scan: malformed class files that were skipped, and
    /// classpath entries shadowed by an earlier root.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Every binary name this scan actually decoded (excludes names only ever seen as a
    /// superclass or superinterface reference).
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.graph.encountered_names()
    }

    /// The decoded fact for a class (not an interface) binary name.
    #[must_use]
    pub fn class(&self, binary_name: &str) -> Option<&ClassFact> {
        self.graph.class_fact(binary_name)
    }

    /// The decoded fact for an interface binary name.
    #[must_use]
    pub fn interface(&self, binary_name: &str) -> Option<&ClassFact> {
        self.graph.interface_fact(binary_name)
    }

    /// Every binary name `binary_name` directly or transitively extends.
    ///
    /// Returns an empty list, not an error, if `binary_name` was never encountered — only a
    /// type mismatch (querying a class relation about a name that is in fact an interface, or
    /// vice versa) is an [`ScanError::Argument`].
    pub fn superclasses_of(&self, binary_name: &str) -> Result<Vec<String>, ScanError> {
        self.reject_if_interface(binary_name)?;
        Ok(self.graph.all_superclasses(binary_name))
    }

    /// Every class directly or transitively extending `binary_name`. See
    /// [`Self::superclasses_of`] for the empty-vs-error convention.
    pub fn subclasses_of(&self, binary_name: &str) -> Result<Vec<String>, ScanError> {
        self.reject_if_interface(binary_name)?;
        Ok(self.graph.all_subclasses(binary_name))
    }

    /// Every interface `binary_name` directly or transitively extends. See
    /// [`Self::superclasses_of`] for the empty-vs-error convention.
    pub fn superinterfaces_of(&self, binary_name: &str) -> Result<Vec<String>, ScanError> {
        self.reject_if_class(binary_name)?;
        Ok(self.graph.all_superinterfaces_of_interface(binary_name))
    }

    /// Every interface directly or transitively extending `binary_name`. See
    /// [`Self::superclasses_of`] for the empty-vs-error convention.
    pub fn subinterfaces_of(&self, binary_name: &str) -> Result<Vec<String>, ScanError> {
        self.reject_if_class(binary_name)?;
        Ok(self.graph.all_subinterfaces(binary_name))
    }

    /// Every interface `binary_name` implements, directly or transitively (through its own
    /// `implements` clauses, those interfaces' `extends` clauses, and its superclasses').
    pub fn interfaces_of(&self, binary_name: &str) -> Vec<String> {
        self.graph.all_superinterfaces(binary_name)
    }

    /// Every class that implements `interface_name`, directly or through a superclass or a
    /// sub-interface. See [`Self::superclasses_of`] for the empty-vs-error convention.
    pub fn implementations_of(&self, interface_name: &str) -> Result<Vec<String>, ScanError> {
        self.reject_if_class(interface_name)?;
        Ok(self.graph.implementing_classes(interface_name))
    }

    /// Every class or interface directly annotated with `annotation_name`. Always returns an
    /// empty list rather than an error for an annotation nothing declares.
    #[must_use]
    pub fn annotated_with(&self, annotation_name: &str) -> Vec<String> {
        self.graph.annotated_with(annotation_name)
    }

    fn reject_if_interface(&self, binary_name: &str) -> Result<(), ScanError> {
        if self.graph.interface_fact(binary_name).is_some() {
            Err(ScanError::argument(format!(
                "{binary_name} is an interface, not a class"
            )))
        } else {
            Ok(())
        }
    }

    fn reject_if_class(&self, binary_name: &str) -> Result<(), ScanError> {
        if self.graph.class_fact(binary_name).is_some() {
            Err(ScanError::argument(format!(
                "{binary_name} is a class, not an interface"
            )))
        } else {
            Ok(())
        }
    }
}
