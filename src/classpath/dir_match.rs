//! Deciding what to do with one directory-walk entry, before it is read or decoded.
//!
//! Two independent decisions are made per directory: whether it's hidden (always pruned,
//! regardless of filtering) and, for everything else, where it stands relative to the configured
//! name and path filters. The latter is what lets the walker prune whole subtrees of the
//! classpath without paying to stat, read, or decode a single file under them.

use walkdir::DirEntry;

use crate::filter::Filter;

/// Where one directory stands relative to the configured accept/reject filters, decided before
/// the walker descends into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirMatch {
    /// This directory (as a package or path prefix) is itself rejected. Pruned.
    HasRejectedPrefix,
    /// This directory is not rejected, and the name filter's accept list names something
    /// beneath it, but it isn't itself an accepted package. Descended into.
    HasAcceptedPrefix,
    /// This directory's path exactly matches an accepted path pattern. Descended into; nothing
    /// under it is pruned by the path filter.
    AtAcceptedPath,
    /// This directory's path filter lineage leads to an accepted path further down. Descended
    /// into.
    AncestorOfAcceptedPath,
    /// This directory's dotted form exactly matches an accepted package. Descended into; nothing
    /// under it is pruned by the name filter.
    AtAcceptedClassPackage,
    /// Neither filter's accept list has anything to do with this directory or anything beneath
    /// it. Pruned.
    NotWithinAcceptedPath,
}

impl DirMatch {
    /// Whether the walker should skip descending into a directory classified this way.
    #[must_use]
    pub fn should_prune(self) -> bool {
        matches!(self, Self::HasRejectedPrefix | Self::NotWithinAcceptedPath)
    }
}

/// Whether a directory entry's name marks it hidden (starts with `.`, other than `.` itself).
/// Hidden directories are always pruned, independent of any filter.
#[must_use]
pub fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != ".")
}

/// Whether a directory entry is a regular file with a `.class` extension.
#[must_use]
pub fn is_class_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "class")
}

/// Classifies a directory given its dotted-package form (`com.example`) and its slash-path form
/// (`com/example`), against the scan's name and path filters.
///
/// A filter with no accept patterns at all imposes no restriction and is skipped entirely here —
/// otherwise its vacuous "nothing to prune" truth would swallow a restriction the *other* filter
/// is actively imposing.
#[must_use]
pub fn classify_dir(dotted_package: &str, slash_path: &str, name_filter: &Filter, path_filter: &Filter) -> DirMatch {
    if name_filter.reject_has_prefix(dotted_package) || path_filter.reject_has_prefix(slash_path) {
        return DirMatch::HasRejectedPrefix;
    }

    let name_restricts = !name_filter.has_no_accept_patterns();
    let path_restricts = !path_filter.has_no_accept_patterns();

    if name_restricts && name_filter.accept_is_exact_prefix(dotted_package) {
        return DirMatch::AtAcceptedClassPackage;
    }
    if path_restricts && path_filter.accept_is_exact_prefix(slash_path) {
        return DirMatch::AtAcceptedPath;
    }
    if name_restricts && name_filter.accept_has_prefix(dotted_package) {
        return DirMatch::HasAcceptedPrefix;
    }
    if path_restricts && path_filter.accept_has_prefix(slash_path) {
        return DirMatch::AncestorOfAcceptedPath;
    }
    if !name_restricts && !path_restricts {
        return DirMatch::HasAcceptedPrefix;
    }
    DirMatch::NotWithinAcceptedPath
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterShape;

    #[test]
    fn rejected_prefix_prunes_even_with_no_accept_list() {
        let name_filter = Filter::new().reject("com.example.internal", FilterShape::Prefix).unwrap();
        let dir_match = classify_dir("com.example.internal", "com/example/internal", &name_filter, &Filter::new());
        assert_eq!(dir_match, DirMatch::HasRejectedPrefix);
        assert!(dir_match.should_prune());
    }

    #[test]
    fn ancestor_of_accepted_package_descends() {
        let name_filter = Filter::new().accept("com.example.widgets", FilterShape::Prefix).unwrap();
        let dir_match = classify_dir("com", "com", &name_filter, &Filter::new());
        assert_eq!(dir_match, DirMatch::HasAcceptedPrefix);
        assert!(!dir_match.should_prune());
    }

    #[test]
    fn unrelated_package_is_pruned_when_accept_list_is_nonempty() {
        let name_filter = Filter::new().accept("com.example.widgets", FilterShape::Prefix).unwrap();
        let dir_match = classify_dir("org.other", "org/other", &name_filter, &Filter::new());
        assert_eq!(dir_match, DirMatch::NotWithinAcceptedPath);
        assert!(dir_match.should_prune());
    }

    #[test]
    fn name_filter_restriction_is_not_swallowed_by_an_unset_path_filter() {
        let name_filter = Filter::new().accept("com.example.widgets", FilterShape::Prefix).unwrap();
        let dir_match = classify_dir("org.other", "org/other", &name_filter, &Filter::new());
        assert_eq!(dir_match, DirMatch::NotWithinAcceptedPath);
        assert!(dir_match.should_prune());
    }

    #[test]
    fn path_filter_accept_list_rescues_a_directory_the_name_filter_rejects_as_irrelevant() {
        let name_filter = Filter::new().accept("com.example.widgets", FilterShape::Prefix).unwrap();
        let path_filter = Filter::new().accept_path("org/other", FilterShape::Prefix).unwrap();
        let dir_match = classify_dir("org.other", "org/other", &name_filter, &path_filter);
        assert_eq!(dir_match, DirMatch::AtAcceptedPath);
        assert!(!dir_match.should_prune());
    }

    #[test]
    fn exact_accepted_package_descends() {
        let name_filter = Filter::new().accept("com.example.widgets", FilterShape::Prefix).unwrap();
        let dir_match = classify_dir("com.example.widgets", "com/example/widgets", &name_filter, &Filter::new());
        assert_eq!(dir_match, DirMatch::AtAcceptedClassPackage);
        assert!(!dir_match.should_prune());
    }
}
