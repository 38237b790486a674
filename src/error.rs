//! Top-level error and diagnostic types.
//!
//! The kinds here mirror the propagation policy of the scan driver: [`ScanError::Io`] and
//! [`ScanError::Fatal`] abort the scan, while a single class file's decode failure is caught by
//! the walker and turned into a [`Diagnostic::Format`] instead of propagating.

use std::fmt;
use std::path::PathBuf;

use crate::jvm::parsing::ParseError;

/// An error that aborts a scan outright.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A classpath root could not be opened or read.
    #[error("I/O error reading classpath root {root}: {source}")]
    Io {
        /// The root that failed.
        root: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The caller misused the API (e.g. queried subclasses of an interface, or re-ran a
    /// finished scan).
    #[error("invalid argument: {0}")]
    Argument(String),
    /// A hierarchy-graph invariant was violated, implying corrupted or adversarial input.
    #[error("fatal inconsistency: {0}")]
    Fatal(String),
}

impl ScanError {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    pub(crate) fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }
}

/// Where a single [`FormatError`] or shadow-skip occurred, for attaching to a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocation {
    /// Index of the classpath root this entry came from, in the order the caller supplied them.
    pub root_index: usize,
    /// The path of the entry relative to its root (or within its archive).
    pub path: String,
}

impl fmt::Display for EntryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root#{}:{}", self.root_index, self.path)
    }
}

/// A recoverable event surfaced through the scan's diagnostic stream rather than through
/// `Result::Err`. Neither variant ever aborts a scan.
#[derive(Debug, Clone)]
pub enum Diagnostic {
    /// A single class file failed to decode and was skipped.
    Format {
        /// Where the offending entry was found.
        location: EntryLocation,
        /// A human-readable description of the parse failure.
        message: String,
    },
    /// A later classpath occurrence of a fully-qualified name was shadowed by an earlier one.
    ShadowSkip {
        /// The fully-qualified (dotted) name that was shadowed.
        binary_name: String,
        /// The root index that won.
        kept_root_index: usize,
        /// The root index that was dropped.
        dropped_root_index: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format { location, message } => {
                write!(f, "skipped malformed class file at {location}: {message}")
            }
            Self::ShadowSkip {
                binary_name,
                kept_root_index,
                dropped_root_index,
            } => write!(
                f,
                "{binary_name} from root#{dropped_root_index} shadowed by root#{kept_root_index}"
            ),
        }
    }
}

impl Diagnostic {
    pub(crate) fn from_parse_error(location: EntryLocation, error: &ParseError) -> Self {
        tracing::warn!(%location, %error, "skipping malformed class file");
        Self::Format {
            location,
            message: error.to_string(),
        }
    }

    pub(crate) fn shadow_skip(binary_name: String, kept: usize, dropped: usize) -> Self {
        tracing::debug!(binary_name, kept, dropped, "class shadowed by earlier root");
        Self::ShadowSkip {
            binary_name,
            kept_root_index: kept,
            dropped_root_index: dropped,
        }
    }
}
