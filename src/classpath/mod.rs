//! The classpath walker: enumerating directory trees and archives, and decoding each class file
//! it finds.

pub mod dir_match;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ResourcePattern;
use crate::error::{Diagnostic, EntryLocation, ScanError};
use crate::filter::Filter;
use crate::jvm::fact::ClassFact;
use crate::jvm::parsing::{decode_class, DecodeOptions};
use dir_match::{classify_dir, is_class_file, is_hidden};

/// One element of a classpath: a directory tree of `.class` files, an archive of them (with the
/// `jar` feature), or a single caller-supplied class's bytes held entirely in memory.
#[derive(Debug, Clone)]
pub enum Root {
    /// A directory tree, walked recursively.
    Directory(PathBuf),
    /// A `.jar`/`.zip` archive.
    #[cfg(feature = "jar")]
    Jar(PathBuf),
    /// A single class's raw bytes, supplied directly rather than read from disk, paired with the
    /// root-relative path it should be reported under (e.g. `"com/example/Widget.class"`).
    Buffer(Vec<u8>, String),
}

/// Parameters threaded through a single root's walk: decode options plus the filters and
/// resource-pattern registrations that govern which entries are visited at all.
pub struct WalkContext<'a> {
    pub options: &'a DecodeOptions,
    pub name_filter: &'a Filter,
    pub path_filter: &'a Filter,
    pub jar_filter: &'a Filter,
    pub resource_patterns: &'a [ResourcePattern],
}

/// Walks and decodes every class file under `root`, tagging each resulting fact with
/// `root_index`. I/O failures reading the root itself abort with [`ScanError::Io`]; a malformed
/// individual class file is reported as a [`Diagnostic`] and otherwise skipped.
pub fn walk_root(
    root: &Root,
    root_index: usize,
    ctx: &WalkContext<'_>,
) -> Result<(Vec<ClassFact>, Vec<Diagnostic>), ScanError> {
    match root {
        Root::Directory(path) => walk_directory(path, root_index, ctx),
        #[cfg(feature = "jar")]
        Root::Jar(path) => {
            if !jar_is_accepted(path, ctx.jar_filter) {
                return Ok((Vec::new(), Vec::new()));
            }
            walk_jar(path, root_index, ctx)
        }
        Root::Buffer(bytes, relative_path) => walk_buffer(bytes, relative_path, root_index, ctx.options),
    }
}

#[cfg(feature = "jar")]
fn jar_is_accepted(path: &Path, jar_filter: &Filter) -> bool {
    path.file_name().is_some_and(|name| jar_filter.matches(&name.to_string_lossy()))
}

fn io_error(root: &Path, source: std::io::Error) -> ScanError {
    ScanError::Io {
        root: root.to_path_buf(),
        source,
    }
}

fn dotted_package_of(relative_dir: &Path) -> String {
    relative_dir.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join(".")
}

fn slash_path_of(relative_dir: &Path) -> String {
    relative_dir.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/")
}

fn run_resource_callbacks(relative_path: &str, bytes: &[u8], patterns: &[ResourcePattern]) {
    for pattern in patterns {
        if pattern.regex.is_match(relative_path) {
            (pattern.callback)(relative_path, bytes);
        }
    }
}

fn walk_directory(
    root: &Path,
    root_index: usize,
    ctx: &WalkContext<'_>,
) -> Result<(Vec<ClassFact>, Vec<Diagnostic>), ScanError> {
    let mut facts = Vec::new();
    let mut diagnostics = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        if entry.path() == root {
            return true;
        }
        if is_hidden(entry) {
            return false;
        }
        if !entry.file_type().is_dir() {
            return true;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let dotted = dotted_package_of(relative);
        let slashed = slash_path_of(relative);
        !classify_dir(&dotted, &slashed, ctx.name_filter, ctx.path_filter).should_prune()
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            io_error(
                root,
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")),
            )
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative_path = entry.path().strip_prefix(root).unwrap_or(entry.path()).to_string_lossy().replace('\\', "/");

        if is_class_file(&entry) {
            let bytes = std::fs::read(entry.path()).map_err(|e| io_error(root, e))?;
            match decode_class(&bytes, root_index, ctx.options) {
                Ok(fact) => facts.push(fact),
                Err(error) => diagnostics.push(Diagnostic::from_parse_error(
                    EntryLocation {
                        root_index,
                        path: relative_path,
                    },
                    &error,
                )),
            }
        } else if !ctx.resource_patterns.is_empty() {
            if let Ok(bytes) = std::fs::read(entry.path()) {
                run_resource_callbacks(&relative_path, &bytes, ctx.resource_patterns);
            }
        }
    }

    Ok((facts, diagnostics))
}

#[cfg(feature = "jar")]
fn walk_jar(
    path: &Path,
    root_index: usize,
    ctx: &WalkContext<'_>,
) -> Result<(Vec<ClassFact>, Vec<Diagnostic>), ScanError> {
    let file = std::fs::File::open(path).map_err(|e| io_error(path, e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| io_error(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    let mut facts = Vec::new();
    let mut diagnostics = Vec::new();

    // `0..len()` visits entries in central-directory order, which is what gives archive scans a
    // reproducible shadowing outcome within a single root.
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| io_error(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        if entry.is_dir() {
            continue;
        }
        let relative_path = entry.name().to_owned();
        let parent_slash = relative_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let parent_dotted = parent_slash.replace('/', ".");
        if classify_dir(&parent_dotted, parent_slash, ctx.name_filter, ctx.path_filter).should_prune() {
            continue;
        }

        let is_class = relative_path.ends_with(".class");
        if !is_class && ctx.resource_patterns.is_empty() {
            continue;
        }
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        std::io::Read::read_to_end(&mut entry, &mut bytes).map_err(|e| io_error(path, e))?;

        if is_class {
            match decode_class(&bytes, root_index, ctx.options) {
                Ok(fact) => facts.push(fact),
                Err(error) => diagnostics.push(Diagnostic::from_parse_error(
                    EntryLocation {
                        root_index,
                        path: relative_path,
                    },
                    &error,
                )),
            }
        } else {
            run_resource_callbacks(&relative_path, &bytes, ctx.resource_patterns);
        }
    }

    Ok((facts, diagnostics))
}

fn walk_buffer(
    bytes: &[u8],
    relative_path: &str,
    root_index: usize,
    options: &DecodeOptions,
) -> Result<(Vec<ClassFact>, Vec<Diagnostic>), ScanError> {
    match decode_class(bytes, root_index, options) {
        Ok(fact) => Ok((vec![fact], Vec::new())),
        Err(error) => Ok((
            Vec::new(),
            vec![Diagnostic::from_parse_error(
                EntryLocation {
                    root_index,
                    path: relative_path.to_owned(),
                },
                &error,
            )],
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::access_flags::ClassAccessFlags;
    use crate::jvm::parsing::encode::ClassFileBuilder;

    fn walk_ctx<'a>(
        options: &'a DecodeOptions,
        name_filter: &'a Filter,
        path_filter: &'a Filter,
        jar_filter: &'a Filter,
    ) -> WalkContext<'a> {
        WalkContext {
            options,
            name_filter,
            path_filter,
            jar_filter,
            resource_patterns: &[],
        }
    }

    #[test]
    fn walks_a_directory_tree_in_sorted_order() {
        let dir = tempdir();
        std::fs::create_dir_all(dir.join("com/example")).unwrap();
        std::fs::write(
            dir.join("com/example/B.class"),
            ClassFileBuilder::new("com/example/B").build(),
        )
        .unwrap();
        std::fs::write(
            dir.join("com/example/A.class"),
            ClassFileBuilder::new("com/example/A")
                .access_flags(ClassAccessFlags::PUBLIC)
                .build(),
        )
        .unwrap();

        let options = DecodeOptions::default();
        let path_filter = Filter::new();
        let jar_filter = Filter::new();
        let (facts, diagnostics) =
            walk_root(&Root::Directory(dir.clone()), 0, &walk_ctx(&options, &Filter::new(), &path_filter, &jar_filter)).unwrap();
        assert!(diagnostics.is_empty());
        let names: Vec<_> = facts.iter().map(|f| f.binary_name.clone()).collect();
        assert_eq!(names, vec!["com.example.A".to_owned(), "com.example.B".to_owned()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn skips_malformed_class_files_as_diagnostics() {
        let dir = tempdir();
        std::fs::write(dir.join("Bad.class"), vec![0, 0, 0, 0]).unwrap();

        let options = DecodeOptions::default();
        let path_filter = Filter::new();
        let jar_filter = Filter::new();
        let (facts, diagnostics) =
            walk_root(&Root::Directory(dir.clone()), 0, &walk_ctx(&options, &Filter::new(), &path_filter, &jar_filter)).unwrap();
        assert!(facts.is_empty());
        assert_eq!(diagnostics.len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn path_filter_prunes_rejected_subtree() {
        let dir = tempdir();
        std::fs::create_dir_all(dir.join("com/example")).unwrap();
        std::fs::create_dir_all(dir.join("com/internal")).unwrap();
        std::fs::write(
            dir.join("com/example/A.class"),
            ClassFileBuilder::new("com/example/A").build(),
        )
        .unwrap();
        std::fs::write(
            dir.join("com/internal/B.class"),
            ClassFileBuilder::new("com/internal/B").build(),
        )
        .unwrap();

        let options = DecodeOptions::default();
        let path_filter = Filter::new().reject_path("com/internal", crate::filter::FilterShape::Prefix).unwrap();
        let jar_filter = Filter::new();
        let (facts, _) =
            walk_root(&Root::Directory(dir.clone()), 0, &walk_ctx(&options, &Filter::new(), &path_filter, &jar_filter)).unwrap();
        let names: Vec<_> = facts.iter().map(|f| f.binary_name.clone()).collect();
        assert_eq!(names, vec!["com.example.A".to_owned()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn buffer_root_decodes_in_memory_bytes() {
        let bytes = ClassFileBuilder::new("com/example/Widget").build();
        let options = DecodeOptions::default();
        let (facts, diagnostics) = walk_root(
            &Root::Buffer(bytes, "com/example/Widget.class".to_owned()),
            0,
            &walk_ctx(&options, &Filter::new(), &Filter::new(), &Filter::new()),
        )
        .unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].binary_name, "com.example.Widget");
    }

    #[test]
    fn resource_pattern_callback_fires_on_match() {
        let dir = tempdir();
        std::fs::create_dir_all(dir.join("tpl/sub")).unwrap();
        std::fs::write(dir.join("tpl/a.html"), b"a").unwrap();
        std::fs::write(dir.join("tpl/sub/b.html"), b"b").unwrap();
        std::fs::write(dir.join("tpl/c.txt"), b"c").unwrap();

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let pattern = ResourcePattern {
            regex: regex::Regex::new(r"^tpl/.*\.html$").unwrap(),
            callback: std::sync::Arc::new(move |path: &str, _bytes: &[u8]| {
                seen_clone.lock().unwrap().push(path.to_owned());
            }),
        };
        let options = DecodeOptions::default();
        let path_filter = Filter::new();
        let ctx = WalkContext {
            options: &options,
            name_filter: &path_filter,
            path_filter: &path_filter,
            jar_filter: &path_filter,
            resource_patterns: std::slice::from_ref(&pattern),
        };
        walk_root(&Root::Directory(dir.clone()), 0, &ctx).unwrap();

        let mut matched = seen.lock().unwrap().clone();
        matched.sort();
        assert_eq!(matched, vec!["tpl/a.html".to_owned(), "tpl/sub/b.html".to_owned()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    fn tempdir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "jvmscan-test-{}-{}",
            std::process::id(),
            dir_nonce()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn dir_nonce() -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NONCE: AtomicU64 = AtomicU64::new(0);
        NONCE.fetch_add(1, Ordering::Relaxed)
    }
}
