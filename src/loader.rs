//! A convenience adapter for decoding one class by name without running a full scan, mirroring
//! this codebase's `ClassLoader`/`ClassPath` pairing.

use std::path::Path;

use crate::classpath::Root;
use crate::error::ScanError;
use crate::jvm::fact::ClassFact;
use crate::jvm::parsing::{decode_class, DecodeOptions};

/// Looks up and decodes a single class by binary name, consulting `roots` in order and stopping
/// at the first hit — the same earliest-wins rule a full scan applies, but without walking
/// anything else on the classpath.
pub struct SingleClassLoader {
    roots: Vec<Root>,
    decode_options: DecodeOptions,
}

impl SingleClassLoader {
    /// Builds a loader over `roots`, consulted in order.
    #[must_use]
    pub fn new(roots: Vec<Root>, decode_options: DecodeOptions) -> Self {
        Self { roots, decode_options }
    }

    /// Looks up `binary_name`, returning `Ok(None)` if no root contains it.
    pub fn load(&self, binary_name: &str) -> Result<Option<ClassFact>, ScanError> {
        let relative = binary_name.replace('.', "/") + ".class";
        for (root_index, root) in self.roots.iter().enumerate() {
            if let Some(bytes) = read_entry(root, &relative)? {
                let fact = decode_class(&bytes, root_index, &self.decode_options)
                    .map_err(|e| ScanError::argument(format!("{binary_name} is malformed: {e}")))?;
                return Ok(Some(fact));
            }
        }
        Ok(None)
    }
}

fn read_entry(root: &Root, relative_path: &str) -> Result<Option<Vec<u8>>, ScanError> {
    match root {
        Root::Directory(dir) => {
            let path = dir.join(relative_path);
            match std::fs::read(&path) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(source) => Err(ScanError::Io {
                    root: dir.clone(),
                    source,
                }),
            }
        }
        #[cfg(feature = "jar")]
        Root::Jar(jar_path) => read_jar_entry(jar_path, relative_path),
        Root::Buffer(bytes, buffer_path) => {
            Ok((buffer_path == relative_path).then(|| bytes.clone()))
        }
    }
}

#[cfg(feature = "jar")]
fn read_jar_entry(jar_path: &Path, relative_path: &str) -> Result<Option<Vec<u8>>, ScanError> {
    let file = std::fs::File::open(jar_path).map_err(|source| ScanError::Io {
        root: jar_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ScanError::Io {
        root: jar_path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    let result = match archive.by_name(relative_path) {
        Ok(mut entry) => {
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            std::io::Read::read_to_end(&mut entry, &mut bytes).map_err(|source| ScanError::Io {
                root: jar_path.to_path_buf(),
                source,
            })?;
            Ok(Some(bytes))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(ScanError::Io {
            root: jar_path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        }),
    };
    result
}
