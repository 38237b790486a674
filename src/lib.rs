//! Recovers a queryable type-hierarchy model from a Java classpath by decoding class files
//! directly, the way a classpath scanner does it — without invoking a JVM class loader, running
//! any bytecode, or requiring a JVM to be installed.
//!
//! ```no_run
//! use jvmscan::classpath::Root;
//! use jvmscan::config::ScanConfig;
//!
//! # fn main() -> Result<(), jvmscan::ScanError> {
//! let config = ScanConfig::new().add_root(Root::Directory("target/classes".into()));
//! let scan = jvmscan::scan(&config)?;
//! for name in scan.class_names() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod classpath;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
mod io;
pub mod jvm;
pub mod loader;
mod query;
mod scan;
pub mod signature;

pub use config::ScanConfig;
pub use error::{Diagnostic, ScanError};
pub use query::Scan;
pub use scan::run as scan;
