//! Job description for volrunner batch runs.
//!
//! A job is the cross product of memory images and tool plugins, plus the
//! path of the external forensics tool and the directory its results land in.
//! This crate provides:
//!
//! - Parsing of YAML (`.yaml`, `.yml`) and JSON (`.json`) job documents
//! - Validation that reports every problem at once, never a partial job
//! - `JobSpec`, the immutable validated job, and the on-disk naming scheme
//!   for per-plugin outputs and per-image summaries
//!
//! # Example
//!
//! ```rust,ignore
//! use jobspec::parse_config_file;
//!
//! let spec = parse_config_file("job.yaml")?.validate()?;
//! for image in spec.images() {
//!     for plugin in spec.plugins() {
//!         println!("{}", spec.output_path(image, plugin).display());
//!     }
//! }
//! ```

pub mod error;
pub mod parser;
pub mod types;
pub mod validate;

// Re-export key types at crate root.
pub use error::{ConfigError, ConfigResult, ValidationIssue};
pub use parser::{parse_config_bytes, parse_config_file, parse_config_str, ConfigFormat};
pub use types::{ImageTarget, JobSpec, PluginSpec, RawConfig, SUMMARY_DIR_NAME};
