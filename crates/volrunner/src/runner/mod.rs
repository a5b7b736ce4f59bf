//! Batch run machinery: one external tool invocation per (image, plugin)
//! pair, with selected outputs folded into a Markdown summary per image.

pub mod collector;
pub mod error;
pub mod invoker;
pub mod orchestrator;
pub mod summary;

pub use error::{RunError, RunResult};
pub use orchestrator::{Orchestrator, RunReport};
