//! Folds a plugin's raw output into the image summary.

use crate::runner::error::{RunError, RunResult};
use crate::runner::summary::SummaryArtifact;
use jobspec::PluginSpec;
use std::io::ErrorKind;
use std::path::Path;

/// Append `output_path` to `summary` as a `## plugin` section.
///
/// Returns whether a section was written. Plugins without `summarise` and
/// missing output files are silently passed over.
pub fn collect(
    plugin: &PluginSpec,
    output_path: &Path,
    summary: &mut SummaryArtifact,
) -> RunResult<bool> {
    if !plugin.summarise {
        return Ok(false);
    }

    let data = match std::fs::read(output_path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(source) => {
            return Err(RunError::CollectionRead {
                path: output_path.to_path_buf(),
                source,
            })
        }
    };

    summary.append_section(&plugin.name, &data)?;
    Ok(true)
}
