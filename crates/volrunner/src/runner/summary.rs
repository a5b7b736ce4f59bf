//! Per-image Markdown summary.
//!
//! Layout:
//!
//! ~~~text
//! # Summary
//!
//! - File: <image path>
//! - Profile: <profile>
//!
//! ## <plugin>
//!
//! ```
//! <raw plugin output>
//! ```
//! ~~~
//!
//! with one `##` section per collected plugin, in the order they were appended.

use crate::runner::error::{RunError, RunResult};
use jobspec::ImageTarget;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const FENCE: &[u8] = b"```";

/// An open summary file. Append-only until [`SummaryArtifact::close`].
pub struct SummaryArtifact {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SummaryArtifact {
    /// Create (or truncate) the summary at `path` and write its header.
    pub fn create(path: &Path, image: &ImageTarget) -> RunResult<Self> {
        let creation_error = |source| RunError::ArtifactCreation {
            path: path.to_path_buf(),
            source,
        };

        let file = open_options().open(path).map_err(creation_error)?;
        let mut artifact = SummaryArtifact {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        };

        let header = format!(
            "# Summary\n\n- File: {}\n- Profile: {}\n\n",
            image.path.display(),
            image.profile
        );
        artifact
            .writer
            .write_all(header.as_bytes())
            .map_err(creation_error)?;
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a `## name` section wrapping `raw` verbatim in a fenced block.
    pub fn append_section(&mut self, name: &str, raw: &[u8]) -> RunResult<()> {
        self.write_section(name, raw)
            .map_err(|source| RunError::SummaryWrite {
                path: self.path.clone(),
                source,
            })
    }

    fn write_section(&mut self, name: &str, raw: &[u8]) -> std::io::Result<()> {
        write!(self.writer, "## {}\n\n", name)?;
        self.writer.write_all(FENCE)?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(raw)?;
        self.writer.write_all(b"\n")?;
        self.writer.write_all(FENCE)?;
        self.writer.write_all(b"\n\n")
    }

    /// Flush and close. The file is not touched again afterwards.
    pub fn close(mut self) -> RunResult<()> {
        self.writer.flush().map_err(|source| RunError::SummaryWrite {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(unix)]
fn open_options() -> OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut opts = OpenOptions::new();
    opts.create(true).write(true).truncate(true).mode(0o660);
    opts
}

#[cfg(not(unix))]
fn open_options() -> OpenOptions {
    let mut opts = OpenOptions::new();
    opts.create(true).write(true).truncate(true);
    opts
}
