//! Type definitions for job documents and the validated job.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the subdirectory holding summaries when `use_summary_dir` is set.
pub const SUMMARY_DIR_NAME: &str = "summary";

/// Top-level job document, as written by the operator.
///
/// Nothing here is checked yet; call [`RawConfig::validate`] to obtain a
/// [`JobSpec`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "volatility_path", default)]
    pub tool_path: PathBuf,
    #[serde(rename = "output_path", default)]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub use_summary_dir: bool,
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
    #[serde(rename = "data", default)]
    pub images: Vec<ImageTarget>,
}

/// A memory image and the profile the tool should interpret it with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageTarget {
    #[serde(rename = "ram_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub profile: String,
}

impl ImageTarget {
    pub fn new(path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        ImageTarget {
            path: path.into(),
            profile: profile.into(),
        }
    }

    /// Final path component, used as the stem of every derived file name.
    pub fn base_name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().into_owned(),
        }
    }
}

/// A tool plugin and whether its output goes into the image summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginSpec {
    pub name: String,
    #[serde(default)]
    pub summarise: bool,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, summarise: bool) -> Self {
        PluginSpec {
            name: name.into(),
            summarise,
        }
    }
}

/// A validated job. Immutable once built.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub(crate) tool_path: PathBuf,
    pub(crate) output_dir: PathBuf,
    pub(crate) use_summary_dir: bool,
    pub(crate) images: Vec<ImageTarget>,
    pub(crate) plugins: Vec<PluginSpec>,
}

impl JobSpec {
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn use_summary_dir(&self) -> bool {
        self.use_summary_dir
    }

    /// Images in declaration order.
    pub fn images(&self) -> &[ImageTarget] {
        &self.images
    }

    /// Plugins in declaration order.
    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    /// `{output_dir}/summary`, whether or not it is in use.
    pub fn summary_dir(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_DIR_NAME)
    }

    /// Where the Markdown summary for `image` lives.
    pub fn summary_path(&self, image: &ImageTarget) -> PathBuf {
        let file_name = format!("{}.analysis.md", image.base_name());
        if self.use_summary_dir {
            self.summary_dir().join(file_name)
        } else {
            self.output_dir.join(file_name)
        }
    }

    /// Raw tool output for one (image, plugin) pair. Its presence marks the
    /// pair as done.
    pub fn output_path(&self, image: &ImageTarget, plugin: &PluginSpec) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}.txt", image.base_name(), plugin.name))
    }
}
