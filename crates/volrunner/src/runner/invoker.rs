//! Runs the external forensics tool for one (image, plugin) pair.
//!
//! The pair's output file doubles as its completion marker: if it already
//! exists the tool is not started again.

use crate::runner::error::RunError;
use jobspec::{ImageTarget, JobSpec, PluginSpec};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Outcome of one invocation.
#[derive(Debug)]
pub struct InvocationResult {
    /// `{output_dir}/{image}.{plugin}.txt`, whether or not it was written.
    pub output_path: PathBuf,
    /// The tool was started and waited for (or the pair was skipped).
    pub succeeded: bool,
    /// Skipped because the output file was already present.
    pub already_existed: bool,
    /// Exit status of the tool, when it ran to completion.
    pub status: Option<ExitStatus>,
    /// Why the tool could not be run, when `succeeded` is false.
    pub error: Option<RunError>,
}

impl InvocationResult {
    fn skipped(output_path: PathBuf) -> Self {
        InvocationResult {
            output_path,
            succeeded: true,
            already_existed: true,
            status: None,
            error: None,
        }
    }

    fn failed(output_path: PathBuf, error: RunError) -> Self {
        InvocationResult {
            output_path,
            succeeded: false,
            already_existed: false,
            status: None,
            error: Some(error),
        }
    }

    /// The tool ran but reported failure through its exit status.
    pub fn nonzero_exit(&self) -> bool {
        self.status.is_some_and(|s| !s.success())
    }
}

/// Launches the tool named by a [`JobSpec`].
pub struct Invoker<'a> {
    spec: &'a JobSpec,
}

impl<'a> Invoker<'a> {
    pub fn new(spec: &'a JobSpec) -> Self {
        Invoker { spec }
    }

    /// Run `plugin` against `image`, blocking until the tool exits.
    ///
    /// The exit status is recorded but not acted on; whatever the tool wrote
    /// to the output path is its result.
    pub fn invoke(&self, image: &ImageTarget, plugin: &PluginSpec) -> InvocationResult {
        let output_path = self.spec.output_path(image, plugin);

        info!(
            "Running plugin '{}' against RAM dump '{}' @ {}",
            plugin.name,
            image.base_name(),
            chrono::Local::now().format(TIMESTAMP_FORMAT)
        );

        if output_path.exists() {
            info!("Plugin already run: {}", output_path.display());
            return InvocationResult::skipped(output_path);
        }

        let mut child = match self.command(image, plugin, &output_path).spawn() {
            Ok(child) => child,
            Err(source) => {
                let err = RunError::InvocationStart {
                    tool: self.spec.tool_path().to_path_buf(),
                    source,
                };
                warn!("{}", err);
                return InvocationResult::failed(output_path, err);
            }
        };

        match child.wait() {
            Ok(status) => {
                if !status.success() {
                    warn!(
                        "Plugin '{}' on '{}' exited with {}",
                        plugin.name,
                        image.base_name(),
                        status
                    );
                }
                InvocationResult {
                    output_path,
                    succeeded: true,
                    already_existed: false,
                    status: Some(status),
                    error: None,
                }
            }
            Err(source) => {
                let err = RunError::InvocationWait {
                    tool: self.spec.tool_path().to_path_buf(),
                    source,
                };
                warn!("{}", err);
                InvocationResult::failed(output_path, err)
            }
        }
    }

    /// `<tool> -f <image> --profile <profile> --output-file <output> <plugin>`
    fn command(&self, image: &ImageTarget, plugin: &PluginSpec, output_path: &Path) -> Command {
        let mut cmd = Command::new(self.spec.tool_path());
        cmd.arg("-f")
            .arg(&image.path)
            .arg("--profile")
            .arg(&image.profile)
            .arg("--output-file")
            .arg(output_path)
            .arg(&plugin.name)
            .stdin(Stdio::null());
        cmd
    }
}
