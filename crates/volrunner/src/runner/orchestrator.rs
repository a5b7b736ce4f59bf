//! Drives a whole job: images in declaration order, and for each image every
//! plugin in declaration order.

use crate::runner::collector;
use crate::runner::error::RunError;
use crate::runner::invoker::{InvocationResult, Invoker};
use crate::runner::summary::SummaryArtifact;
use jobspec::{ImageTarget, JobSpec};
use std::fmt;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Mode of the summary subdirectory: world-readable, owner-writable.
#[cfg_attr(not(unix), allow(dead_code))]
const SUMMARY_DIR_MODE: u32 = 0o755;

/// Counters for a finished run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Tool processes started and waited for.
    pub invoked: usize,
    /// Pairs skipped because their output already existed.
    pub skipped: usize,
    /// Pairs whose tool process could not be launched.
    pub start_failures: usize,
    /// Tool processes that were launched but could not be waited on.
    pub wait_failures: usize,
    /// Tool processes that exited unsuccessfully.
    pub nonzero_exits: usize,
    /// Plugin sections appended to summaries.
    pub sections_written: usize,
    /// Images whose summary could not be created; their plugins never ran.
    pub images_skipped: usize,
    /// Every recoverable error, in the order it happened.
    pub errors: Vec<String>,
}

impl RunReport {
    fn record_invocation(&mut self, result: &InvocationResult) {
        if result.already_existed {
            self.skipped += 1;
        } else if result.succeeded {
            self.invoked += 1;
            if result.nonzero_exit() {
                self.nonzero_exits += 1;
            }
        } else if matches!(result.error, Some(RunError::InvocationWait { .. })) {
            self.wait_failures += 1;
        } else {
            self.start_failures += 1;
        }
        if let Some(err) = &result.error {
            self.errors.push(err.to_string());
        }
    }

    fn record_error(&mut self, err: &RunError) {
        self.errors.push(err.to_string());
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} invoked, {} already run, {} failed to start, {} lost while waiting, \
             {} non-zero exits, {} summary sections, {} images skipped",
            self.invoked,
            self.skipped,
            self.start_failures,
            self.wait_failures,
            self.nonzero_exits,
            self.sections_written,
            self.images_skipped
        )
    }
}

/// Runs a validated job to completion. Single-threaded; each tool process
/// blocks the loop until it exits.
pub struct Orchestrator<'a> {
    spec: &'a JobSpec,
    invoker: Invoker<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(spec: &'a JobSpec) -> Self {
        Orchestrator {
            spec,
            invoker: Invoker::new(spec),
        }
    }

    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();

        if self.spec.use_summary_dir() {
            let dir = self.spec.summary_dir();
            if let Err(err) = ensure_summary_dir(&dir) {
                // Every image's summary will fail to open and be reported then.
                error!("{}", err);
                report.record_error(&err);
            }
        }

        for image in self.spec.images() {
            self.run_image(image, &mut report);
        }

        info!("Run finished: {}", report);
        report
    }

    fn run_image(&self, image: &ImageTarget, report: &mut RunReport) {
        let summary_path = self.spec.summary_path(image);
        let mut summary = match SummaryArtifact::create(&summary_path, image) {
            Ok(summary) => summary,
            Err(err) => {
                error!("{}", err);
                report.record_error(&err);
                report.images_skipped += 1;
                return;
            }
        };
        debug!("Writing summary to {}", summary.path().display());

        for plugin in self.spec.plugins() {
            let result = self.invoker.invoke(image, plugin);
            report.record_invocation(&result);

            match collector::collect(plugin, &result.output_path, &mut summary) {
                Ok(true) => report.sections_written += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!("{}", err);
                    report.record_error(&err);
                }
            }
        }

        if let Err(err) = summary.close() {
            error!("{}", err);
            report.record_error(&err);
        }
    }
}

/// Create the summary subdirectory if it does not exist yet.
fn ensure_summary_dir(dir: &Path) -> Result<(), RunError> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(SUMMARY_DIR_MODE);
    }
    builder.create(dir).map_err(|source| RunError::SummaryDir {
        path: dir.to_path_buf(),
        source,
    })
}
