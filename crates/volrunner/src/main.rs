//! volrunner: batch driver for an external memory forensics tool.
//!
//! Reads a job document (images × plugins), runs the tool once per pair that
//! has no output yet, and writes a Markdown summary per image gathering the
//! plugins marked for summarising.

mod runner;

use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use jobspec::JobSpec;
use runner::{Orchestrator, RunReport};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn cli() -> Command {
    Command::new("volrunner")
        .version(VERSION)
        .about("Runs a memory forensics tool across memory images and plugins")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Config file path (YAML, or JSON with a .json extension)"),
        )
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the final report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    info!("volrunner v{}", VERSION);

    if let Some(report) = run(&matches)? {
        println!("{}", report);
    }
    Ok(())
}

/// Load the job named by `--config` and run it. Without `--config`, print
/// help and do nothing.
fn run(matches: &ArgMatches) -> anyhow::Result<Option<RunReport>> {
    let Some(config_path) = matches.get_one::<PathBuf>("config") else {
        cli().print_help()?;
        return Ok(None);
    };

    let spec = load_job(config_path)?;
    info!(
        "Loaded job: {} image(s) x {} plugin(s), output in {}",
        spec.images().len(),
        spec.plugins().len(),
        spec.output_dir().display()
    );

    Ok(Some(Orchestrator::new(&spec).run()))
}

/// Parse and validate the job document. Every validation issue is logged
/// before the error is returned.
fn load_job(path: &Path) -> anyhow::Result<JobSpec> {
    let raw = jobspec::parse_config_file(path)
        .with_context(|| format!("loading config {}", path.display()))?;

    raw.validate().map_err(|e| {
        for issue in e.issues() {
            error!("{}", issue);
        }
        anyhow::Error::new(e)
    })
}
