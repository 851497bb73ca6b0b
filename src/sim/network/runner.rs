//! External simulation processes.
//!
//! Each run blocks until the process exits; there is no timeout. A process
//! either fails to launch or fails to complete, and both abort the run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::CharacterizationError;

/// Runs one simulation for an input file and returns the results file path.
pub trait SimulationRunner {
    fn run(&self, input: &Path) -> Result<PathBuf>;
}

/// Locations of the external executables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPaths {
    /// Network solver; invoked as `simulator <input>`.
    pub simulator: PathBuf,
    /// Optional post-processor; invoked as `extractor <args..> <input>`.
    #[serde(default)]
    pub results_extractor: Option<PathBuf>,
    #[serde(default = "default_extractor_args")]
    pub extractor_args: Vec<String>,
    /// Extension of the results file written next to the input.
    #[serde(default = "default_results_extension")]
    pub results_extension: String,
}

fn default_extractor_args() -> Vec<String> {
    vec!["-a".to_string()]
}

fn default_results_extension() -> String {
    "sim".to_string()
}

impl ToolPaths {
    pub fn new(simulator: impl Into<PathBuf>) -> Self {
        Self {
            simulator: simulator.into(),
            results_extractor: None,
            extractor_args: default_extractor_args(),
            results_extension: default_results_extension(),
        }
    }

    pub fn with_extractor(mut self, extractor: impl Into<PathBuf>) -> Self {
        self.results_extractor = Some(extractor.into());
        self
    }
}

/// Launches `program` with `args` and waits for it to finish.
pub fn run_process(program: &Path, args: &[OsString]) -> Result<()> {
    let mut child = Command::new(program).args(args).spawn().map_err(|source| {
        CharacterizationError::LaunchFailed {
            program: program.to_path_buf(),
            source,
        }
    })?;

    let status = child
        .wait()
        .map_err(|e| CharacterizationError::CompletionFailed {
            program: program.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(CharacterizationError::CompletionFailed {
            program: program.to_path_buf(),
            reason: format!("process exited with {status}"),
        }
        .into());
    }
    Ok(())
}

/// [`SimulationRunner`] backed by external executables.
#[derive(Debug, Clone)]
pub struct ExternalRunner {
    tools: ToolPaths,
}

impl ExternalRunner {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }
}

impl SimulationRunner for ExternalRunner {
    fn run(&self, input: &Path) -> Result<PathBuf> {
        run_process(&self.tools.simulator, &[input.as_os_str().to_owned()])?;
        tracing::debug!("Simulation finished for {}", input.display());

        if let Some(extractor) = &self.tools.results_extractor {
            let mut args: Vec<OsString> =
                self.tools.extractor_args.iter().map(OsString::from).collect();
            args.push(input.as_os_str().to_owned());
            run_process(extractor, &args)?;
            tracing::debug!("Results extracted for {}", input.display());
        }

        Ok(input.with_extension(&self.tools.results_extension))
    }
}
