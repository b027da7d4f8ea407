//! Analysis engine invocation.
//!
//! The external scoring engine is a subprocess, invoked as
//! `<engine> <documentPath> [jobDescriptionText]`. It must write exactly
//! one JSON object to stdout and exit zero on success; anything on
//! stderr is diagnostic only. The trait seam keeps the engine's
//! implementation language irrelevant to the pipeline and lets tests
//! substitute a scripted double.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Captured streams and exit of one engine run.
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Everything the engine wrote to stdout, in order, to completion.
    pub stdout: Vec<u8>,
    /// Diagnostic stream; logged, never part of the result.
    pub stderr: Vec<u8>,
    /// Exit code; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
}

impl EngineOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Runs one analysis to completion. A non-zero exit is not an error
    /// at this layer; it is recorded in the output and surfaced when
    /// the result is turned into a response.
    async fn invoke(
        &self,
        document: &Path,
        job_description: Option<&str>,
    ) -> Result<EngineOutput, AppError>;
}

/// Engine backed by a child process. Each invocation spawns an
/// independent process; nothing is shared across concurrent requests.
pub struct ProcessEngine {
    program: String,
    base_args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessEngine {
    pub fn new(
        program: impl Into<String>,
        base_args: Vec<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            program: program.into(),
            base_args,
            timeout,
        }
    }

    /// Builds an engine from a whitespace-separated command line, e.g.
    /// `python extract_text.py`. Quoted arguments are not supported.
    pub fn from_command(command: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let Some(program) = parts.next() else {
            bail!("ENGINE_COMMAND is empty");
        };
        Ok(Self::new(program, parts.collect(), timeout))
    }
}

#[async_trait]
impl AnalysisEngine for ProcessEngine {
    async fn invoke(
        &self,
        document: &Path,
        job_description: Option<&str>,
    ) -> Result<EngineOutput, AppError> {
        let mut command = Command::new(&self.program);
        command.args(&self.base_args).arg(document);
        if let Some(jd) = job_description {
            command.arg(jd);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // If the request future is dropped (client gone, timeout),
            // the child must not outlive it.
            .kill_on_drop(true);

        debug!(
            "invoking {} for {} (job description: {})",
            self.program,
            document.display(),
            if job_description.is_some() { "yes" } else { "no" },
        );

        let child = command.spawn().map_err(AppError::EngineLaunch)?;
        let wait = child.wait_with_output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                AppError::EngineFailure(format!(
                    "analysis engine exceeded the {}s time limit",
                    limit.as_secs()
                ))
            })?,
            None => wait.await,
        }
        .map_err(|e| AppError::EngineFailure(format!("failed waiting for analysis engine: {e}")))?;

        if !output.stderr.is_empty() {
            warn!(
                "analysis engine stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        Ok(EngineOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code(),
        })
    }
}
