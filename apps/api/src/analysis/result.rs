//! Turns a captured engine run into the response payload.
//!
//! The pipeline is a transparent relay: a successful run's stdout is
//! parsed as one JSON value and passed through unchanged, with no schema
//! validation. Subprocess failures and malformed output collapse to the
//! uniform error shape; raw engine output only ever reaches the logs.

use serde_json::Value;
use tracing::error;

use crate::analysis::engine::EngineOutput;
use crate::errors::AppError;

const STDOUT_PREVIEW_BYTES: usize = 500;

pub fn analysis_result(output: &EngineOutput) -> Result<Value, AppError> {
    if !output.success() {
        return Err(AppError::EngineFailure(match output.status {
            Some(code) => format!("analysis engine exited with status {code}"),
            None => "analysis engine was terminated by a signal".to_string(),
        }));
    }

    serde_json::from_slice(&output.stdout).map_err(|e| {
        error!(
            "engine stdout is not valid JSON ({e}); first {} bytes: {:?}",
            output.stdout.len().min(STDOUT_PREVIEW_BYTES),
            stdout_preview(&output.stdout),
        );
        AppError::OutputParse(e.to_string())
    })
}

fn stdout_preview(stdout: &[u8]) -> String {
    String::from_utf8_lossy(&stdout[..stdout.len().min(STDOUT_PREVIEW_BYTES)]).into_owned()
}
