//! Axum route handlers for the analysis API.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::analysis::result::analysis_result;
use crate::config::RetentionPolicy;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze
///
/// Multipart form: `resume` (binary, required) and `job_description`
/// (text, optional; empty or whitespace-only is the same as absent).
/// Persists the upload, runs the engine to completion, and relays the
/// engine's JSON verbatim. Exactly one result or one error envelope per
/// request; a failure is terminal and the client must resubmit.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let submission = collect_submission(multipart).await?;

    let stored = state
        .store
        .persist(&submission.filename, &submission.content)
        .await?;
    debug!(
        "analyzing {} stored at {} ({})",
        stored.original_filename(),
        stored.path().display(),
        stored.created_at(),
    );

    let outcome = run_analysis(
        &state,
        stored.path(),
        submission.job_description.as_deref(),
    )
    .await;

    // The upload's fate is decided once the outcome is known, success
    // or failure alike.
    if state.config.retention == RetentionPolicy::Delete {
        stored.discard().await;
    }

    outcome.map(Json)
}

async fn run_analysis(
    state: &AppState,
    document: &Path,
    job_description: Option<&str>,
) -> Result<Value, AppError> {
    let output = state.engine.invoke(document, job_description).await?;
    analysis_result(&output)
}

struct Submission {
    filename: String,
    content: Bytes,
    job_description: Option<String>,
}

async fn collect_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut document: Option<(String, Bytes)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?;
                document = Some((filename, content));
            }
            "job_description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?;
                let text = text.trim();
                job_description = (!text.is_empty()).then(|| text.to_string());
            }
            other => {
                debug!("ignoring unexpected multipart field '{other}'");
                let _ = field.bytes().await;
            }
        }
    }

    let (filename, content) = document.ok_or(AppError::MissingDocument)?;
    Ok(Submission {
        filename,
        content,
        job_description,
    })
}
