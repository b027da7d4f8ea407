use std::sync::Arc;

use crate::analysis::engine::AnalysisEngine;
use crate::analysis::store::UploadStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: UploadStore,
    /// Pluggable analysis engine. Default: `ProcessEngine` built from
    /// ENGINE_COMMAND; tests swap in a scripted double.
    pub engine: Arc<dyn AnalysisEngine>,
}
