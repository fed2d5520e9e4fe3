use std::sync::Arc;

use crate::application::services::AnalysisService;

/// Shared state for the axum handlers. Holds the gateway use case with the
/// two pretrained models already injected, never ambient globals.
#[derive(Clone)]
pub struct HttpState {
    pub analysis: Arc<AnalysisService>,
}
