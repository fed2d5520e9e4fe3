use std::path::Path;

use async_trait::async_trait;

use crate::domain::{
    errors::DomainResult,
    inference::{ModelOutput, PredictOptions},
};

/// Seam to the external model library. One implementation per pretrained
/// model; both are loaded once at startup and shared across requests.
#[async_trait]
pub trait InferencePort: Send + Sync {
    async fn predict(&self, image_path: &Path, options: PredictOptions) -> DomainResult<ModelOutput>;
}
