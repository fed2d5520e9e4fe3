use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use image::RgbImage;
use ort::session::Session;
use ort::value::Value;
use tokio::sync::Mutex;

use crate::adapters::onnx::{image_tensor, load_session};
use crate::application::ports::InferencePort;
use crate::domain::{
    errors::{DomainError, DomainResult},
    inference::{ModelOutput, PredictOptions},
};

// Classification checkpoints are exported at 224x224.
const INPUT_SIZE: usize = 224;

/// The pretrained grade classifier. Output is one probability row; the
/// top-1 index and its confidence are what interpretation consumes.
pub struct OnnxGradeClassifier {
    session: Mutex<Session>,
    names: HashMap<usize, String>,
}

impl OnnxGradeClassifier {
    pub fn load(weights: &Path, names: HashMap<usize, String>) -> Result<Self> {
        Ok(Self {
            session: Mutex::new(load_session(weights)?),
            names,
        })
    }

    fn classify(session: &mut Session, rgb: &RgbImage) -> Result<(usize, f32)> {
        let input = image_tensor(rgb, INPUT_SIZE);
        let input_shape = vec![1, 3, INPUT_SIZE as i64, INPUT_SIZE as i64];
        let input_tensor = Value::from_array((input_shape, input.into_raw_vec()))?;

        let outputs = session.run(ort::inputs![input_tensor])?;
        let (_, probs) = outputs[0].try_extract_tensor::<f32>()?;

        probs
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(index, &confidence)| (index, confidence))
            .ok_or_else(|| anyhow!("classification output is empty"))
    }
}

#[async_trait]
impl InferencePort for OnnxGradeClassifier {
    // Thresholds are accepted for interface parity; the exported model
    // already emits normalized probabilities and has no overlap stage.
    async fn predict(&self, image_path: &Path, _options: PredictOptions) -> DomainResult<ModelOutput> {
        let rgb = image::open(image_path)
            .map_err(|e| DomainError::Inference(e.to_string()))?
            .to_rgb8();

        let mut session = self.session.lock().await;
        let (index, confidence) = Self::classify(&mut *session, &rgb)
            .map_err(|e| DomainError::Inference(e.to_string()))?;

        Ok(ModelOutput::TopClass {
            index,
            confidence,
            names: (!self.names.is_empty()).then(|| self.names.clone()),
        })
    }
}
