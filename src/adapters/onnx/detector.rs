use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use image::RgbImage;
use ndarray::{s, ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Value;
use tokio::sync::Mutex;

use crate::adapters::onnx::{image_tensor, load_session};
use crate::application::ports::InferencePort;
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
    inference::{ModelOutput, PredictOptions},
};

const INPUT_SIZE: usize = 640;

/// The pretrained beef-part detector. YOLO-style head: one column per
/// candidate, box coordinates in rows 0..4, per-class scores after.
pub struct OnnxPartDetector {
    session: Mutex<Session>,
    names: HashMap<usize, String>,
}

impl OnnxPartDetector {
    pub fn load(weights: &Path, names: HashMap<usize, String>) -> Result<Self> {
        Ok(Self {
            session: Mutex::new(load_session(weights)?),
            names,
        })
    }

    fn detect(session: &mut Session, rgb: &RgbImage, conf_threshold: f32) -> Result<Vec<Detection>> {
        let input = image_tensor(rgb, INPUT_SIZE);
        let input_shape = vec![1, 3, INPUT_SIZE as i64, INPUT_SIZE as i64];
        let input_tensor = Value::from_array((input_shape, input.into_raw_vec()))?;

        let outputs = session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.into_iter().map(|&x| x as usize).collect();
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view.index_axis(Axis(0), 0);

        let num_candidates = view.shape()[1];
        let sx = rgb.width() as f32 / INPUT_SIZE as f32;
        let sy = rgb.height() as f32 / INPUT_SIZE as f32;

        let mut detections = Vec::new();

        for i in 0..num_candidates {
            let scores = view.slice(s![4.., i]);
            let Some((class_id, &max_score)) = scores
                .indexed_iter()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            else {
                continue;
            };

            if max_score > conf_threshold {
                let cx = view[[0, i]];
                let cy = view[[1, i]];
                let w = view[[2, i]];
                let h = view[[3, i]];

                detections.push(Detection {
                    x1: (cx - w / 2.0) * sx,
                    y1: (cy - h / 2.0) * sy,
                    x2: (cx + w / 2.0) * sx,
                    y2: (cy + h / 2.0) * sy,
                    score: max_score,
                    class_id,
                });
            }
        }

        Ok(detections)
    }
}

/// Greedy per-class suppression: the highest-scoring box wins, rivals of the
/// same class overlapping it beyond `iou_threshold` are dropped.
fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_unstable_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut keep: Vec<Detection> = Vec::new();
    for det in detections {
        let suppressed = keep
            .iter()
            .any(|kept| kept.class_id == det.class_id && kept.iou(&det) > iou_threshold);
        if !suppressed {
            keep.push(det);
        }
    }
    keep
}

#[async_trait]
impl InferencePort for OnnxPartDetector {
    async fn predict(&self, image_path: &Path, options: PredictOptions) -> DomainResult<ModelOutput> {
        let rgb = image::open(image_path)
            .map_err(|e| DomainError::Inference(e.to_string()))?
            .to_rgb8();

        let mut session = self.session.lock().await;
        let mut regions = Self::detect(&mut *session, &rgb, options.conf_threshold)
            .map_err(|e| DomainError::Inference(e.to_string()))?;
        drop(session);

        if let Some(iou) = options.iou_threshold {
            regions = non_max_suppression(regions, iou);
        } else {
            regions.sort_unstable_by(|a, b| {
                b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
            });
        }

        Ok(ModelOutput::Detections {
            regions,
            names: self.names.clone(),
        })
    }
}
