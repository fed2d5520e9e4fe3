use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::detection::Detection;

/// Output of one model invocation, decoded once at the library boundary.
///
/// The part detector produces `Detections`; the grade classifier produces
/// `TopClass`. The interpreter accepts either variant in either mode and
/// degrades gracefully on a mismatch.
#[derive(Debug, Clone)]
pub enum ModelOutput {
    Detections {
        regions: Vec<Detection>,
        names: HashMap<usize, String>,
    },
    TopClass {
        index: usize,
        confidence: f32,
        names: Option<HashMap<usize, String>>,
    },
}

/// Thresholds handed to the model for one prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictOptions {
    pub conf_threshold: f32,
    /// Overlap suppression threshold; `None` for classification.
    pub iou_threshold: Option<f32>,
}

impl PredictOptions {
    /// Thresholds used for part detection requests.
    pub fn part() -> Self {
        Self { conf_threshold: 0.5, iou_threshold: Some(0.5) }
    }

    /// Thresholds used for grade classification requests.
    pub fn grade() -> Self {
        Self { conf_threshold: 0.5, iou_threshold: None }
    }
}
