use serde::{Deserialize, Serialize};

use crate::domain::insight::Insight;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartAnalysisResponse {
    pub detected_part: String,
    pub insight: String,
    pub status: String,
}

impl From<Insight> for PartAnalysisResponse {
    fn from(insight: Insight) -> Self {
        Self {
            detected_part: insight.label,
            insight: insight.message,
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeAnalysisResponse {
    pub detected_grade: String,
    pub insight: String,
    pub status: String,
}

impl From<Insight> for GradeAnalysisResponse {
    fn from(insight: Insight) -> Self {
        Self {
            detected_grade: insight.label,
            insight: insight.message,
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}
