use std::env;
use std::path::PathBuf;

/// Runtime configuration, resolved once at startup from the environment.
/// Weight paths and the upload directory are deployment-specific and never
/// part of the HTTP protocol.
#[derive(Debug, Clone)]
pub struct Config {
    pub part_model: PathBuf,
    pub grade_model: PathBuf,
    pub part_labels: Option<PathBuf>,
    pub grade_labels: Option<PathBuf>,
    pub upload_dir: PathBuf,
    pub bind: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            part_model: env_path("BEEF_PART_MODEL", "weights/best_part.onnx"),
            grade_model: env_path("BEEF_GRADE_MODEL", "weights/best_grade.onnx"),
            part_labels: env::var("BEEF_PART_LABELS").ok().map(PathBuf::from),
            grade_labels: env::var("BEEF_GRADE_LABELS").ok().map(PathBuf::from),
            upload_dir: env_path("BEEF_UPLOAD_DIR", "temp_uploads"),
            bind: env::var("BEEF_BIND").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
        }
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}
