use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::{
    application::{ports::InferencePort, staging::StagedUpload},
    domain::{
        errors::DomainResult,
        inference::{ModelOutput, PredictOptions},
        insight::{interpret, AnalysisMode, Insight},
    },
};

/// The inference gateway use case: stage an upload, run the matching model,
/// interpret the output, and guarantee the staged file is gone before the
/// response leaves.
pub struct AnalysisService {
    part: Arc<dyn InferencePort>,
    grade: Arc<dyn InferencePort>,
    upload_dir: PathBuf,
}

impl AnalysisService {
    pub fn new(
        part: Arc<dyn InferencePort>,
        grade: Arc<dyn InferencePort>,
        upload_dir: PathBuf,
    ) -> Self {
        Self { part, grade, upload_dir }
    }

    pub async fn analyze_part(&self, filename: &str, bytes: &[u8]) -> DomainResult<Insight> {
        let output = self
            .run_model(self.part.as_ref(), filename, bytes, PredictOptions::part())
            .await?;
        Ok(interpret(AnalysisMode::Part, &output, None))
    }

    pub async fn analyze_grade(&self, filename: &str, bytes: &[u8]) -> DomainResult<Insight> {
        let output = self
            .run_model(self.grade.as_ref(), filename, bytes, PredictOptions::grade())
            .await?;
        // The classifier's own label table doubles as the grade name map.
        let names = match &output {
            ModelOutput::TopClass { names, .. } => names.clone(),
            _ => None,
        };
        Ok(interpret(AnalysisMode::Grade, &output, names.as_ref()))
    }

    /// The staged file drops (and is removed) before this returns, on the
    /// error path included.
    async fn run_model(
        &self,
        port: &dyn InferencePort,
        filename: &str,
        bytes: &[u8],
        options: PredictOptions,
    ) -> DomainResult<ModelOutput> {
        let staged = StagedUpload::stage(&self.upload_dir, filename, bytes).await?;
        let started = Instant::now();
        let output = port.predict(staged.path(), options).await?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "inference finished"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::domain::errors::DomainError;

    #[derive(Debug, Clone)]
    struct SeenCall {
        path: PathBuf,
        existed: bool,
        options: PredictOptions,
    }

    /// Records the staged path it was handed and whether the file existed
    /// at prediction time.
    struct RecordingPort {
        seen: Mutex<Option<SeenCall>>,
        result: DomainResult<ModelOutput>,
    }

    impl RecordingPort {
        fn returning(result: DomainResult<ModelOutput>) -> Arc<Self> {
            Arc::new(Self { seen: Mutex::new(None), result })
        }

        fn seen(&self) -> SeenCall {
            self.seen.lock().unwrap().clone().expect("predict was never called")
        }
    }

    #[async_trait]
    impl InferencePort for RecordingPort {
        async fn predict(
            &self,
            image_path: &Path,
            options: PredictOptions,
        ) -> DomainResult<ModelOutput> {
            *self.seen.lock().unwrap() = Some(SeenCall {
                path: image_path.to_path_buf(),
                existed: image_path.exists(),
                options,
            });
            match &self.result {
                Ok(output) => Ok(output.clone()),
                Err(DomainError::Inference(msg)) => Err(DomainError::Inference(msg.clone())),
                Err(_) => Err(DomainError::Inference("unexpected".into())),
            }
        }
    }

    fn empty_detections() -> ModelOutput {
        ModelOutput::Detections { regions: vec![], names: HashMap::new() }
    }

    fn test_dir() -> PathBuf {
        std::env::temp_dir().join(format!("analysis-test-{}", Uuid::new_v4().simple()))
    }

    fn service(port: Arc<RecordingPort>, dir: PathBuf) -> AnalysisService {
        AnalysisService::new(port.clone(), port, dir)
    }

    #[tokio::test]
    async fn staged_file_exists_during_inference_and_is_gone_after() {
        let dir = test_dir();
        let port = RecordingPort::returning(Ok(empty_detections()));
        let svc = service(port.clone(), dir.clone());

        svc.analyze_part("cut.jpg", b"fake image").await.unwrap();

        let call = port.seen();
        assert!(call.existed);
        assert!(!call.path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn staged_file_is_removed_when_inference_fails() {
        let dir = test_dir();
        let port = RecordingPort::returning(Err(DomainError::Inference("model exploded".into())));
        let svc = service(port.clone(), dir.clone());

        let err = svc.analyze_part("cut.jpg", b"fake image").await.unwrap_err();
        assert!(err.to_string().contains("model exploded"));

        let call = port.seen();
        assert!(call.existed);
        assert!(!call.path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn part_requests_use_detection_thresholds() {
        let dir = test_dir();
        let port = RecordingPort::returning(Ok(empty_detections()));
        let svc = service(port.clone(), dir.clone());

        svc.analyze_part("cut.jpg", b"fake image").await.unwrap();
        assert_eq!(port.seen().options, PredictOptions::part());
        assert_eq!(port.seen().options.iou_threshold, Some(0.5));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn grade_requests_use_classification_thresholds() {
        let dir = test_dir();
        let port = RecordingPort::returning(Ok(ModelOutput::TopClass {
            index: 1,
            confidence: 0.8,
            names: None,
        }));
        let svc = service(port.clone(), dir.clone());

        svc.analyze_grade("cut.jpg", b"fake image").await.unwrap();
        assert_eq!(port.seen().options, PredictOptions::grade());
        assert_eq!(port.seen().options.iou_threshold, None);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn grade_label_table_is_passed_as_name_map() {
        let dir = test_dir();
        let names: HashMap<usize, String> = [(1usize, "1+".to_string())].into_iter().collect();
        let port = RecordingPort::returning(Ok(ModelOutput::TopClass {
            index: 1,
            confidence: 0.8,
            names: Some(names),
        }));
        let svc = service(port.clone(), dir.clone());

        let insight = svc.analyze_grade("cut.jpg", b"fake image").await.unwrap();
        assert_eq!(insight.label, "1+");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
