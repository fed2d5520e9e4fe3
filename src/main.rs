use std::sync::Arc;

use anyhow::Context;

use beef_analysis_server::adapters::http::{router, state::HttpState};
use beef_analysis_server::adapters::onnx::{
    classifier::OnnxGradeClassifier, detector::OnnxPartDetector, labels,
};
use beef_analysis_server::application::services::AnalysisService;
use beef_analysis_server::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    tracing::info!("🔧 Loading pretrained models...");

    // Model-load failure is fatal; there is nothing to serve without them.
    let part_names = labels::load_label_table(config.part_labels.as_deref())
        .context("part label table")?;
    let grade_names = labels::load_label_table(config.grade_labels.as_deref())
        .context("grade label table")?;

    let part = Arc::new(
        OnnxPartDetector::load(&config.part_model, part_names)
            .with_context(|| format!("loading part model {}", config.part_model.display()))?,
    );
    let grade = Arc::new(
        OnnxGradeClassifier::load(&config.grade_model, grade_names)
            .with_context(|| format!("loading grade model {}", config.grade_model.display()))?,
    );
    tracing::info!("✅ AI models loaded");

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;

    let analysis = Arc::new(AnalysisService::new(part, grade, config.upload_dir.clone()));
    let state = HttpState { analysis };
    let app = router(state);

    tracing::info!("🚀 Analysis server listening on http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
