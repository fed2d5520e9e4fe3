use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::adapters::http::state::HttpState;
use crate::application::dto::{
    ErrorResponse, GradeAnalysisResponse, HealthResponse, PartAnalysisResponse,
};

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of the multipart body. Mirrors the upload
/// contract: a missing field is "No file part", a field without a filename
/// is "No selected file"; both are client errors and nothing is staged.
async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, Response> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(client_error("No selected file"));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| server_error("업로드 본문을 읽지 못했습니다", e.to_string()))?;
        return Ok(UploadedFile { filename, bytes: bytes.to_vec() });
    }
    Err(client_error("No file part"))
}

fn client_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message.to_string() }),
    )
        .into_response()
}

fn server_error(context: &str, detail: impl std::fmt::Display) -> Response {
    let message = format!("{context}: {detail}");
    error!("{message}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

pub async fn analyze_part(State(st): State<HttpState>, multipart: Multipart) -> Response {
    let upload = match read_file_field(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    match st.analysis.analyze_part(&upload.filename, &upload.bytes).await {
        Ok(insight) => Json(PartAnalysisResponse::from(insight)).into_response(),
        Err(e) => server_error("부위 분석 중 오류 발생", e),
    }
}

pub async fn analyze_grade(State(st): State<HttpState>, multipart: Multipart) -> Response {
    let upload = match read_file_field(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    match st.analysis.analyze_grade(&upload.filename, &upload.bytes).await {
        Ok(insight) => Json(GradeAnalysisResponse::from(insight)).into_response(),
        Err(e) => server_error("등급 분석 중 오류 발생", e),
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
