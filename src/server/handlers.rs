use super::types::{ChatData, ChatRequest, DiagnosisData, HealthResponse, RelayResponse};
use crate::{
    Error, Result,
    cases::{CaseRecord, CaseStore},
    runpod::{InferenceClient, RunpodRequest, normalize_chat, normalize_diagnosis},
    upload::{UploadPolicy, encode_image, image_hash},
};
use axum::{
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};
use std::{sync::Arc, time::Instant};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub cases: Arc<CaseStore>,
    pub inference: Option<Arc<dyn InferenceClient>>,
    pub upload: Arc<UploadPolicy>,
}

impl AppState {
    fn inference(&self) -> Result<&Arc<dyn InferenceClient>> {
        self.inference.as_ref().ok_or(Error::RunpodConfigMissing)
    }
}

struct ImageUpload {
    bytes: Bytes,
    case_id: Option<String>,
}

pub async fn root() -> Json<Value> {
    Json(json!({"msg": "OK"}))
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        runpod_configured: state.inference.is_some(),
        cases: state.cases.len()?,
    }))
}

pub async fn predict(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<RelayResponse<DiagnosisData>>> {
    let request_id = Uuid::new_v4();
    let upload = read_upload(&state.upload, multipart?).await?;
    let inference = state.inference()?;

    let image_hash = image_hash(&upload.bytes);
    info!(
        %request_id,
        image_hash = %image_hash,
        size = upload.bytes.len(),
        case_id = upload.case_id.as_deref().unwrap_or(""),
        "Received diagnosis request"
    );

    let request = RunpodRequest::diagnosis(encode_image(&upload.bytes), upload.case_id.clone());
    let started = Instant::now();
    let upstream = inference.submit(request).await?;
    let outcome = normalize_diagnosis(&upstream.body, upload.case_id.as_deref());

    let case_id = outcome
        .case_id
        .or(upload.case_id)
        .unwrap_or_else(|| image_hash.clone());

    let record = CaseRecord::new(
        case_id.clone(),
        outcome.diagnosis.clone(),
        outcome.report_markdown.clone(),
    );
    if record.has_content() {
        state.cases.insert(record)?;
    } else {
        warn!(%request_id, %case_id, "Runpod returned no diagnosis or report, case not cached");
    }

    info!(
        %request_id,
        %case_id,
        upstream_status = upstream.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Diagnosis relayed"
    );

    Ok(Json(RelayResponse {
        status: upstream.relay_status().to_string(),
        upstream_status: upstream.status,
        data: DiagnosisData {
            report_markdown: outcome.report_markdown,
            diagnosis: outcome.diagnosis,
            case_id,
            mode: outcome.mode,
            image_hash,
        },
    }))
}

pub async fn chat(
    State(state): State<AppState>,
    request: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<RelayResponse<ChatData>>> {
    let request_id = Uuid::new_v4();
    let Json(request) = request?;
    let inference = state.inference()?;

    let case = state
        .cases
        .get(&request.case_id)?
        .ok_or_else(|| Error::CaseNotFound {
            case_id: request.case_id.clone(),
        })?;

    let answer_mode = request.answer_mode();
    info!(
        %request_id,
        case_id = %request.case_id,
        answer_mode,
        "Received chat request"
    );

    let payload = RunpodRequest::chat(
        request.case_id.as_str(),
        request.message.as_str(),
        answer_mode,
        case.diagnosis,
        case.report_markdown,
    );
    let started = Instant::now();
    let upstream = inference.submit(payload).await?;
    let outcome = normalize_chat(&upstream.body, &request.case_id, answer_mode);

    info!(
        %request_id,
        case_id = %outcome.case_id,
        upstream_status = upstream.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Chat answer relayed"
    );

    Ok(Json(RelayResponse {
        status: upstream.relay_status().to_string(),
        upstream_status: upstream.status,
        data: ChatData {
            answer: outcome.answer,
            case_id: outcome.case_id,
            mode: outcome.mode,
            answer_mode: outcome.answer_mode,
        },
    }))
}

/// Pulls the `image` file and optional `case_id` out of the form, validating the image.
async fn read_upload(policy: &UploadPolicy, mut multipart: Multipart) -> Result<ImageUpload> {
    let mut bytes = None;
    let mut case_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(policy, e))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                policy.check_content_type(field.content_type())?;
                let data = field.bytes().await.map_err(|e| multipart_error(policy, e))?;
                policy.check_size(data.len())?;
                bytes = Some(data);
            }
            Some("case_id") => {
                let text = field.text().await.map_err(|e| multipart_error(policy, e))?;
                case_id = Some(text).filter(|id| !id.is_empty());
            }
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| {
        Error::bad_input(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Missing required form field 'image'",
        )
    })?;

    Ok(ImageUpload { bytes, case_id })
}

fn multipart_error(policy: &UploadPolicy, err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::FileTooLarge {
            limit_mb: policy.max_file_mb(),
        }
    } else {
        Error::bad_input(err.status(), err.body_text())
    }
}
