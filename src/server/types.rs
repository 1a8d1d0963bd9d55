use crate::runpod::DEFAULT_ANSWER_MODE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub case_id: String,
    pub message: String,
    #[serde(default)]
    pub answer_mode: Option<String>,
}

impl ChatRequest {
    /// Requested answer style, `brief` unless the client asked for another.
    pub fn answer_mode(&self) -> &str {
        self.answer_mode
            .as_deref()
            .filter(|mode| !mode.is_empty())
            .unwrap_or(DEFAULT_ANSWER_MODE)
    }
}

/// Envelope shared by every relayed call.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelayResponse<T> {
    pub status: String,
    pub upstream_status: u16,
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagnosisData {
    pub report_markdown: String,
    pub diagnosis: Option<Value>,
    pub case_id: String,
    pub mode: String,
    pub image_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatData {
    pub answer: Value,
    pub case_id: String,
    pub mode: String,
    pub answer_mode: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub runpod_configured: bool,
    pub cases: usize,
}
