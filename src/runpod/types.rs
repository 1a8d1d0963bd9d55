use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ANSWER_MODE: &str = "brief";

/// Body accepted by the Runpod handler, always wrapped in `input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunpodRequest {
    pub input: RunpodInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunpodInput {
    Diag {
        images: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        case_id: Option<String>,
    },
    Chat {
        case_id: String,
        question: String,
        answer_mode: String,
        diagnosis: Option<Value>,
        report_markdown: String,
    },
}

impl RunpodRequest {
    pub fn diagnosis(image_b64: String, case_id: Option<String>) -> Self {
        Self {
            input: RunpodInput::Diag {
                images: vec![image_b64],
                case_id: case_id.filter(|id| !id.is_empty()),
            },
        }
    }

    pub fn chat(
        case_id: impl Into<String>,
        question: impl Into<String>,
        answer_mode: impl Into<String>,
        diagnosis: Option<Value>,
        report_markdown: impl Into<String>,
    ) -> Self {
        Self {
            input: RunpodInput::Chat {
                case_id: case_id.into(),
                question: question.into(),
                answer_mode: answer_mode.into(),
                diagnosis,
                report_markdown: report_markdown.into(),
            },
        }
    }

    pub fn mode(&self) -> &'static str {
        match self.input {
            RunpodInput::Diag { .. } => "diag",
            RunpodInput::Chat { .. } => "chat",
        }
    }
}

/// Lifecycle states reported by the job status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    InQueue,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    TimedOut,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::InQueue | Self::InProgress)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::TimedOut)
    }
}

/// Final HTTP status and decoded body of a remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Reads the body as JSON, keeping non-JSON payloads as a string.
    pub async fn read(response: reqwest::Response) -> crate::Result<Self> {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(crate::Error::from_upstream)?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(Self { status, body })
    }

    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn job_id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }

    pub fn job_status(&self) -> Option<JobStatus> {
        self.body
            .get("status")
            .and_then(|status| serde_json::from_value(status.clone()).ok())
    }

    /// Job id of a response that has not produced output yet.
    pub fn pending_job_id(&self) -> Option<&str> {
        match self.job_status() {
            Some(status) if status.is_pending() => self.job_id(),
            _ => None,
        }
    }

    /// Relay status reported to the client.
    pub fn relay_status(&self) -> &'static str {
        let job_failed = self.job_status().is_some_and(JobStatus::is_failure);
        if self.status == 200 && !job_failed {
            "ok"
        } else {
            "runpod_error"
        }
    }
}
