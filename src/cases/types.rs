use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: String,
    pub diagnosis: Option<Value>,
    pub report_markdown: String,
    pub created_at: DateTime<Utc>,
}

impl CaseRecord {
    pub fn new(case_id: String, diagnosis: Option<Value>, report_markdown: String) -> Self {
        Self {
            case_id,
            diagnosis,
            report_markdown,
            created_at: Utc::now(),
        }
    }

    /// A record with neither a diagnosis nor a report has nothing to chat about.
    pub fn has_content(&self) -> bool {
        self.diagnosis.is_some() || !self.report_markdown.is_empty()
    }
}
