//! Turns the loosely shaped Runpod output into the fields clients rely on.
//!
//! The handler may answer with `{"output": {...}}`, `{"result": {...}}`, a bare
//! object, or a plain value, so every field is looked up defensively.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisOutcome {
    pub report_markdown: String,
    pub diagnosis: Option<Value>,
    pub case_id: Option<String>,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub answer: Value,
    pub case_id: String,
    pub mode: String,
    pub answer_mode: String,
}

/// JSON truthiness: null, false, zero and empty containers are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn truthy_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_truthy(v))
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Case ids may come back as strings or numbers.
fn id_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => string_field(value, key),
    }
}

fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The payload inside the Runpod envelope.
pub fn core(raw: &Value) -> &Value {
    truthy_field(raw, "output")
        .or_else(|| truthy_field(raw, "result"))
        .unwrap_or(raw)
}

pub fn normalize_diagnosis(raw: &Value, requested_case_id: Option<&str>) -> DiagnosisOutcome {
    let core = core(raw);

    if core.is_object() {
        let report_markdown = match core.get("output") {
            None | Some(Value::Null) => String::new(),
            Some(output) => to_text(output),
        };

        DiagnosisOutcome {
            report_markdown,
            diagnosis: core.get("diagnosis").filter(|d| !d.is_null()).cloned(),
            case_id: id_field(core, "case_id"),
            mode: string_field(core, "mode").unwrap_or_else(|| "diag".to_string()),
        }
    } else {
        DiagnosisOutcome {
            report_markdown: to_text(core),
            diagnosis: None,
            case_id: requested_case_id
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
            mode: "diag".to_string(),
        }
    }
}

pub fn normalize_chat(
    raw: &Value,
    requested_case_id: &str,
    requested_answer_mode: &str,
) -> ChatOutcome {
    let core = core(raw);

    let outcome = if core.is_object() {
        let answer = truthy_field(core, "output")
            .or_else(|| truthy_field(core, "answer"))
            .or_else(|| truthy_field(core, "data"))
            .unwrap_or(core);

        ChatOutcome {
            answer: answer.clone(),
            case_id: id_field(core, "case_id").unwrap_or_else(|| requested_case_id.to_string()),
            mode: string_field(core, "mode").unwrap_or_else(|| "chat".to_string()),
            answer_mode: string_field(core, "answer_mode")
                .unwrap_or_else(|| requested_answer_mode.to_string()),
        }
    } else {
        ChatOutcome {
            answer: core.clone(),
            case_id: requested_case_id.to_string(),
            mode: "chat".to_string(),
            answer_mode: requested_answer_mode.to_string(),
        }
    };

    ChatOutcome {
        answer: flatten_answer(outcome.answer),
        ..outcome
    }
}

fn flatten_answer(answer: Value) -> Value {
    if !answer.is_object() {
        return answer;
    }
    match truthy_field(&answer, "output") {
        Some(output) => output.clone(),
        None => Value::String(answer.to_string()),
    }
}
