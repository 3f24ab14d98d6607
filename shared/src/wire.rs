use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Server-issued identifier of a provisional (uncommitted) analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct TempId(String);

impl TempId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PredictionLabel {
    Positive,
    Negative,
}

// POST /process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub temp_id: TempId,
    pub pred_label: String,
    pub pred_accuracy: f64,
    pub xray_url: String,
    pub gradcam_url: String,
    #[serde(default)]
    pub expires_in_seconds: Option<u64>,
}

impl ProcessResponse {
    pub fn label(&self) -> Option<PredictionLabel> {
        self.pred_label.parse().ok()
    }
}

// DELETE /process/{temp_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardAck {
    pub status: String,
    pub temp_id: TempId,
}

// POST /records/commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub temp_id: TempId,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub case_id: String,
    pub student_id: String,
    #[serde(default)]
    pub notes: String,
    pub pred_label: String,
    pub pred_accuracy: f64,
    pub xray_url: String,
    pub gradcam_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternLoginRequest {
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternLoginResponse {
    pub token: String,
}

/// Error body of a non-success response. `detail` is a plain string for
/// handled errors and a list of objects for request validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }

    /// Human-readable message for a failed response, preferring the
    /// server's `detail` and falling back to the raw body.
    pub fn message_from_body(status: u16, body: &str) -> String {
        match serde_json::from_str::<ErrorDetail>(body) {
            Ok(parsed) => parsed.message(),
            Err(_) if body.trim().is_empty() => format!("Server error: {}", status),
            Err(_) => body.trim().to_string(),
        }
    }
}
