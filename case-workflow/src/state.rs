use shared::{PredictionLabel, ProcessResponse, TempId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WorkflowState {
    /// No image selected yet.
    Idle,
    /// Image selected, nothing submitted.
    Ready,
    Processing,
    /// Provisional result held, not yet committed.
    Resulted,
    Committing,
    Committed,
    Abandoned,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Committed | WorkflowState::Abandoned)
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, WorkflowState::Processing | WorkflowState::Committing)
    }
}

/// Inference output held by the server under a temporary id until it is
/// committed, discarded, or expires.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionalResult {
    pub temp_id: TempId,
    pub pred_label: String,
    /// Model confidence, 0-100.
    pub pred_accuracy: f64,
    pub gradcam_reference: String,
    pub xray_reference: String,
    pub expires_in_seconds: Option<u64>,
}

impl ProvisionalResult {
    pub fn label(&self) -> Option<PredictionLabel> {
        self.pred_label.parse().ok()
    }
}

impl From<ProcessResponse> for ProvisionalResult {
    fn from(response: ProcessResponse) -> Self {
        Self {
            temp_id: response.temp_id,
            pred_label: response.pred_label,
            pred_accuracy: response.pred_accuracy.clamp(0.0, 100.0),
            gradcam_reference: response.gradcam_url,
            xray_reference: response.xray_url,
            expires_in_seconds: response.expires_in_seconds,
        }
    }
}
