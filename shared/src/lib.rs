pub mod config;
pub mod session;
pub mod wire;

pub use config::ApiConfig;
pub use session::{Credential, Role, Session};
pub use wire::{
    CommitRequest, DiscardAck, ErrorDetail, InternLoginRequest, InternLoginResponse, PatientRecord,
    PredictionLabel, ProcessResponse, TempId,
};
