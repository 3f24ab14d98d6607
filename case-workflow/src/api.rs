use crate::error::ApiError;
use crate::image::SourceImage;
use shared::{CommitRequest, Credential, PatientRecord, ProcessResponse, TempId};

/// Backend collaborators consumed by the workflow: the inference service
/// and the case record store. Every call carries its own credential.
///
/// Futures are not required to be `Send`; the client runs on a single
/// threaded event loop.
#[allow(async_fn_in_trait)]
pub trait CaseApi {
    async fn submit(&self, image: &SourceImage, credential: &Credential) -> Result<ProcessResponse, ApiError>;

    async fn fetch_artifact(&self, locator: &str, credential: &Credential) -> Result<Vec<u8>, ApiError>;

    /// Deletes a provisional result. Callers treat failures as non-fatal.
    async fn discard_temp(&self, temp_id: &TempId, credential: &Credential) -> Result<(), ApiError>;

    async fn commit(&self, request: &CommitRequest, credential: &Credential) -> Result<PatientRecord, ApiError>;
}
