use crate::api::CaseApi;
use crate::error::ApiError;
use crate::image::SourceImage;
use crate::state::ProvisionalResult;
use shared::{CommitRequest, Credential, PatientRecord, ProcessResponse, Session, TempId};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub(crate) fn intern() -> Session {
    Session::intern("2019/0042", "tok-1")
}

pub(crate) fn image(name: &str) -> SourceImage {
    SourceImage::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

pub(crate) fn response(temp_id: &str) -> ProcessResponse {
    ProcessResponse {
        temp_id: TempId::new(temp_id),
        pred_label: "positive".into(),
        pred_accuracy: 78.5,
        xray_url: format!("/api/v1/records/{}/xray", temp_id),
        gradcam_url: format!("/api/v1/records/{}/gradcam", temp_id),
        expires_in_seconds: Some(600),
    }
}

pub(crate) fn provisional(temp_id: &str) -> ProvisionalResult {
    response(temp_id).into()
}

pub(crate) fn record(case_id: &str) -> PatientRecord {
    PatientRecord {
        case_id: case_id.into(),
        student_id: "2019/0042".into(),
        notes: "note".into(),
        pred_label: "positive".into(),
        pred_accuracy: 78.5,
        xray_url: format!("/api/v1/records/{}/xray", case_id),
        gradcam_url: format!("/api/v1/records/{}/gradcam", case_id),
    }
}

/// Shared log of released preview handles.
#[derive(Clone, Default)]
pub(crate) struct Releases(Rc<RefCell<Vec<String>>>);

impl Releases {
    pub(crate) fn names(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Preview handle that records when it is dropped.
#[derive(Debug)]
pub(crate) struct Probe {
    name: String,
    releases: Rc<RefCell<Vec<String>>>,
}

impl Probe {
    pub(crate) fn new(name: &str, releases: &Releases) -> Self {
        Self {
            name: name.to_string(),
            releases: releases.0.clone(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.releases.borrow_mut().push(self.name.clone());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Submit(String),
    FetchArtifact(String),
    Discard(TempId),
    Commit(CommitRequest),
}

/// Scripted backend. Unscripted submits and commits fail with a network
/// error; unscripted artifact fetches and discards succeed.
#[derive(Default)]
pub(crate) struct MockApi {
    calls: RefCell<Vec<Call>>,
    submits: RefCell<VecDeque<Result<ProcessResponse, ApiError>>>,
    artifacts: RefCell<VecDeque<Result<Vec<u8>, ApiError>>>,
    commits: RefCell<VecDeque<Result<PatientRecord, ApiError>>>,
    discard_error: RefCell<Option<ApiError>>,
}

impl MockApi {
    pub(crate) fn push_submit(&self, result: Result<ProcessResponse, ApiError>) {
        self.submits.borrow_mut().push_back(result);
    }

    pub(crate) fn push_artifact(&self, result: Result<Vec<u8>, ApiError>) {
        self.artifacts.borrow_mut().push_back(result);
    }

    pub(crate) fn push_commit(&self, result: Result<PatientRecord, ApiError>) {
        self.commits.borrow_mut().push_back(result);
    }

    pub(crate) fn fail_discards(&self, err: ApiError) {
        *self.discard_error.borrow_mut() = Some(err);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn discards(&self) -> Vec<TempId> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Discard(temp_id) => Some(temp_id.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn unscripted() -> ApiError {
    ApiError::Network("no scripted response".into())
}

impl CaseApi for MockApi {
    async fn submit(&self, image: &SourceImage, _credential: &Credential) -> Result<ProcessResponse, ApiError> {
        self.record(Call::Submit(image.name().to_string()));
        self.submits.borrow_mut().pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn fetch_artifact(&self, locator: &str, _credential: &Credential) -> Result<Vec<u8>, ApiError> {
        self.record(Call::FetchArtifact(locator.to_string()));
        self.artifacts
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(b"gradcam".to_vec()))
    }

    async fn discard_temp(&self, temp_id: &TempId, _credential: &Credential) -> Result<(), ApiError> {
        self.record(Call::Discard(temp_id.clone()));
        match self.discard_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn commit(&self, request: &CommitRequest, _credential: &Credential) -> Result<PatientRecord, ApiError> {
        self.record(Call::Commit(request.clone()));
        self.commits.borrow_mut().pop_front().unwrap_or_else(|| Err(unscripted()))
    }
}
