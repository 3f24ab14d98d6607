use case_workflow::{ApiError, CaseApi, SourceImage};
use gloo_file::Blob;
use gloo_net::http::{Request, RequestBuilder, Response};
use shared::{
    ApiConfig, CommitRequest, Credential, DiscardAck, ErrorDetail, InternLoginRequest,
    InternLoginResponse, PatientRecord, ProcessResponse, Session, TempId,
};
use wasm_bindgen::JsValue;

/// Backend location, overridable at build time with `HAHAI_API_BASE`.
pub fn api_config() -> ApiConfig {
    option_env!("HAHAI_API_BASE")
        .map(ApiConfig::with_base)
        .unwrap_or_default()
}

/// `CaseApi` over the browser's fetch.
#[derive(Clone)]
pub struct HttpCaseApi {
    config: ApiConfig,
}

impl HttpCaseApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn authorized(builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
    let (name, value) = credential.header();
    builder.header(name, value)
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn decode(err: gloo_net::Error) -> ApiError {
    ApiError::Decode(err.to_string())
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", err))
}

async fn checked(sent: Result<Response, gloo_net::Error>) -> Result<Response, ApiError> {
    let response = sent.map_err(network)?;
    if response.ok() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let url = response.url();
    let body = response.text().await.unwrap_or_default();
    let message = ErrorDetail::message_from_body(status, &body);
    log::error!("{} failed with status {}: {}", url, status, message);
    ApiError::Server { status, message }
}

impl CaseApi for HttpCaseApi {
    async fn submit(&self, image: &SourceImage, credential: &Credential) -> Result<ProcessResponse, ApiError> {
        let form_data = web_sys::FormData::new().map_err(js_error)?;
        let blob = Blob::new_with_options(image.bytes(), Some(image.media_type()));
        form_data
            .append_with_blob_and_filename("xray", blob.as_ref(), image.name())
            .map_err(js_error)?;

        let request = authorized(Request::post(&self.config.process_url()), credential)
            .body(form_data)
            .map_err(network)?;
        let response = checked(request.send().await).await?;
        response.json::<ProcessResponse>().await.map_err(decode)
    }

    async fn fetch_artifact(&self, locator: &str, credential: &Credential) -> Result<Vec<u8>, ApiError> {
        let url = self.config.resolve(locator);
        let response = checked(authorized(Request::get(&url), credential).send().await).await?;
        response.binary().await.map_err(decode)
    }

    async fn discard_temp(&self, temp_id: &TempId, credential: &Credential) -> Result<(), ApiError> {
        let url = self.config.temp_url(temp_id);
        let response = checked(authorized(Request::delete(&url), credential).send().await).await?;
        if let Ok(ack) = response.json::<DiscardAck>().await {
            log::debug!("Backend reported {} for {}", ack.status, ack.temp_id);
        }
        Ok(())
    }

    async fn commit(&self, request: &CommitRequest, credential: &Credential) -> Result<PatientRecord, ApiError> {
        let request = authorized(Request::post(&self.config.commit_url()), credential)
            .json(request)
            .map_err(network)?;
        let response = checked(request.send().await).await?;
        response.json::<PatientRecord>().await.map_err(decode)
    }
}

pub async fn login_intern(config: &ApiConfig, student_id: &str) -> Result<Session, ApiError> {
    let request = Request::post(&config.intern_login_url())
        .json(&InternLoginRequest {
            student_id: student_id.to_string(),
        })
        .map_err(network)?;
    let response = checked(request.send().await).await?;
    let login = response.json::<InternLoginResponse>().await.map_err(decode)?;
    Ok(Session::intern(student_id, login.token))
}
