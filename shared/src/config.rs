use crate::wire::TempId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Where the backend lives and how its routes are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn process_url(&self) -> String {
        self.endpoint("process")
    }

    pub fn temp_url(&self, temp_id: &TempId) -> String {
        self.endpoint(&format!("process/{}", temp_id))
    }

    pub fn commit_url(&self) -> String {
        self.endpoint("records/commit")
    }

    pub fn intern_login_url(&self) -> String {
        self.endpoint("auth/intern/login")
    }

    /// Turns a locator returned by the backend into a fetchable URL.
    /// Absolute URLs pass through, root-relative ones are joined to the
    /// base, anything else is treated as an API path.
    pub fn resolve(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            locator.to_string()
        } else if locator.starts_with('/') {
            format!("{}{}", self.base_url.trim_end_matches('/'), locator)
        } else {
            self.endpoint(locator)
        }
    }
}
