use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin serving the static pages and assets.
    pub site_url: String,
    /// Origin of the hosted backend (REST and function endpoints).
    pub backend_url: String,
    /// Public (anon) API key sent as both `apikey` and bearer token.
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:8080".to_string(),
            backend_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    pub fn with_backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of a path on the site origin, e.g. `site_endpoint("/app.js")`.
    pub fn site_endpoint(&self, path: &str) -> String {
        join_url(&self.site_url, path)
    }

    /// URL of a REST table, e.g. `rest/v1/bookings`.
    pub fn rest_endpoint(&self, table: &str) -> String {
        join_url(&self.backend_url, &format!("rest/v1/{}", table))
    }

    /// URL of a deployed function, e.g. `functions/v1/create-booking`.
    pub fn function_endpoint(&self, name: &str) -> String {
        join_url(&self.backend_url, &format!("functions/v1/{}", name))
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_url("Site URL", &self.site_url)?;
        validate_url("Backend URL", &self.backend_url)?;

        if self.api_key.trim().is_empty() {
            return Err("API key cannot be empty".to_string());
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

fn validate_url(label: &str, url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err(format!("{} cannot be empty", label));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(format!("{} must start with http:// or https://", label));
    }

    Ok(())
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}
