use crate::config::BackendConfig;
use crate::provider::{BookingBackend, ClientError, ClientResult};
use crate::types::{Credentials, FunctionCall, FunctionReply, SiteResponse};
use async_trait::async_trait;
use tracing::debug;

/// `BookingBackend` over HTTP against the live site and hosted backend.
pub struct HostedBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HostedBackend {
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        config
            .validate()
            .map_err(|message| ClientError::InvalidConfig { message })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Unknown {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        credentials: Credentials,
    ) -> reqwest::RequestBuilder {
        let builder = builder.header("apikey", &self.config.api_key);
        match credentials {
            Credentials::Full => builder.bearer_auth(&self.config.api_key),
            Credentials::ApiKeyOnly => builder,
        }
    }

    fn handle_http_error(url: &str, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            ClientError::Unreachable {
                url: url.to_string(),
            }
        } else {
            ClientError::Network(err)
        }
    }

    async fn into_reply(url: &str, response: reqwest::Response) -> ClientResult<FunctionReply> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Self::handle_http_error(url, e))?;
        debug!("{} -> {}", url, status);
        Ok(FunctionReply::new(status, text))
    }
}

#[async_trait]
impl BookingBackend for HostedBackend {
    async fn fetch_site(&self, path: &str) -> ClientResult<SiteResponse> {
        let url = self.config.site_endpoint(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::handle_http_error(&url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::handle_http_error(&url, e))?;
        debug!("{} -> {} ({} bytes)", url, status, body.len());

        Ok(SiteResponse {
            status,
            body: body.to_vec(),
        })
    }

    async fn query_table(&self, table: &str, query: &str) -> ClientResult<FunctionReply> {
        let endpoint = self.config.rest_endpoint(table);
        let url = if query.is_empty() {
            endpoint
        } else {
            format!("{}?{}", endpoint, query)
        };
        debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url), Credentials::Full)
            .send()
            .await
            .map_err(|e| Self::handle_http_error(&url, e))?;

        Self::into_reply(&url, response).await
    }

    async fn call_function(&self, call: FunctionCall) -> ClientResult<FunctionReply> {
        let url = self.config.function_endpoint(&call.name);
        debug!("{:?} {}", call.method, url);

        let mut builder = self.authorize(
            self.client.request(call.method.as_reqwest(), &url),
            call.credentials,
        );
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::handle_http_error(&url, e))?;

        Self::into_reply(&url, response).await
    }

    fn backend_name(&self) -> &'static str {
        "hosted"
    }
}
