use crate::SourceError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const USER_AGENT: &str = "SpaceBioKE/1.0 (+https://projects.builder.codes)";

/// Shared outbound client for the NASA catalogues.
///
/// No request timeout is set unless one is configured, so a hanging
/// upstream holds the aggregation open for as long as it hangs.
#[derive(Debug, Clone)]
pub struct NasaHttp {
    client: Client,
}

impl NasaHttp {
    pub fn new(timeout: Option<Duration>) -> Result<Self, SourceError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GETs `url` and decodes the body as JSON. Non-2xx statuses and
    /// undecodable bodies are errors.
    pub async fn get_json(&self, backend: &str, url: Url) -> Result<Value, SourceError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                backend: backend.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|error| SourceError::BackendResponse {
            backend: backend.to_string(),
            details: error.to_string(),
        })
    }
}

/// Joins `path` onto `base` and appends URL-encoded query parameters.
pub fn endpoint_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, SourceError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Ok(Url::parse_with_params(&joined, params)?)
}
