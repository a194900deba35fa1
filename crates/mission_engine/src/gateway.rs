use std::time::Duration;

use futures_util::StreamExt;
use mission_core::{ApiError, FilterModel, Job, Stats, Status, SubmitOutcome};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/";

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    /// `None` keeps the transport default (no overall timeout).
    pub request_timeout: Option<Duration>,
    pub max_report_bytes: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
            max_report_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayInitError {
    #[error("invalid api base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("http client setup failed: {0}")]
    Client(String),
}

/// Typed access to the agent's HTTP API.
#[async_trait::async_trait]
pub trait ApiGateway: Send + Sync {
    async fn status(&self) -> Result<Status, ApiError>;

    async fn stats(&self) -> Result<Stats, ApiError>;

    /// At most `limit` jobs, most recent first as ordered by the agent.
    async fn recent_jobs(&self, limit: usize) -> Result<Vec<Job>, ApiError>;

    async fn submit_search(&self, filters: &FilterModel) -> Result<SubmitOutcome, ApiError>;

    /// Raw bytes of the exported spreadsheet.
    async fn download_report(&self) -> Result<Vec<u8>, ApiError>;
}

/// Body of the launch endpoint. Absence of `error` means accepted, unless the
/// agent flags the launch as unsupported in its environment.
#[derive(Debug, Default, Deserialize)]
struct LaunchReply {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    unsupported: bool,
}

impl From<LaunchReply> for SubmitOutcome {
    fn from(reply: LaunchReply) -> Self {
        if let Some(error) = reply.error {
            SubmitOutcome::rejected(error)
        } else if reply.unsupported {
            SubmitOutcome::rejected(
                reply
                    .message
                    .unwrap_or_else(|| "search not supported by agent".to_string()),
            )
        } else {
            SubmitOutcome::accepted()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorReply {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    base: Url,
    settings: GatewaySettings,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, GatewayInitError> {
        let mut base =
            Url::parse(&settings.base_url).map_err(|err| GatewayInitError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: err.to_string(),
            })?;
        // Joining relative paths replaces the last segment unless it ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayInitError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base,
            settings,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::Protocol(format!("cannot build url for {path}: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        decode_json(response).await
    }
}

#[async_trait::async_trait]
impl ApiGateway for ReqwestGateway {
    async fn status(&self) -> Result<Status, ApiError> {
        let status: Status = self.get_json(self.endpoint("api/status")?).await?;
        status.validate()?;
        Ok(status)
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        self.get_json(self.endpoint("api/stats")?).await
    }

    async fn recent_jobs(&self, limit: usize) -> Result<Vec<Job>, ApiError> {
        let mut url = self.endpoint("api/jobs")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let mut jobs: Vec<Job> = self.get_json(url).await?;
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn submit_search(&self, filters: &FilterModel) -> Result<SubmitOutcome, ApiError> {
        let body = serde_json::to_vec(filters)
            .map_err(|err| ApiError::Protocol(format!("cannot encode filters: {err}")))?;
        let response = self
            .client
            .post(self.endpoint("api/start-search")?)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let reply: LaunchReply = decode_json(response).await?;
        Ok(reply.into())
    }

    async fn download_report(&self) -> Result<Vec<u8>, ApiError> {
        let max_bytes = self.settings.max_report_bytes;
        let response = self
            .client
            .get(self.endpoint("api/download-report")?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Protocol(format!("unexpected http status {status}")));
        }

        // The agent answers with JSON instead of a file when no report exists.
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);
        if is_json {
            let reply: ErrorReply = decode_json(response).await?;
            return Err(ApiError::Application(
                reply
                    .error
                    .unwrap_or_else(|| "report unavailable".to_string()),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::Protocol(format!(
                    "report too large (max {max_bytes}, actual {content_len})"
                )));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ApiError::Protocol(format!(
                    "report too large (max {max_bytes}, actual at least {next_len})"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Protocol(format!("unexpected http status {status}")));
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::Protocol(format!("malformed payload: {err}")))
}

fn is_json_content_type(content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    ct.eq_ignore_ascii_case("application/json")
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Network(format!("request timed out: {err}"));
    }
    if err.is_decode() {
        return ApiError::Protocol(err.to_string());
    }
    ApiError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_reply_without_error_is_accepted() {
        let reply: LaunchReply = serde_json::from_str(r#"{"message": "Search started"}"#).unwrap();
        assert_eq!(SubmitOutcome::from(reply), SubmitOutcome::accepted());
    }

    #[test]
    fn launch_reply_with_error_is_rejected() {
        let reply: LaunchReply =
            serde_json::from_str(r#"{"error": "Search already in progress"}"#).unwrap();
        assert_eq!(
            SubmitOutcome::from(reply),
            SubmitOutcome::rejected("Search already in progress")
        );
    }

    #[test]
    fn unsupported_launch_is_rejected_with_agent_message() {
        let reply: LaunchReply = serde_json::from_str(
            r#"{"message": "Scraping not supported on Vercel", "unsupported": true}"#,
        )
        .unwrap();
        assert_eq!(
            SubmitOutcome::from(reply),
            SubmitOutcome::rejected("Scraping not supported on Vercel")
        );
    }

    #[test]
    fn json_content_type_ignores_parameters() {
        assert!(is_json_content_type("application/json; charset=utf-8"));
        assert!(!is_json_content_type(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let gateway = ReqwestGateway::new(GatewaySettings {
            base_url: "http://localhost:9000/agent".to_string(),
            ..GatewaySettings::default()
        })
        .unwrap();
        assert_eq!(
            gateway.endpoint("api/status").unwrap().as_str(),
            "http://localhost:9000/agent/api/status"
        );
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let err = ReqwestGateway::new(GatewaySettings {
            base_url: "not a url".to_string(),
            ..GatewaySettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, GatewayInitError::InvalidBaseUrl { .. }));
    }
}
