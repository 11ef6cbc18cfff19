//! Ekispert HTTP client.
//!
//! Performs exactly one call to the course-search endpoint per
//! invocation: no retries, no backoff, no caching. Fallback to cached
//! results is the resolver's responsibility, which keeps this client
//! testable against recorded response bodies.

use async_trait::async_trait;

use crate::domain::QueryKey;

use super::error::EkispertError;
use super::types::CourseResponse;

/// Default endpoint for course search (free-plan compatible).
const DEFAULT_BASE_URL: &str = "https://api.ekispert.jp/v1/json/search/course/light";

/// Configuration for the Ekispert client.
#[derive(Debug, Clone)]
pub struct EkispertConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the endpoint (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EkispertConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// The upstream course-search operation.
///
/// The resolver is generic over this trait so tests can substitute a
/// scripted stub for the real HTTP client.
#[async_trait]
pub trait CourseSearch: Send + Sync {
    /// Issue one search for the given key.
    async fn search(&self, key: &QueryKey) -> Result<CourseResponse, EkispertError>;
}

/// Ekispert course-search API client.
#[derive(Debug, Clone)]
pub struct EkispertClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EkispertClient {
    /// Create a new client with the given configuration.
    ///
    /// The timeout bounds the whole request; on expiry the call fails
    /// with a transient `Http` error.
    pub fn new(config: EkispertConfig) -> Result<Self, EkispertError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl CourseSearch for EkispertClient {
    async fn search(&self, key: &QueryKey) -> Result<CourseResponse, EkispertError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.clone()),
                ("from", key.origin.clone()),
                ("to", key.destination.clone()),
                ("date", key.date.to_string()),
                ("time", key.time.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // E102 rides on various statuses; check the body before
            // the status code so a 400/403 station miss is not
            // misreported as an auth problem.
            if let Some(message) = station_not_found_message(&body) {
                return Err(EkispertError::StationNotFound { message });
            }

            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(EkispertError::Unauthorized);
            }

            return Err(EkispertError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| EkispertError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

/// Extract the station-not-found message from an error body, if that
/// is what the body carries.
///
/// Prefers the upstream's own `ResultSet.Error.Message` so the caller
/// sees which name failed; falls back to a generic message when the
/// body is recognizable but not parsable.
fn station_not_found_message(body: &str) -> Option<String> {
    if !body.contains("E102") && !body.contains("駅名が見つかりません") {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<CourseResponse>(body) {
        if let Some(message) = parsed
            .result_set
            .and_then(|r| r.error)
            .and_then(|e| e.message)
        {
            return Some(message);
        }
    }

    Some("駅名が見つかりませんでした".to_string())
}
