//! Google Cloud Natural Language `analyzeSentiment` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, SentimentError};
use crate::oracle::SentimentOracle;

const DEFAULT_BASE_URL: &str = "https://language.googleapis.com/v1";

/// HTTP client for document-level sentiment.
///
/// Each call scores one document. Timeouts are enforced by the underlying
/// `reqwest::Client` and surface as [`OracleError::Timeout`]. No retries.
pub struct GoogleLanguageClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    document_sentiment: Option<DocumentSentiment>,
}

/// The API omits zero-valued fields, so a missing `score` is neutral.
#[derive(Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: f32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GoogleLanguageClient {
    /// Creates a client pointed at the production Natural Language API.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SentimentError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`SentimentError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let raw = format!(
            "{}/documents:analyzeSentiment",
            base_url.trim_end_matches('/')
        );
        let endpoint = Url::parse(&raw).map_err(|e| SentimentError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl SentimentOracle for GoogleLanguageClient {
    async fn score(&self, text: &str) -> Result<f32, OracleError> {
        // The API rejects empty documents with a 400; skip the round trip.
        if text.trim().is_empty() {
            return Err(OracleError::InvalidInput("empty document".to_string()));
        }

        let request = AnalyzeSentimentRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let parsed: AnalyzeSentimentResponse =
            response.json().await.map_err(classify_transport)?;

        parsed
            .document_sentiment
            .map(|d| d.score)
            .ok_or_else(|| OracleError::Unknown("response missing documentSentiment".to_string()))
    }
}

fn classify_transport(err: reqwest::Error) -> OracleError {
    if err.is_timeout() {
        OracleError::Timeout(err.to_string())
    } else if err.is_decode() {
        OracleError::Unknown(format!("response parse error: {err}"))
    } else {
        OracleError::Unknown(format!("request failed: {err}"))
    }
}

/// Map a non-2xx response to an [`OracleError`], preferring the API's own
/// `error.status` code when the body carries one.
fn classify_status(status: StatusCode, body: &str) -> OracleError {
    let (api_status, message) = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| (String::new(), body.trim().to_string()),
        |env| (env.error.status, env.error.message),
    );
    let detail = if message.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        message
    };

    match (status, api_status.as_str()) {
        (StatusCode::TOO_MANY_REQUESTS, _) | (_, "RESOURCE_EXHAUSTED") => {
            OracleError::QuotaExceeded(detail)
        }
        (StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT, _)
        | (_, "DEADLINE_EXCEEDED") => OracleError::Timeout(detail),
        (StatusCode::BAD_REQUEST, _) | (_, "INVALID_ARGUMENT") => OracleError::InvalidInput(detail),
        _ => OracleError::Unknown(format!("HTTP {}: {detail}", status.as_u16())),
    }
}
