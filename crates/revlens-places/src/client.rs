//! HTTP client for the Google Places web service.
//!
//! Resolves free-text locations to a place ID and fetches the place's name,
//! address, rating and reviews. Every endpoint checks the `"status"` field in
//! the JSON envelope and surfaces anything but `"OK"` as
//! [`PlacesError::ApiStatus`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use revlens_core::{ReviewSet, ReviewSource, UpstreamUnavailable};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{ApiResponse, DetailsResponse, FindPlaceResponse, PlaceDetails};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str = "name,formatted_address,rating,reviews";

/// Client for the Places `findplacefromtext` and `details` endpoints.
///
/// Use [`PlacesClient::new`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    /// Additional attempts after the first transient failure.
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a new client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Resolves `location` to the place ID of the first candidate.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NoCandidates`] on `ZERO_RESULTS` or an empty list.
    /// - [`PlacesError::ApiStatus`] for any other non-`OK` status.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport
    ///   or shape failures.
    pub async fn find_place(&self, location: &str) -> Result<String, PlacesError> {
        let url = self.build_url(
            "findplacefromtext/json",
            &[
                ("input", location),
                ("inputtype", "textquery"),
                ("fields", "place_id"),
            ],
        )?;
        let body = self.request_json("findplacefromtext", &url).await?;

        let envelope: ApiResponse<FindPlaceResponse> =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("findplacefromtext(input={location})"),
                source: e,
            })?;

        if envelope.status == "ZERO_RESULTS" {
            return Err(PlacesError::NoCandidates(location.to_string()));
        }
        Self::check_status("findplacefromtext", &envelope)?;

        envelope
            .data
            .candidates
            .into_iter()
            .next()
            .map(|c| c.place_id)
            .ok_or_else(|| PlacesError::NoCandidates(location.to_string()))
    }

    /// Fetches name, address, rating and reviews for `place_id`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiStatus`] for a non-`OK` status.
    /// - [`PlacesError::MissingResult`] if the envelope has no `result`.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport
    ///   or shape failures.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            "details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let body = self.request_json("details", &url).await?;

        let envelope: ApiResponse<DetailsResponse> =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;
        Self::check_status("details", &envelope)?;

        envelope
            .data
            .result
            .ok_or_else(|| PlacesError::MissingResult {
                place_id: place_id.to_string(),
            })
    }

    /// Resolves `location` and builds a [`ReviewSet`] from its details.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::find_place`] or [`Self::place_details`].
    pub async fn fetch_review_set(&self, location: &str) -> Result<ReviewSet, PlacesError> {
        let place_id = self.find_place(location).await?;
        tracing::debug!(location, place_id = %place_id, "resolved place");
        let details = self.place_details(&place_id).await?;
        Ok(details.into_review_set())
    }

    /// Builds the endpoint URL with percent-encoded query parameters and
    /// the API key appended last.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request (with retries on transient failures), asserts a
    /// 2xx HTTP status, and parses the response body as JSON.
    async fn request_json(
        &self,
        op: &'static str,
        url: &Url,
    ) -> Result<serde_json::Value, PlacesError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url).send().await?;
                let response = response.error_for_status()?;
                let text = response.text().await?;
                let body: serde_json::Value =
                    serde_json::from_str(&text).map_err(|e| PlacesError::Deserialize {
                        context: op.to_string(),
                        source: e,
                    })?;
                Self::check_unknown_error(op, &body)?;
                Ok(body)
            }
        })
        .await
    }

    /// `UNKNOWN_ERROR` is raised inside the retry loop so it is retried like
    /// a transport failure.
    fn check_unknown_error(op: &'static str, body: &serde_json::Value) -> Result<(), PlacesError> {
        if body.get("status").and_then(serde_json::Value::as_str) == Some("UNKNOWN_ERROR") {
            return Err(PlacesError::ApiStatus {
                op,
                status: "UNKNOWN_ERROR".to_string(),
                message: body
                    .get("error_message")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string),
            });
        }
        Ok(())
    }

    fn check_status<T>(op: &'static str, envelope: &ApiResponse<T>) -> Result<(), PlacesError> {
        if envelope.status == "OK" {
            return Ok(());
        }
        Err(PlacesError::ApiStatus {
            op,
            status: envelope.status.clone(),
            message: envelope.error_message.clone(),
        })
    }
}

#[async_trait]
impl ReviewSource for PlacesClient {
    async fn fetch_reviews(&self, location: &str) -> Result<ReviewSet, UpstreamUnavailable> {
        self.fetch_review_set(location).await.map_err(|e| {
            tracing::error!(location, error = %e, "review source unavailable");
            UpstreamUnavailable::new(location, e.to_string())
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
