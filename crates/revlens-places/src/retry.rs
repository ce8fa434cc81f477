//! Retries for Places requests that failed for reasons the server may not
//! repeat. Place lookups are read-only, so repeating one is always safe.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Longest pause between two attempts.
const MAX_DELAY_MS: u64 = 60_000;

/// Whether `err` might go away on its own.
///
/// Dropped connections, timeouts, 5xx replies and Google's `UNKNOWN_ERROR`
/// status qualify. Quota, key and request problems do not, nor does a reply
/// that parsed badly or named no place.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::ApiStatus { status, .. } => status == "UNKNOWN_ERROR",
        PlacesError::NoCandidates(_)
        | PlacesError::MissingResult { .. }
        | PlacesError::Deserialize { .. }
        | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Pause before retry number `retry` (1-based), before jitter.
///
/// Doubles from `base_ms` on each retry and never exceeds one minute.
pub(crate) fn backoff_delay(retry: u32, base_ms: u64) -> u64 {
    let doublings = retry.saturating_sub(1).min(10);
    base_ms.saturating_mul(1 << doublings).min(MAX_DELAY_MS)
}

/// Scale `delay_ms` by a random factor in `[0.75, 1.25)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn jittered(delay_ms: u64) -> u64 {
    (delay_ms as f64 * (0.75 + rand::random::<f64>() * 0.5)) as u64
}

/// Call `operation` until it succeeds, fails permanently, or has been
/// retried `max_retries` times.
///
/// With a base of 500 ms the pauses are roughly 0.5 s, 1 s, 2 s and 4 s,
/// each shifted by up to a quarter either way. The last error is returned
/// once retries run out.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut retry = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retry == max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retry += 1;
        let delay_ms = jittered(backoff_delay(retry, backoff_base_ms));
        tracing::warn!(
            retry,
            max_retries,
            delay_ms,
            error = %err,
            "Places request failed, trying again"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
