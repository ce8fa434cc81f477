//! `analyze`: fetch, enrich, persist and render one location's reviews.

use std::sync::Arc;

use revlens_core::{AppConfig, ReviewSet};
use revlens_places::PlacesClient;
use revlens_sentiment::{
    run_location, CancellationToken, EnrichmentPipeline, GoogleLanguageClient, LexiconOracle,
    PacingPolicy, SentimentOracle,
};

use crate::export::{default_export_path, save_review_set};
use crate::progress::ConsoleProgress;
use crate::render::render_report;
use crate::{AnalyzeArgs, OracleKind};

/// Build the oracle selected on the command line.
///
/// # Errors
///
/// Returns an error if `--oracle google` is chosen without
/// `GOOGLE_LANGUAGE_API_KEY`, or the HTTP client cannot be built.
pub(crate) fn build_oracle(
    config: &AppConfig,
    kind: OracleKind,
) -> anyhow::Result<Arc<dyn SentimentOracle>> {
    match kind {
        OracleKind::Lexicon => Ok(Arc::new(LexiconOracle)),
        OracleKind::Google => {
            let api_key = config.google_language_api_key.as_deref().ok_or_else(|| {
                anyhow::anyhow!("GOOGLE_LANGUAGE_API_KEY must be set for --oracle google")
            })?;
            let client = GoogleLanguageClient::with_base_url(
                api_key,
                config.request_timeout_secs,
                &config.user_agent,
                &config.language_base_url,
            )?;
            Ok(Arc::new(client))
        }
    }
}

pub(crate) fn pacing_policy(config: &AppConfig, no_pacing: bool) -> PacingPolicy {
    if no_pacing {
        PacingPolicy::disabled()
    } else {
        PacingPolicy::from_millis(config.pacing_interval_ms)
    }
}

/// Run `analyze` end to end.
///
/// An unresolvable location aborts before any scoring or output. A
/// cancelled run still writes and renders whatever was scored.
///
/// # Errors
///
/// Returns an error on missing API keys, an unavailable review source, or a
/// failed CSV write.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    args: &AnalyzeArgs,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let maps_key = config
        .google_maps_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("GOOGLE_MAPS_API_KEY must be set to analyze a location"))?;
    let oracle = build_oracle(config, args.oracle)?;
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let pacing = pacing_policy(config, args.no_pacing);

    if args.dry_run {
        println!(
            "dry-run: would analyze \"{}\" with the {:?} oracle (pacing {} ms, {} retry passes) and write to {}",
            args.location,
            args.oracle,
            pacing.interval().as_millis(),
            args.retry_failed,
            default_export_path(&out_dir, "<place name>").display()
        );
        return Ok(());
    }

    let places = PlacesClient::with_base_url(
        maps_key,
        config.request_timeout_secs,
        &config.user_agent,
        config.upstream_max_retries,
        config.upstream_retry_backoff_ms,
        &config.places_base_url,
    )?;
    let pipeline = EnrichmentPipeline::new(oracle)
        .with_pacing(pacing)
        .with_cancellation(cancel);

    let mut progress = ConsoleProgress::new();
    let summary = run_location(&places, &pipeline, &args.location, &mut progress).await?;
    progress.finish();

    let mut cancelled = summary.cancelled;
    let reviews = retry_failed(&pipeline, summary.reviews, args.retry_failed, &mut cancelled).await;

    if cancelled {
        eprintln!(
            "cancelled: {} of {} reviews left unscored",
            reviews.pending_count(),
            reviews.len()
        );
    }

    let path = save_review_set(&out_dir, &reviews)?;
    let filter = args.range.resolve(&reviews);
    print!("{}", render_report(&reviews, &filter));
    println!("\nwrote {}", path.display());
    Ok(())
}

/// Up to `passes` extra runs over the failed records. Stops early once
/// nothing failed or the run is cancelled.
async fn retry_failed(
    pipeline: &EnrichmentPipeline,
    mut reviews: ReviewSet,
    passes: u32,
    cancelled: &mut bool,
) -> ReviewSet {
    for pass in 1..=passes {
        let failed = reviews.failed_count();
        if *cancelled || failed == 0 {
            break;
        }
        tracing::info!(pass, failed, "retrying failed reviews");
        let mut progress = ConsoleProgress::new();
        let summary = pipeline.enrich_failed(reviews, &mut progress).await;
        progress.finish();
        tracing::info!(
            pass,
            recovered = summary.succeeded,
            still_failed = summary.failed,
            "retry pass complete"
        );
        *cancelled = summary.cancelled;
        reviews = summary.reviews;
    }
    reviews
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use revlens_core::{PlaceInfo, RawReview};
    use revlens_sentiment::{NoProgress, OracleError};

    use super::*;

    /// Fails every text on its first attempt, succeeds afterwards.
    struct SecondTimeLucky {
        calls: AtomicUsize,
        seen: std::sync::Mutex<HashMap<String, usize>>,
    }

    #[async_trait]
    impl SentimentOracle for SecondTimeLucky {
        async fn score(&self, text: &str) -> Result<f32, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut seen = self.seen.lock().unwrap();
            let count = seen.entry(text.to_string()).or_insert(0);
            *count += 1;
            if *count == 1 {
                Err(OracleError::Timeout("slow".to_string()))
            } else {
                Ok(0.5)
            }
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            env: revlens_core::Environment::Test,
            log_level: "info".to_string(),
            google_maps_api_key: None,
            google_language_api_key: None,
            places_base_url: "http://127.0.0.1:9/".to_string(),
            language_base_url: "http://127.0.0.1:9/v1".to_string(),
            request_timeout_secs: 5,
            user_agent: "revlens-test".to_string(),
            pacing_interval_ms: 100,
            upstream_max_retries: 0,
            upstream_retry_backoff_ms: 0,
            output_dir: std::path::PathBuf::from("."),
        }
    }

    fn pending_set() -> ReviewSet {
        let place = PlaceInfo {
            name: "Corner Cafe".to_string(),
            address: String::new(),
            rating: None,
        };
        ReviewSet::new(
            place,
            vec![RawReview::new("one", 1), RawReview::new("two", 2)],
        )
    }

    #[test]
    fn google_oracle_requires_language_key() {
        let err = build_oracle(&test_config(), OracleKind::Google)
            .err()
            .expect("missing key should fail");
        assert!(err.to_string().contains("GOOGLE_LANGUAGE_API_KEY"));
    }

    #[test]
    fn google_oracle_builds_with_key() {
        let config = AppConfig {
            google_language_api_key: Some("k".to_string()),
            ..test_config()
        };
        assert!(build_oracle(&config, OracleKind::Google).is_ok());
    }

    #[tokio::test]
    async fn lexicon_oracle_needs_no_key() {
        let oracle = build_oracle(&test_config(), OracleKind::Lexicon).unwrap();
        assert!(oracle.score("great").await.unwrap() > 0.0);
    }

    #[test]
    fn pacing_follows_config_unless_disabled() {
        let config = AppConfig {
            pacing_interval_ms: 250,
            ..test_config()
        };
        assert_eq!(pacing_policy(&config, false).interval().as_millis(), 250);
        assert!(pacing_policy(&config, true).is_disabled());
    }

    #[tokio::test]
    async fn analyze_without_maps_key_fails_before_any_request() {
        let args = AnalyzeArgs {
            location: "anywhere".to_string(),
            oracle: OracleKind::Lexicon,
            out_dir: None,
            no_pacing: true,
            retry_failed: 0,
            range: crate::range::RangeArgs::default(),
            dry_run: false,
        };
        let err = run_analyze(&test_config(), &args, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GOOGLE_MAPS_API_KEY"));
    }

    #[tokio::test]
    async fn retry_passes_recover_failed_records() {
        let oracle = Arc::new(SecondTimeLucky {
            calls: AtomicUsize::new(0),
            seen: std::sync::Mutex::new(HashMap::new()),
        });
        let pipeline = EnrichmentPipeline::new(oracle.clone()).with_pacing(PacingPolicy::disabled());

        let first = pipeline.enrich(pending_set(), &mut NoProgress).await;
        assert_eq!(first.failed, 2);

        let mut cancelled = false;
        let reviews = retry_failed(&pipeline, first.reviews, 3, &mut cancelled).await;
        assert_eq!(reviews.scored_count(), 2);
        assert_eq!(reviews.failed_count(), 0);
        // 2 initial attempts + 2 retries; later passes stop early.
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn retry_is_skipped_after_cancellation() {
        let oracle = Arc::new(SecondTimeLucky {
            calls: AtomicUsize::new(0),
            seen: std::sync::Mutex::new(HashMap::new()),
        });
        let pipeline = EnrichmentPipeline::new(oracle.clone()).with_pacing(PacingPolicy::disabled());
        let first = pipeline.enrich(pending_set(), &mut NoProgress).await;

        let mut cancelled = true;
        let reviews = retry_failed(&pipeline, first.reviews, 3, &mut cancelled).await;
        assert_eq!(reviews.failed_count(), 2);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    }
}
