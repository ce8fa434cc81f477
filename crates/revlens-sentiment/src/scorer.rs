//! Offline lexicon scorer for review text.

use async_trait::async_trait;

use crate::error::OracleError;
use crate::oracle::SentimentOracle;

/// Review-vocabulary word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("fantastic", 0.5),
    ("friendly", 0.4),
    ("helpful", 0.4),
    ("love", 0.5),
    ("loved", 0.5),
    ("best", 0.5),
    ("recommend", 0.4),
    ("recommended", 0.4),
    ("delicious", 0.4),
    ("clean", 0.3),
    ("fresh", 0.3),
    ("nice", 0.3),
    ("perfect", 0.5),
    ("cozy", 0.3),
    ("fast", 0.2),
    // Negative signals
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("horrible", -0.6),
    ("worst", -0.6),
    ("rude", -0.5),
    ("dirty", -0.5),
    ("slow", -0.3),
    ("cold", -0.2),
    ("overpriced", -0.4),
    ("expensive", -0.2),
    ("disappointing", -0.5),
    ("disappointed", -0.5),
    ("avoid", -0.5),
    ("never", -0.2),
    ("bland", -0.3),
    ("stale", -0.4),
    ("noisy", -0.2),
    ("problem", -0.3),
    ("refund", -0.4),
];

/// Score a text string using the review lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

/// [`SentimentOracle`] backed by [`lexicon_score`]. Deterministic, offline,
/// and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconOracle;

#[async_trait]
impl SentimentOracle for LexiconOracle {
    async fn score(&self, text: &str) -> Result<f32, OracleError> {
        Ok(lexicon_score(text))
    }
}
