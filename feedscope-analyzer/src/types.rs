//! Structured output types returned by the Analyzer.
//!
//! Every field defaults when absent: a batch that omits a score contributes
//! 0 for that key, and an unknown political lean falls back to `Unclear`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Deserialize a 0-100 score as `i64`, accepting fractional values.
///
/// Models asked for integer scores sometimes return `55.5` anyway; those
/// round half-to-even rather than failing the whole batch parse.
fn rounded_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(round_half_even(value))
}

fn round_half_even(value: f64) -> i64 {
    let floor = value.floor();
    let fraction = value - floor;
    let floor = floor as i64;
    if fraction > 0.5 {
        floor + 1
    } else if fraction < 0.5 {
        floor
    } else if floor % 2 == 0 {
        floor
    } else {
        floor + 1
    }
}

/// Per-batch structured analysis produced by the Analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchAnalysis {
    #[serde(default, deserialize_with = "rounded_score")]
    pub overall_manipulation_score: i64,

    /// Topic name to weight for this batch only.
    #[serde(default)]
    pub topics: HashMap<String, f64>,

    #[serde(default)]
    pub emotional_tone: EmotionalTone,

    #[serde(default)]
    pub manipulation_signals: ManipulationSignals,

    #[serde(default)]
    pub per_tweet: Vec<PerTweetRecord>,

    #[serde(default)]
    pub feed_summary: String,

    #[serde(default)]
    pub safety_summary: String,
}

/// Fixed-key emotional tone scores (0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalTone {
    #[serde(default, deserialize_with = "rounded_score")]
    pub anger: i64,
    #[serde(default, deserialize_with = "rounded_score")]
    pub joy: i64,
    #[serde(default, deserialize_with = "rounded_score")]
    pub fear: i64,
    #[serde(default, deserialize_with = "rounded_score")]
    pub neutral: i64,
}

/// Fixed-key manipulation signal scores (0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManipulationSignals {
    #[serde(default, deserialize_with = "rounded_score")]
    pub outrage_bait: i64,
    #[serde(default, deserialize_with = "rounded_score")]
    pub fear_mongering: i64,
    #[serde(default, deserialize_with = "rounded_score")]
    pub clickbait: i64,
    #[serde(default, deserialize_with = "rounded_score")]
    pub deceptive_framing: i64,
}

/// Per-post analysis record.
///
/// `full_text` is not supplied by the Analyzer; it is stamped by positional
/// alignment with the submitted batch before aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerTweetRecord {
    #[serde(default)]
    pub text_preview: String,

    #[serde(default)]
    pub political_lean: PoliticalLean,

    #[serde(default, deserialize_with = "rounded_score")]
    pub manipulation_score: i64,

    /// Political-compass x placement in [-1.0, 1.0]
    #[serde(default)]
    pub political_lean_x: f64,

    /// Political-compass y placement in [-1.0, 1.0]
    #[serde(default)]
    pub political_lean_y: f64,

    #[serde(default)]
    pub full_text: String,
}

/// Political lean classification for a single post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoliticalLean {
    Left,
    Right,
    Liberal,
    Conservative,
    Authoritarian,
    Libertarian,
    Centrist,
    #[default]
    #[serde(other)]
    Unclear,
}

/// Session-wide narrative report produced by the Analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullReport {
    #[serde(default)]
    pub narrative_summary: String,

    #[serde(default)]
    pub political_analysis: String,

    #[serde(default)]
    pub manipulation_analysis: String,

    #[serde(default)]
    pub emotional_analysis: String,

    #[serde(default)]
    pub notable_patterns: String,

    /// Overall feed health (0-100, higher is healthier)
    #[serde(default, deserialize_with = "rounded_score")]
    pub health_score: i64,

    #[serde(default)]
    pub recommendations: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_analysis_missing_fields_default_to_zero() {
        let analysis: BatchAnalysis =
            serde_json::from_str(r#"{"overall_manipulation_score": 40}"#).unwrap();
        assert_eq!(analysis.overall_manipulation_score, 40);
        assert_eq!(analysis.emotional_tone, EmotionalTone::default());
        assert_eq!(analysis.manipulation_signals, ManipulationSignals::default());
        assert!(analysis.topics.is_empty());
        assert!(analysis.per_tweet.is_empty());
        assert!(analysis.feed_summary.is_empty());
    }

    #[test]
    fn fractional_scores_round_half_to_even() {
        let analysis: BatchAnalysis = serde_json::from_str(
            r#"{"overall_manipulation_score": 54.5, "emotional_tone": {"anger": 55.5}}"#,
        )
        .unwrap();
        assert_eq!(analysis.overall_manipulation_score, 54);
        assert_eq!(analysis.emotional_tone.anger, 56);

        let record: PerTweetRecord =
            serde_json::from_str(r#"{"manipulation_score": 72.4}"#).unwrap();
        assert_eq!(record.manipulation_score, 72);

        let report: FullReport = serde_json::from_str(r#"{"health_score": 66.6}"#).unwrap();
        assert_eq!(report.health_score, 67);
    }

    #[test]
    fn partial_emotional_tone_defaults_missing_keys() {
        let analysis: BatchAnalysis =
            serde_json::from_str(r#"{"emotional_tone": {"anger": 70}}"#).unwrap();
        assert_eq!(analysis.emotional_tone.anger, 70);
        assert_eq!(analysis.emotional_tone.joy, 0);
        assert_eq!(analysis.emotional_tone.neutral, 0);
    }

    #[test]
    fn political_lean_parses_known_variants() {
        let record: PerTweetRecord =
            serde_json::from_str(r#"{"political_lean": "libertarian"}"#).unwrap();
        assert_eq!(record.political_lean, PoliticalLean::Libertarian);
    }

    #[test]
    fn political_lean_unknown_falls_back_to_unclear() {
        let record: PerTweetRecord =
            serde_json::from_str(r#"{"political_lean": "anarchist"}"#).unwrap();
        assert_eq!(record.political_lean, PoliticalLean::Unclear);
    }

    #[test]
    fn political_lean_serializes_lowercase() {
        let json = serde_json::to_string(&PoliticalLean::Left).unwrap();
        assert_eq!(json, r#""left""#);
    }
}
