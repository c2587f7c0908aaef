//! Running summary of all analyzed batches in the current session.
//!
//! The summary is folded incrementally: scalar scores are running averages
//! weighted by batch index, topics are a running sum, per-post records are
//! append-only, and the two summary strings always reflect the most recent
//! batch. `batch_count` is the divisor for every running average and must
//! equal the number of successfully folded batches since the last reset.

use chrono::{DateTime, Utc};
use feedscope_analyzer::{BatchAnalysis, EmotionalTone, ManipulationSignals, PerTweetRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cumulative aggregate of all batches in the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunningSummary {
    /// Running average across all batches (0-100)
    pub overall_manipulation_score: i64,

    /// Accumulated topic weights. This is a running sum, never normalized;
    /// it grows without bound over a session. Intentional asymmetry with the
    /// averaged fields, kept from the upstream behavior.
    pub topics: HashMap<String, f64>,

    /// Running averages per fixed tone key (0-100)
    pub emotional_tone: EmotionalTone,

    /// Running averages per fixed signal key (0-100)
    pub manipulation_signals: ManipulationSignals,

    /// All per-post records, append-only across batches
    pub per_tweet: Vec<PerTweetRecord>,

    /// Most recent batch's feed summary (overwritten, not merged)
    pub feed_summary: String,

    /// Most recent batch's safety summary (overwritten, not merged)
    pub safety_summary: String,

    /// Number of successfully folded batches since the last reset
    pub batch_count: u64,

    /// Completion time of the last folded batch
    pub timestamp: Option<DateTime<Utc>>,
}

/// Round half-to-even, matching the upstream average behavior.
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

/// Incremental running-average step: fold the n-th batch's value into the
/// average of the previous n-1 batches.
fn running_average(previous: i64, incoming: i64, n: u64) -> i64 {
    debug_assert!(n > 0);
    round_half_even((previous as f64 * (n as f64 - 1.0) + incoming as f64) / n as f64)
}

/// Stamp each record with its submitted post's text by positional alignment.
///
/// Record *i* gets post *i*. Extra records (analyzer returned more than
/// submitted) get an empty string; extra posts get no record. Neither case
/// is an error.
pub fn stamp_full_text(records: &mut [PerTweetRecord], posts: &[String]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.full_text = posts.get(i).cloned().unwrap_or_default();
    }
}

impl RunningSummary {
    /// Fold one batch's analysis into the summary.
    ///
    /// `analysis.per_tweet` is expected to be stamped with full texts
    /// already (see [`stamp_full_text`]). Must be committed before any
    /// indexing side effects for the same batch.
    pub fn fold(&mut self, analysis: &BatchAnalysis, now: DateTime<Utc>) {
        self.per_tweet.extend(analysis.per_tweet.iter().cloned());

        self.batch_count += 1;
        let n = self.batch_count;

        self.overall_manipulation_score = running_average(
            self.overall_manipulation_score,
            analysis.overall_manipulation_score,
            n,
        );

        for (topic, weight) in &analysis.topics {
            *self.topics.entry(topic.clone()).or_insert(0.0) += weight;
        }

        let tone = &analysis.emotional_tone;
        self.emotional_tone = EmotionalTone {
            anger: running_average(self.emotional_tone.anger, tone.anger, n),
            joy: running_average(self.emotional_tone.joy, tone.joy, n),
            fear: running_average(self.emotional_tone.fear, tone.fear, n),
            neutral: running_average(self.emotional_tone.neutral, tone.neutral, n),
        };

        let signals = &analysis.manipulation_signals;
        self.manipulation_signals = ManipulationSignals {
            outrage_bait: running_average(
                self.manipulation_signals.outrage_bait,
                signals.outrage_bait,
                n,
            ),
            fear_mongering: running_average(
                self.manipulation_signals.fear_mongering,
                signals.fear_mongering,
                n,
            ),
            clickbait: running_average(self.manipulation_signals.clickbait, signals.clickbait, n),
            deceptive_framing: running_average(
                self.manipulation_signals.deceptive_framing,
                signals.deceptive_framing,
                n,
            ),
        };

        self.feed_summary = analysis.feed_summary.clone();
        self.safety_summary = analysis.safety_summary.clone();
        self.timestamp = Some(now);
    }

    /// Full clear: every field returns to its initial state, so the next
    /// batch behaves exactly as the first batch of a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
