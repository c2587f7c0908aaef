//! Spoken digest rendering.
//!
//! Pure formatting: classify the running manipulation score into a risk
//! tier and fill the fixed digest template. The Speech Synthesizer turns
//! the script into audio elsewhere.

use crate::summary::RunningSummary;

/// Classify an overall manipulation score into its spoken risk tier.
pub fn risk_tier(score: i64) -> &'static str {
    if score > 66 {
        "high manipulation risk"
    } else if score > 33 {
        "moderate manipulation signals"
    } else {
        "relatively clean content"
    }
}

/// Render the spoken digest script for the current summary.
pub fn digest_script(summary: &RunningSummary) -> String {
    let score = summary.overall_manipulation_score;
    let total = summary.per_tweet.len();

    format!(
        "Here is your algorithmic diet report. \
        You scrolled through {total} tweets this session, with an overall manipulation score of {score} out of 100 — {tier}. \
        {summary} \
        Consider diversifying your feed sources to get a more balanced information diet.",
        tier = risk_tier(score),
        summary = summary.feed_summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(risk_tier(0), "relatively clean content");
        assert_eq!(risk_tier(33), "relatively clean content");
        assert_eq!(risk_tier(34), "moderate manipulation signals");
        assert_eq!(risk_tier(66), "moderate manipulation signals");
        assert_eq!(risk_tier(67), "high manipulation risk");
        assert_eq!(risk_tier(100), "high manipulation risk");
    }

    #[test]
    fn script_embeds_count_score_tier_and_summary() {
        let mut summary = RunningSummary {
            overall_manipulation_score: 72,
            feed_summary: "Mostly outrage about rail policy.".into(),
            ..Default::default()
        };
        summary.per_tweet.push(Default::default());
        summary.per_tweet.push(Default::default());

        let script = digest_script(&summary);
        assert!(script.contains("2 tweets"));
        assert!(script.contains("72 out of 100"));
        assert!(script.contains("high manipulation risk"));
        assert!(script.contains("Mostly outrage about rail policy."));
    }
}
