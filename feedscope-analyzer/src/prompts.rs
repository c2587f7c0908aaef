//! Prompt builders for batch analysis and the session report.

/// Build the per-batch analysis prompt.
pub fn batch_prompt(posts: &[String]) -> String {
    let posts_json = serde_json::to_string(posts).unwrap_or_default();
    format!(
        r#"Analyze these tweets. Return JSON only, no markdown:
{{
  "overall_manipulation_score": <0-100>,
  "topics": {{"topic_name": <percent 0-100>, ...}},
  "emotional_tone": {{"anger": %, "joy": %, "fear": %, "neutral": %}},
  "manipulation_signals": {{"outrage_bait": %, "fear_mongering": %, "clickbait": %, "deceptive_framing": %}},
  "safety_summary": "<one sentence>",
  "feed_summary": "<3-4 sentences describing the actual content and conversations. What topics came up? What were people talking about? Be specific.>",
  "per_tweet": [{{"text_preview": "<20 chars>", "political_lean": "<left|right|liberal|conservative|authoritarian|libertarian|centrist|unclear>", "manipulation_score": <0-100>, "political_lean_x": <-1.0 to 1.0>, "political_lean_y": <-1.0 to 1.0>}}]
}}

Rules:
- topics should reflect ALL subjects in the feed, not just political ones
- political_lean: use unclear ONLY for sports, food, celebrity gossip, pure personal life
- ANY mention of government, crime, economy, race, religion, environment = pick a lean
- When in doubt, pick a lean over unclear
Tweets: {posts_json}"#
    )
}

/// Build the whole-session narrative report prompt.
pub fn report_prompt(posts: &[String]) -> String {
    let posts_json = serde_json::to_string(posts).unwrap_or_default();
    format!(
        r#"You are a media literacy analyst. Analyze this complete feed session of {count} tweets.

Write a comprehensive report covering:
1. Overall narrative — what themes and stories dominated this feed?
2. Political landscape — what political viewpoints appeared and how were they framed?
3. Manipulation patterns — what specific tactics were used and how frequently?
4. Emotional journey — how did the emotional tone shift across the session?
5. Notable patterns — anything unusual, coordinated, or worth flagging?

Be specific and reference actual content from the tweets. Write like a media analyst briefing someone on their information diet.

Return JSON only, no markdown:
{{
  "narrative_summary": "<2-3 paragraphs on what dominated the feed>",
  "political_analysis": "<detailed breakdown of political content and framing>",
  "manipulation_analysis": "<specific tactics observed with examples>",
  "emotional_analysis": "<how tone shifted through the session>",
  "notable_patterns": "<anything unusual or worth flagging>",
  "health_score": <0-100, overall feed health where 100 is diverse and low manipulation>,
  "recommendations": "<2-3 concrete suggestions for improving feed health>"
}}

Tweets from this session:
{posts_json}"#,
        count = posts.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_prompt_embeds_posts() {
        let prompt = batch_prompt(&["hello world".into(), "second post".into()]);
        assert!(prompt.contains("hello world"));
        assert!(prompt.contains("second post"));
        assert!(prompt.contains("overall_manipulation_score"));
        assert!(prompt.contains("per_tweet"));
    }

    #[test]
    fn report_prompt_embeds_count_and_posts() {
        let posts: Vec<String> = (0..3).map(|i| format!("post {i}")).collect();
        let prompt = report_prompt(&posts);
        assert!(prompt.contains("session of 3 tweets"));
        assert!(prompt.contains("post 2"));
        assert!(prompt.contains("health_score"));
    }

    #[test]
    fn prompts_escape_quotes_in_posts() {
        let prompt = batch_prompt(&[r#"he said "hi""#.into()]);
        assert!(prompt.contains(r#"\"hi\""#));
    }
}
