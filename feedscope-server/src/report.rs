//! Session report synthesis.
//!
//! Stateless with respect to the running summary: the report is built from
//! the raw post history alone.

use feedscope_analyzer::{Analyzer, FullReport};
use feedscope_common::{Error, Result};

/// Reduce the full session history into a narrative report.
///
/// Fails with `EmptySession` before any Analyzer call is made.
pub async fn synthesize(analyzer: &dyn Analyzer, posts: &[String]) -> Result<FullReport> {
    if posts.is_empty() {
        return Err(Error::EmptySession);
    }
    analyzer.full_report(posts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use feedscope_analyzer::BatchAnalysis;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingAnalyzer {
        report_calls: AtomicUsize,
    }

    #[async_trait]
    impl Analyzer for CountingAnalyzer {
        async fn analyze_batch(&self, _posts: &[String]) -> Result<BatchAnalysis> {
            Ok(BatchAnalysis::default())
        }

        async fn full_report(&self, _posts: &[String]) -> Result<FullReport> {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            Ok(FullReport {
                health_score: 72,
                ..Default::default()
            })
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0])
        }
    }

    #[tokio::test]
    async fn empty_session_fails_without_calling_analyzer() {
        let analyzer = CountingAnalyzer::default();
        let err = synthesize(&analyzer, &[]).await.unwrap_err();
        assert!(matches!(err, Error::EmptySession));
        assert_eq!(analyzer.report_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_empty_session_returns_analyzer_report() {
        let analyzer = CountingAnalyzer::default();
        let report = synthesize(&analyzer, &["a post".into()]).await.unwrap();
        assert_eq!(report.health_score, 72);
        assert_eq!(analyzer.report_calls.load(Ordering::SeqCst), 1);
    }
}
