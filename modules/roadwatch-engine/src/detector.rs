//! Duplicate detection against recent open issues.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use roadwatch_common::{Issue, IssueStatus, NewReport, RoadWatchError};

use crate::config::ScoringConfig;
use crate::similarity::SimilarityScorer;
use crate::traits::IssueStore;

/// One scored candidate. `is_duplicate` holds only when the score strictly
/// exceeds the configured threshold; exactly at the threshold is not a match.
#[derive(Debug, Clone)]
pub struct DuplicateMatch {
    pub issue: Issue,
    pub distance_m: f64,
    pub similarity: f64,
    pub is_duplicate: bool,
}

/// Queries candidates, scores them, and picks the best qualifying match.
/// Matches are recomputed fresh per report; nothing is persisted here.
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    config: ScoringConfig,
    scorer: SimilarityScorer,
}

impl DuplicateDetector {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            scorer: SimilarityScorer::new(config.clone()),
            config,
        }
    }

    /// All candidates within the distance threshold, scored and sorted by
    /// similarity descending (candidate severity ordinal breaks ties).
    pub async fn find_potential_duplicates<S: IssueStore + ?Sized>(
        &self,
        report: &NewReport,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<Vec<DuplicateMatch>, RoadWatchError> {
        let since = now - Duration::days(self.config.candidate_window_days);
        let candidates = store
            .query_candidates(
                report.issue_type,
                since,
                &[IssueStatus::Reported, IssueStatus::Verified],
            )
            .await?;

        let mut matches: Vec<DuplicateMatch> = Vec::new();
        for existing in candidates {
            let distance_m = report.location.distance_m(&existing.location);
            if distance_m > self.config.distance_threshold_m {
                continue;
            }
            let similarity = self.scorer.score(report, &existing, distance_m, now);
            matches.push(DuplicateMatch {
                is_duplicate: similarity > self.config.similarity_threshold,
                issue: existing,
                distance_m,
                similarity,
            });
        }

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.issue.severity.cmp(&a.issue.severity))
        });

        debug!(
            issue_type = %report.issue_type,
            scored = matches.len(),
            "Scored duplicate candidates"
        );
        Ok(matches)
    }

    /// The best qualifying duplicate, if any.
    pub async fn find_duplicate<S: IssueStore + ?Sized>(
        &self,
        report: &NewReport,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<Option<DuplicateMatch>, RoadWatchError> {
        let matches = self.find_potential_duplicates(report, store, now).await?;
        Ok(matches.into_iter().find(|m| m.is_duplicate))
    }
}
