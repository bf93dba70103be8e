//! Multi-factor similarity between a new report and an existing issue.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use roadwatch_common::{Issue, NewReport};

use crate::config::ScoringConfig;

/// Combines distance, severity match, time proximity and description overlap
/// into one score in [0,1]. Each factor is normalized before weighting.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    config: ScoringConfig,
}

impl SimilarityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one candidate. `distance_m` is precomputed by the caller so the
    /// detector can discard far candidates without paying for scoring.
    pub fn score(
        &self,
        report: &NewReport,
        existing: &Issue,
        distance_m: f64,
        now: DateTime<Utc>,
    ) -> f64 {
        let c = &self.config;
        let mut score = 0.0;

        // Distance factor: linear decay to zero at the threshold.
        let distance_factor =
            ((c.distance_threshold_m - distance_m) / c.distance_threshold_m).max(0.0);
        score += distance_factor * c.distance_weight;

        if report.severity == existing.severity {
            score += c.severity_weight;
        }

        // Time proximity: linear decay over the candidate window.
        let age_secs = (now - existing.created_at).num_seconds().abs() as f64;
        let time_factor = ((c.time_threshold_secs - age_secs) / c.time_threshold_secs).max(0.0);
        score += time_factor * c.time_weight;

        score += description_overlap(&report.description, &existing.description)
            * c.description_weight;

        score.clamp(0.0, 1.0)
    }
}

/// Jaccard similarity of the lower-cased whitespace token sets.
/// Zero when either description is empty.
pub fn description_overlap(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let common = words_a.intersection(&words_b).count();
    let total = words_a.union(&words_b).count();
    common as f64 / total as f64
}
