use std::env;

/// Similarity thresholds and factor weights, injectable so deployments can
/// tune dedup aggressiveness without code changes.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Candidates farther than this are discarded before scoring (meters).
    pub distance_threshold_m: f64,
    /// Window for the time-proximity factor (seconds).
    pub time_threshold_secs: f64,
    /// A candidate is a duplicate only when its score strictly exceeds this.
    pub similarity_threshold: f64,
    /// How far back the candidate query looks (days).
    pub candidate_window_days: i64,
    pub distance_weight: f64,
    pub severity_weight: f64,
    pub time_weight: f64,
    pub description_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            distance_threshold_m: 50.0,
            time_threshold_secs: 7.0 * 24.0 * 60.0 * 60.0,
            similarity_threshold: 0.7,
            candidate_window_days: 7,
            distance_weight: 0.4,
            severity_weight: 0.3,
            time_weight: 0.2,
            description_weight: 0.1,
        }
    }
}

impl ScoringConfig {
    /// Load scoring configuration from environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            distance_threshold_m: env_f64("ROADWATCH_DISTANCE_THRESHOLD_M", d.distance_threshold_m),
            time_threshold_secs: env_f64("ROADWATCH_TIME_THRESHOLD_SECS", d.time_threshold_secs),
            similarity_threshold: env_f64("ROADWATCH_SIMILARITY_THRESHOLD", d.similarity_threshold),
            candidate_window_days: env_f64(
                "ROADWATCH_CANDIDATE_WINDOW_DAYS",
                d.candidate_window_days as f64,
            ) as i64,
            distance_weight: env_f64("ROADWATCH_DISTANCE_WEIGHT", d.distance_weight),
            severity_weight: env_f64("ROADWATCH_SEVERITY_WEIGHT", d.severity_weight),
            time_weight: env_f64("ROADWATCH_TIME_WEIGHT", d.time_weight),
            description_weight: env_f64("ROADWATCH_DESCRIPTION_WEIGHT", d.description_weight),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let c = ScoringConfig::default();
        let sum = c.distance_weight + c.severity_weight + c.time_weight + c.description_weight;
        assert!((sum - 1.0).abs() < 1e-10);
    }

    #[test]
    fn unset_env_falls_back_to_defaults() {
        let c = ScoringConfig::from_env();
        assert!((c.similarity_threshold - 0.7).abs() < 1e-10);
        assert_eq!(c.candidate_window_days, 7);
    }
}
