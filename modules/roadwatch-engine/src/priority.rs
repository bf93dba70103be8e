//! Triage priority scoring.

use chrono::{DateTime, Utc};

use roadwatch_common::{Issue, RoadType, Severity};

/// Upvote/age weighting for the priority formula. The severity and road
/// class tables live on the enums themselves.
#[derive(Debug, Clone)]
pub struct PriorityConfig {
    pub upvote_weight: f64,
    pub age_weight_per_day: f64,
    /// Age contribution saturates here; issues older than
    /// `age_cap / age_weight_per_day` days gain nothing further.
    pub age_cap: f64,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            upvote_weight: 0.5,
            age_weight_per_day: 0.1,
            age_cap: 2.0,
        }
    }
}

/// The heterogeneous signals the ranking combines.
#[derive(Debug, Clone, Copy)]
pub struct PriorityInputs {
    pub severity: Severity,
    pub upvotes: u32,
    pub road_type: RoadType,
    pub age_days: i64,
}

impl PriorityInputs {
    /// Derive inputs from a stored issue, with age measured against `now`.
    pub fn for_issue(issue: &Issue, now: DateTime<Utc>) -> Self {
        Self {
            severity: issue.severity,
            upvotes: issue.upvotes,
            road_type: issue.road_type,
            age_days: (now - issue.created_at).num_days().max(0),
        }
    }
}

/// `severity + upvotes * 0.5 + road_class + min(age_days * 0.1, 2.0)`,
/// rounded to one decimal place, never negative.
#[derive(Debug, Clone, Default)]
pub struct PriorityCalculator {
    config: PriorityConfig,
}

impl PriorityCalculator {
    pub fn new(config: PriorityConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, inputs: PriorityInputs) -> f64 {
        let c = &self.config;
        let score = inputs.severity.priority_score()
            + f64::from(inputs.upvotes) * c.upvote_weight
            + inputs.road_type.priority_score()
            + (inputs.age_days.max(0) as f64 * c.age_weight_per_day).min(c.age_cap);
        round1(score).max(0.0)
    }
}

/// Round to one decimal place.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(severity: Severity, upvotes: u32, road_type: RoadType, age_days: i64) -> PriorityInputs {
        PriorityInputs {
            severity,
            upvotes,
            road_type,
            age_days,
        }
    }

    #[test]
    fn fresh_high_severity_other_road() {
        // 3 (high) + 0 + 1 (other) + 0 (age) = 4.0
        let calc = PriorityCalculator::default();
        let p = calc.calculate(inputs(Severity::High, 0, RoadType::Other, 0));
        assert!((p - 4.0).abs() < 1e-10);
    }

    #[test]
    fn critical_highway_with_votes_and_age() {
        // 5 + 3*0.5 + 3 + 1.0 = 10.5
        let calc = PriorityCalculator::default();
        let p = calc.calculate(inputs(Severity::Critical, 3, RoadType::Highway, 10));
        assert!((p - 10.5).abs() < 1e-10);
    }

    #[test]
    fn monotone_in_upvotes() {
        let calc = PriorityCalculator::default();
        let mut prev = f64::MIN;
        for upvotes in 0..50 {
            let p = calc.calculate(inputs(Severity::Medium, upvotes, RoadType::MainRoad, 3));
            assert!(p >= prev, "priority dropped at {upvotes} upvotes");
            prev = p;
        }
    }

    #[test]
    fn age_bonus_saturates_at_two() {
        let calc = PriorityCalculator::default();
        let at_cap = calc.calculate(inputs(Severity::Low, 0, RoadType::Residential, 20));
        let way_past = calc.calculate(inputs(Severity::Low, 0, RoadType::Residential, 10_000));
        assert!((at_cap - way_past).abs() < 1e-10);
        // 1 + 0 + 1 + 2.0 = 4.0
        assert!((at_cap - 4.0).abs() < 1e-10);
    }

    #[test]
    fn negative_age_clamps_to_zero() {
        let calc = PriorityCalculator::default();
        let p = calc.calculate(inputs(Severity::Low, 0, RoadType::Residential, -5));
        assert!((p - 2.0).abs() < 1e-10);
    }

    #[test]
    fn result_is_rounded_to_one_decimal() {
        let calc = PriorityCalculator::default();
        // Fractional day weighting never appears; force rounding via config.
        let calc_fine = PriorityCalculator::new(PriorityConfig {
            upvote_weight: 0.33,
            ..PriorityConfig::default()
        });
        let p = calc_fine.calculate(inputs(Severity::Low, 1, RoadType::Other, 0));
        assert!((p - 2.3).abs() < 1e-10);
        let q = calc.calculate(inputs(Severity::Low, 1, RoadType::Other, 0));
        assert!((q - 2.5).abs() < 1e-10);
    }

    #[test]
    fn inputs_for_issue_derive_age_from_created_at() {
        use roadwatch_common::{GeoPoint, IssueStatus, IssueType};
        use uuid::Uuid;

        let now = Utc::now();
        let issue = Issue {
            id: Uuid::new_v4(),
            issue_type: IssueType::Pothole,
            location: GeoPoint { lat: 0.0, lng: 0.0 },
            address: "x".to_string(),
            severity: Severity::Medium,
            description: "x".to_string(),
            status: IssueStatus::Reported,
            priority: 0.0,
            upvotes: 2,
            road_type: RoadType::Commercial,
            ward: None,
            estimated_repair_days: None,
            reporter_id: Uuid::new_v4(),
            verified_by: None,
            verified_at: None,
            fixed_at: None,
            created_at: now - chrono::Duration::days(4),
            updated_at: now,
        };
        let inputs = PriorityInputs::for_issue(&issue, now);
        assert_eq!(inputs.age_days, 4);
        assert_eq!(inputs.upvotes, 2);
        // 2 + 1.0 + 2 + 0.4 = 5.4
        let p = PriorityCalculator::default().calculate(inputs);
        assert!((p - 5.4).abs() < 1e-10);
    }
}
