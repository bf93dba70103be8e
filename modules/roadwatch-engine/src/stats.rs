//! Pure aggregation over issue sets for triage dashboards.

use std::collections::HashMap;

use roadwatch_common::{Issue, IssueStatus, IssueType, Severity};

use crate::priority::round1;

/// Aggregates for a set of issues. Averages are rounded to one decimal and
/// all fields are zero/empty for an empty input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueStats {
    pub count: u64,
    pub avg_priority: f64,
    pub avg_upvotes: f64,
    pub avg_repair_days: f64,
    pub by_type: HashMap<IssueType, u64>,
    pub by_severity: HashMap<Severity, u64>,
    pub by_status: HashMap<IssueStatus, u64>,
}

/// No side effects, no division errors on empty input.
pub fn compute_stats(issues: &[Issue]) -> IssueStats {
    if issues.is_empty() {
        return IssueStats::default();
    }

    let count = issues.len() as u64;
    let n = issues.len() as f64;

    let mut stats = IssueStats {
        count,
        avg_priority: round1(issues.iter().map(|i| i.priority).sum::<f64>() / n),
        avg_upvotes: round1(issues.iter().map(|i| f64::from(i.upvotes)).sum::<f64>() / n),
        avg_repair_days: round1(
            issues
                .iter()
                .map(|i| f64::from(i.estimated_repair_days.unwrap_or(0)))
                .sum::<f64>()
                / n,
        ),
        ..IssueStats::default()
    };

    for issue in issues {
        *stats.by_type.entry(issue.issue_type).or_insert(0) += 1;
        *stats.by_severity.entry(issue.severity).or_insert(0) += 1;
        *stats.by_status.entry(issue.status).or_insert(0) += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roadwatch_common::{GeoPoint, RoadType};
    use uuid::Uuid;

    fn issue(
        issue_type: IssueType,
        severity: Severity,
        status: IssueStatus,
        priority: f64,
        upvotes: u32,
        repair_days: Option<u32>,
    ) -> Issue {
        let now = Utc::now();
        Issue {
            id: Uuid::new_v4(),
            issue_type,
            location: GeoPoint { lat: 12.97, lng: 77.59 },
            address: "MG Road".to_string(),
            severity,
            description: "pothole".to_string(),
            status,
            priority,
            upvotes,
            road_type: RoadType::Other,
            ward: None,
            estimated_repair_days: repair_days,
            reporter_id: Uuid::new_v4(),
            verified_by: None,
            verified_at: None,
            fixed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_input_yields_all_zero_aggregates() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, IssueStats::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_priority, 0.0);
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn averages_and_breakdowns() {
        let issues = vec![
            issue(
                IssueType::Pothole,
                Severity::High,
                IssueStatus::Reported,
                4.0,
                2,
                Some(10),
            ),
            issue(
                IssueType::Pothole,
                Severity::Critical,
                IssueStatus::Verified,
                8.0,
                4,
                None,
            ),
            issue(
                IssueType::RoadClosure,
                Severity::High,
                IssueStatus::Reported,
                6.0,
                0,
                Some(5),
            ),
        ];
        let stats = compute_stats(&issues);
        assert_eq!(stats.count, 3);
        assert!((stats.avg_priority - 6.0).abs() < 1e-10);
        assert!((stats.avg_upvotes - 2.0).abs() < 1e-10);
        assert!((stats.avg_repair_days - 5.0).abs() < 1e-10);
        assert_eq!(stats.by_type[&IssueType::Pothole], 2);
        assert_eq!(stats.by_type[&IssueType::RoadClosure], 1);
        assert_eq!(stats.by_severity[&Severity::High], 2);
        assert_eq!(stats.by_status[&IssueStatus::Reported], 2);
        assert_eq!(stats.by_status[&IssueStatus::Verified], 1);
    }

    #[test]
    fn averages_are_rounded_to_one_decimal() {
        let issues = vec![
            issue(IssueType::Pothole, Severity::Low, IssueStatus::Reported, 2.0, 1, None),
            issue(IssueType::Pothole, Severity::Low, IssueStatus::Reported, 2.0, 0, None),
            issue(IssueType::Pothole, Severity::Low, IssueStatus::Reported, 3.0, 0, None),
        ];
        let stats = compute_stats(&issues);
        // 7/3 = 2.333… → 2.3; 1/3 = 0.333… → 0.3
        assert!((stats.avg_priority - 2.3).abs() < 1e-10);
        assert!((stats.avg_upvotes - 0.3).abs() < 1e-10);
    }
}
