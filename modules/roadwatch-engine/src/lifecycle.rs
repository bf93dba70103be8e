//! Issue lifecycle orchestration: report → merge-or-create, upvoting,
//! status transitions, and regional stats.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{Duration, Utc};
use geohash::Coord;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

use roadwatch_common::{GeoPoint, Issue, IssueStatus, NewReport, RoadWatchError};

use crate::config::ScoringConfig;
use crate::detector::DuplicateDetector;
use crate::priority::{PriorityCalculator, PriorityConfig, PriorityInputs};
use crate::stats::{compute_stats, IssueStats};
use crate::traits::{IssueStore, UserCounter, UserStore};

/// Geohash precision for the report ingestion lock. Precision 7 cells are
/// ~150m across, comfortably containing the 50m duplicate radius. Pairs
/// straddling a cell boundary are serialized best-effort only.
const CELL_PRECISION: usize = 7;

/// What happened to a report: folded into an existing issue, or created fresh.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Created(Issue),
    MergedInto(Issue),
}

impl ReportOutcome {
    pub fn issue(&self) -> &Issue {
        match self {
            ReportOutcome::Created(i) | ReportOutcome::MergedInto(i) => i,
        }
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, ReportOutcome::MergedInto(_))
    }
}

/// Ties detector, scorer and priority calculator together over the store
/// traits. Holds no domain state of its own; every call reads from and
/// writes back to the stores.
pub struct IssueService<I: IssueStore, U: UserStore> {
    issues: I,
    users: U,
    detector: DuplicateDetector,
    priority: PriorityCalculator,
    // Detect-then-merge is a read-decide-write sequence; without this,
    // near-simultaneous reports for the same spot both create new issues.
    cell_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<I: IssueStore, U: UserStore> IssueService<I, U> {
    pub fn new(issues: I, users: U) -> Self {
        Self::with_config(issues, users, ScoringConfig::default(), PriorityConfig::default())
    }

    pub fn with_config(
        issues: I,
        users: U,
        scoring: ScoringConfig,
        priority: PriorityConfig,
    ) -> Self {
        Self {
            issues,
            users,
            detector: DuplicateDetector::new(scoring),
            priority: PriorityCalculator::new(priority),
            cell_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Ingest a citizen report. Merges into the best qualifying duplicate
    /// (upvote bump, severity upgrade, priority recompute) or creates a new
    /// issue in state `reported` with an initial priority.
    pub async fn report_issue(&self, report: NewReport) -> Result<ReportOutcome, RoadWatchError> {
        report.validate()?;
        self.users
            .get(report.reporter_id)
            .await?
            .ok_or_else(|| RoadWatchError::NotFound(format!("user {}", report.reporter_id)))?;

        let _cell_guard = self.lock_cell(&report.location).await?;
        let now = Utc::now();

        if let Some(matched) = self.detector.find_duplicate(&report, &self.issues, now).await? {
            let mut issue = matched.issue;
            issue.upvotes += 1;
            if report.severity > issue.severity {
                issue.severity = report.severity;
            }
            issue.priority = self.priority.calculate(PriorityInputs::for_issue(&issue, now));
            issue.updated_at = now;
            self.issues.update(&issue).await?;
            info!(
                issue_id = %issue.id,
                distance_m = matched.distance_m,
                similarity = matched.similarity,
                upvotes = issue.upvotes,
                "Report merged into existing issue"
            );
            return Ok(ReportOutcome::MergedInto(issue));
        }

        let issue = Issue {
            id: Uuid::new_v4(),
            issue_type: report.issue_type,
            location: report.location,
            address: report.address,
            severity: report.severity,
            description: report.description,
            status: IssueStatus::Reported,
            priority: self.priority.calculate(PriorityInputs {
                severity: report.severity,
                upvotes: 0,
                road_type: report.road_type,
                age_days: 0,
            }),
            upvotes: 0,
            road_type: report.road_type,
            ward: report.ward,
            estimated_repair_days: None,
            reporter_id: report.reporter_id,
            verified_by: None,
            verified_at: None,
            fixed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.issues.insert(issue.clone()).await?;
        self.users
            .increment(report.reporter_id, UserCounter::ReportsFiled)
            .await?;
        info!(
            issue_id = %issue.id,
            issue_type = %issue.issue_type,
            priority = issue.priority,
            "New issue created"
        );
        Ok(ReportOutcome::Created(issue))
    }

    /// Add one upvote from `user_id`. Each user may vote once per issue.
    pub async fn upvote(&self, issue_id: Uuid, user_id: Uuid) -> Result<u32, RoadWatchError> {
        let mut issue = self
            .issues
            .get(issue_id)
            .await?
            .ok_or_else(|| RoadWatchError::NotFound(format!("issue {issue_id}")))?;
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| RoadWatchError::NotFound(format!("user {user_id}")))?;

        if self.issues.has_voted(issue_id, user_id).await? {
            return Err(RoadWatchError::AlreadyVoted(format!(
                "user {user_id} already upvoted issue {issue_id}"
            )));
        }

        let now = Utc::now();
        self.issues.record_vote(issue_id, user_id).await?;
        issue.upvotes += 1;
        issue.priority = self.priority.calculate(PriorityInputs::for_issue(&issue, now));
        issue.updated_at = now;
        self.issues.update(&issue).await?;
        self.users
            .increment(user_id, UserCounter::UpvotesGiven)
            .await?;
        Ok(issue.upvotes)
    }

    /// Transition an issue to one of the four statuses. Any target among the
    /// four is accepted from any current state; corrections (e.g. fixed back
    /// to reported) are deliberately allowed. Entering `verified` requires a
    /// verifier and stamps `verified_at`; `fixed` stamps `fixed_at`.
    pub async fn set_status(
        &self,
        issue_id: Uuid,
        target: &str,
        verifier: Option<Uuid>,
        estimated_repair_days: Option<u32>,
    ) -> Result<Issue, RoadWatchError> {
        let status: IssueStatus = target.parse()?;
        let mut issue = self
            .issues
            .get(issue_id)
            .await?
            .ok_or_else(|| RoadWatchError::NotFound(format!("issue {issue_id}")))?;

        let now = Utc::now();
        issue.status = status;
        match status {
            IssueStatus::Verified => {
                let verifier = verifier.ok_or_else(|| {
                    RoadWatchError::Validation(
                        "verifier id is required to mark an issue verified".to_string(),
                    )
                })?;
                issue.verified_by = Some(verifier);
                issue.verified_at = Some(now);
            }
            IssueStatus::Fixed => {
                issue.fixed_at = Some(now);
            }
            IssueStatus::Reported | IssueStatus::RepairScheduled => {}
        }
        if let Some(days) = estimated_repair_days {
            issue.estimated_repair_days = Some(days);
        }
        issue.updated_at = now;
        self.issues.update(&issue).await?;
        info!(issue_id = %issue.id, status = %issue.status, "Issue status updated");
        Ok(issue)
    }

    /// Aggregates over issues created in the last `window_days`, optionally
    /// restricted to one ward.
    pub async fn stats(
        &self,
        ward: Option<&str>,
        window_days: i64,
    ) -> Result<IssueStats, RoadWatchError> {
        let since = Utc::now() - Duration::days(window_days);
        let issues = self.issues.issues_since(since, ward).await?;
        Ok(compute_stats(&issues))
    }

    pub fn issue_store(&self) -> &I {
        &self.issues
    }

    pub fn user_store(&self) -> &U {
        &self.users
    }

    /// Serialize report ingestion per geohash cell.
    async fn lock_cell(&self, point: &GeoPoint) -> Result<OwnedMutexGuard<()>, RoadWatchError> {
        let cell = geohash::encode(Coord { x: point.lng, y: point.lat }, CELL_PRECISION)
            .map_err(|e| RoadWatchError::Validation(format!("coordinate not encodable: {e}")))?;
        let lock = {
            let mut locks = self.cell_locks.lock().expect("cell lock map poisoned");
            Arc::clone(locks.entry(cell).or_default())
        };
        Ok(lock.lock_owned().await)
    }
}
