//! Store contracts the engine depends on.
//!
//! Implemented by whatever persistence the deployment uses; the engine ships
//! an in-memory implementation (`crate::memory`) for tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use roadwatch_common::{Issue, IssueStatus, IssueType, RoadWatchError, User};

/// Which per-user counter to bump. Incrementing also touches `last_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCounter {
    ReportsFiled,
    UpvotesGiven,
}

/// Persistence contract for issues and their voter sets.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Open issues of one type created since `since`, any order.
    async fn query_candidates(
        &self,
        issue_type: IssueType,
        since: DateTime<Utc>,
        statuses: &[IssueStatus],
    ) -> Result<Vec<Issue>, RoadWatchError>;

    async fn get(&self, id: Uuid) -> Result<Option<Issue>, RoadWatchError>;

    async fn insert(&self, issue: Issue) -> Result<(), RoadWatchError>;

    async fn update(&self, issue: &Issue) -> Result<(), RoadWatchError>;

    /// Issues created since `since`, optionally filtered to one ward.
    async fn issues_since(
        &self,
        since: DateTime<Utc>,
        ward: Option<&str>,
    ) -> Result<Vec<Issue>, RoadWatchError>;

    async fn has_voted(&self, issue_id: Uuid, user_id: Uuid) -> Result<bool, RoadWatchError>;

    async fn record_vote(&self, issue_id: Uuid, user_id: Uuid) -> Result<(), RoadWatchError>;
}

/// Persistence contract for reporter/voter identities.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<User>, RoadWatchError>;

    async fn increment(&self, id: Uuid, counter: UserCounter) -> Result<(), RoadWatchError>;
}
