//! In-memory store implementations.
//!
//! Back the integration tests and small demos; production deployments plug
//! their own `IssueStore`/`UserStore` in instead.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use roadwatch_common::{Issue, IssueStatus, IssueType, RoadWatchError, User};

use crate::traits::{IssueStore, UserCounter, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryIssueStore {
    issues: RwLock<HashMap<Uuid, Issue>>,
    voters: RwLock<HashMap<Uuid, HashSet<Uuid>>>,
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all issues, for assertions.
    pub fn all(&self) -> Vec<Issue> {
        self.issues
            .read()
            .expect("issue store lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn query_candidates(
        &self,
        issue_type: IssueType,
        since: DateTime<Utc>,
        statuses: &[IssueStatus],
    ) -> Result<Vec<Issue>, RoadWatchError> {
        let issues = self.issues.read().expect("issue store lock poisoned");
        Ok(issues
            .values()
            .filter(|i| {
                i.issue_type == issue_type
                    && i.created_at >= since
                    && statuses.contains(&i.status)
            })
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Issue>, RoadWatchError> {
        let issues = self.issues.read().expect("issue store lock poisoned");
        Ok(issues.get(&id).cloned())
    }

    async fn insert(&self, issue: Issue) -> Result<(), RoadWatchError> {
        let mut issues = self.issues.write().expect("issue store lock poisoned");
        issues.insert(issue.id, issue);
        Ok(())
    }

    async fn update(&self, issue: &Issue) -> Result<(), RoadWatchError> {
        let mut issues = self.issues.write().expect("issue store lock poisoned");
        if !issues.contains_key(&issue.id) {
            return Err(RoadWatchError::NotFound(format!("issue {}", issue.id)));
        }
        issues.insert(issue.id, issue.clone());
        Ok(())
    }

    async fn issues_since(
        &self,
        since: DateTime<Utc>,
        ward: Option<&str>,
    ) -> Result<Vec<Issue>, RoadWatchError> {
        let issues = self.issues.read().expect("issue store lock poisoned");
        Ok(issues
            .values()
            .filter(|i| i.created_at >= since)
            .filter(|i| match ward {
                Some(w) => i.ward.as_deref() == Some(w),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn has_voted(&self, issue_id: Uuid, user_id: Uuid) -> Result<bool, RoadWatchError> {
        let voters = self.voters.read().expect("voter set lock poisoned");
        Ok(voters
            .get(&issue_id)
            .is_some_and(|set| set.contains(&user_id)))
    }

    async fn record_vote(&self, issue_id: Uuid, user_id: Uuid) -> Result<(), RoadWatchError> {
        let mut voters = self.voters.write().expect("voter set lock poisoned");
        voters.entry(issue_id).or_default().insert(user_id);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, user: User) {
        let mut users = self.users.write().expect("user store lock poisoned");
        users.insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, id: Uuid) -> Result<Option<User>, RoadWatchError> {
        let users = self.users.read().expect("user store lock poisoned");
        Ok(users.get(&id).cloned())
    }

    async fn increment(&self, id: Uuid, counter: UserCounter) -> Result<(), RoadWatchError> {
        let mut users = self.users.write().expect("user store lock poisoned");
        let user = users
            .get_mut(&id)
            .ok_or_else(|| RoadWatchError::NotFound(format!("user {id}")))?;
        match counter {
            UserCounter::ReportsFiled => user.reports_filed += 1,
            UserCounter::UpvotesGiven => user.upvotes_given += 1,
        }
        user.last_active = Utc::now();
        Ok(())
    }
}
