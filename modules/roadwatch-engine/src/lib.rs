//! Duplicate detection and priority scoring for citizen road reports.
//!
//! A new report flows through `DuplicateDetector` (geo distance +
//! `SimilarityScorer` against recent open issues from the `IssueStore`);
//! a qualifying match is merged in place, otherwise a fresh issue is
//! created with an initial `PriorityCalculator` score. `IssueService`
//! orchestrates the whole lifecycle and serializes report ingestion per
//! geographic cell.

pub mod config;
pub mod detector;
pub mod lifecycle;
pub mod memory;
pub mod priority;
pub mod similarity;
pub mod stats;
pub mod traits;

pub use config::ScoringConfig;
pub use detector::{DuplicateDetector, DuplicateMatch};
pub use lifecycle::{IssueService, ReportOutcome};
pub use memory::{InMemoryIssueStore, InMemoryUserStore};
pub use priority::{PriorityCalculator, PriorityConfig, PriorityInputs};
pub use similarity::SimilarityScorer;
pub use stats::{compute_stats, IssueStats};
pub use traits::{IssueStore, UserCounter, UserStore};
