use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RoadWatchError;

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// True when both components are inside the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Surface distance to another point in meters.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        haversine_m(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine great-circle distance between two lat/lng points in meters.
/// Spherical model, 6371 km mean Earth radius. Accurate to well under a
/// meter at the 50 m scale the duplicate detector cares about.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_M * c
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Pothole,
    RoadConstruction,
    RoadClosure,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::Pothole => write!(f, "pothole"),
            IssueType::RoadConstruction => write!(f, "road_construction"),
            IssueType::RoadClosure => write!(f, "road_closure"),
        }
    }
}

impl std::str::FromStr for IssueType {
    type Err = RoadWatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pothole" => Ok(IssueType::Pothole),
            "road_construction" => Ok(IssueType::RoadConstruction),
            "road_closure" => Ok(IssueType::RoadClosure),
            other => Err(RoadWatchError::Validation(format!(
                "unknown issue type: {other}"
            ))),
        }
    }
}

/// Ordinal severity: `low < medium < high < critical`. The derived `Ord`
/// drives both merge-time upgrades and match tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Lenient parse: anything outside the known set falls back to `Medium`,
    /// matching the priority table's default of 2.
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Medium,
        }
    }

    /// Base contribution to the priority score.
    pub fn priority_score(&self) -> f64 {
        match self {
            Severity::Low => 1.0,
            Severity::Medium => 2.0,
            Severity::High => 3.0,
            Severity::Critical => 5.0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Highway,
    MainRoad,
    Commercial,
    Residential,
    Other,
}

impl RoadType {
    /// Lenient parse: anything outside the known set falls back to `Other`.
    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "highway" => RoadType::Highway,
            "main_road" => RoadType::MainRoad,
            "commercial" => RoadType::Commercial,
            "residential" => RoadType::Residential,
            _ => RoadType::Other,
        }
    }

    /// Road class contribution to the priority score.
    pub fn priority_score(&self) -> f64 {
        match self {
            RoadType::Highway => 3.0,
            RoadType::MainRoad => 2.0,
            RoadType::Commercial => 2.0,
            RoadType::Residential => 1.0,
            RoadType::Other => 1.0,
        }
    }
}

impl std::fmt::Display for RoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadType::Highway => write!(f, "highway"),
            RoadType::MainRoad => write!(f, "main_road"),
            RoadType::Commercial => write!(f, "commercial"),
            RoadType::Residential => write!(f, "residential"),
            RoadType::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Reported,
    Verified,
    RepairScheduled,
    Fixed,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Reported => write!(f, "reported"),
            IssueStatus::Verified => write!(f, "verified"),
            IssueStatus::RepairScheduled => write!(f, "repair_scheduled"),
            IssueStatus::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = RoadWatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reported" => Ok(IssueStatus::Reported),
            "verified" => Ok(IssueStatus::Verified),
            "repair_scheduled" => Ok(IssueStatus::RepairScheduled),
            "fixed" => Ok(IssueStatus::Fixed),
            other => Err(RoadWatchError::InvalidStatus(other.to_string())),
        }
    }
}

// --- Issue ---

/// A reported road-surface problem as stored by the Issue Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub issue_type: IssueType,
    pub location: GeoPoint,
    pub address: String,
    pub severity: Severity,
    pub description: String,
    pub status: IssueStatus,
    pub priority: f64,
    pub upvotes: u32,
    pub road_type: RoadType,
    /// Administrative sub-area, used for regional stats filtering.
    pub ward: Option<String>,
    pub estimated_repair_days: Option<u32>,
    pub reporter_id: Uuid,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub fixed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An incoming citizen report, before dedup. Becomes an `Issue` (status
/// `reported`, zero upvotes) only when no qualifying duplicate exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub issue_type: IssueType,
    pub location: GeoPoint,
    pub address: String,
    pub severity: Severity,
    pub description: String,
    pub road_type: RoadType,
    pub ward: Option<String>,
    pub reporter_id: Uuid,
}

impl NewReport {
    /// Field-level validation. Coordinate ranges, non-empty address and
    /// description, non-nil reporter.
    pub fn validate(&self) -> Result<(), RoadWatchError> {
        if !self.location.is_valid() {
            return Err(RoadWatchError::Validation(format!(
                "coordinate out of range: ({}, {})",
                self.location.lat, self.location.lng
            )));
        }
        if self.description.trim().is_empty() {
            return Err(RoadWatchError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(RoadWatchError::Validation(
                "address must not be empty".to_string(),
            ));
        }
        if self.reporter_id.is_nil() {
            return Err(RoadWatchError::Validation(
                "reporter_id is required".to_string(),
            ));
        }
        Ok(())
    }
}

// --- User ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    Official,
}

/// A reporter/voter identity tracked by the User Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub reports_filed: u32,
    pub upvotes_given: u32,
    pub reputation: f64,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str, email: &str, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            reports_filed: 0,
            upvotes_given: 0,
            reputation: 0.0,
            last_active: now,
            created_at: now,
        }
    }
}
