use serde::{Deserialize, Serialize};

/// Analytics event model: one ingested detection record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalyticsEvent {
    pub analytics_id: i64,
    pub user_id: String,
    pub log_image: String,
    pub log_video: String,
    pub create_date: String,
    pub message: String,
    pub camera_id: String,
    pub camera_location: String,
    pub action: String,
    pub status: String,
}

impl AnalyticsEvent {
    /// Boolean reading of the status column. The same column carries
    /// workflow labels and the literal markers "true"/"false"; anything
    /// that is not a literal marker has no outcome.
    pub fn outcome(&self) -> Option<bool> {
        match self.status.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Workflow status values stamped by ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// Stamped on direct uploads
    ActionReceived,
    /// Stamped on synthetic/seed records
    Active,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::ActionReceived => "Action Received",
            EventStatus::Active => "Active",
        }
    }
}

/// Insert payload for a new analytics event. The id is assigned by the
/// store; create_date is stamped by the server clock before insert.
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
    pub user_id: String,
    pub log_image: String,
    pub log_video: String,
    pub create_date: String,
    pub message: String,
    pub camera_id: String,
    pub camera_location: String,
    pub action: String,
    pub status: String,
}

/// Lightweight projection returned by the report listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportRow {
    pub analytics_id: i64,
    pub message: String,
    pub create_date: String,
}
