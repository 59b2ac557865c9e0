use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// A project phase as shown on the dashboard timeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProjectPhase {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: PhaseStatus,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_status_serde_kebab_case() {
        let status: PhaseStatus = serde_json::from_str("\"not-started\"").unwrap();
        assert_eq!(status, PhaseStatus::NotStarted);
        assert_eq!(
            serde_json::to_string(&PhaseStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }
}
