use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DeliverableStatus {
    NotStarted,
    ToDo,
    InProgress,
    InReview,
    Done,
}

impl std::fmt::Display for DeliverableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliverableStatus::NotStarted => write!(f, "not-started"),
            DeliverableStatus::ToDo => write!(f, "to-do"),
            DeliverableStatus::InProgress => write!(f, "in-progress"),
            DeliverableStatus::InReview => write!(f, "in-review"),
            DeliverableStatus::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Deliverable {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: DeliverableStatus,
    pub assignee_id: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub project_area: String,
    pub due_date: Option<NaiveDate>,
    pub week_number: Option<i32>,
    pub document_link: Option<String>,
    // status == done is expected to go with progress == 100 but the server
    // does not enforce the pairing; the UI only suggests it.
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

impl Deliverable {
    /// An assignee counts as present only when it is a real name, not the
    /// empty string or the "Unassigned" placeholder the UI writes.
    pub fn has_assignee(&self) -> bool {
        matches!(
            self.assignee_name.as_deref(),
            Some(name) if !name.is_empty() && name != "Unassigned"
        )
    }

    /// Reminder window: due today or tomorrow. Overdue deliverables fall
    /// outside it; their reminder moment has passed.
    /// [`DeliverableRepository::find_due_soon`] mirrors this in SQL.
    ///
    /// [`DeliverableRepository::find_due_soon`]: super::deliverable_repository::DeliverableRepository::find_due_soon
    pub fn due_within_next_day(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due >= today && due <= today + Days::new(1),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub deliverable_id: Uuid,
    pub action: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliverable_status_display() {
        assert_eq!(DeliverableStatus::NotStarted.to_string(), "not-started");
        assert_eq!(DeliverableStatus::ToDo.to_string(), "to-do");
        assert_eq!(DeliverableStatus::InProgress.to_string(), "in-progress");
        assert_eq!(DeliverableStatus::InReview.to_string(), "in-review");
        assert_eq!(DeliverableStatus::Done.to_string(), "done");
    }

    fn deliverable_due(due_date: Option<NaiveDate>) -> Deliverable {
        Deliverable {
            id: Uuid::new_v4(),
            title: "Draft launch plan".to_string(),
            description: None,
            status: DeliverableStatus::InProgress,
            assignee_id: None,
            assignee_name: Some("Alice".to_string()),
            project_area: "Operations".to_string(),
            due_date,
            week_number: None,
            document_link: None,
            progress: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_due_within_next_day_window() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let due_today = deliverable_due(Some(today));
        assert!(due_today.due_within_next_day(today));

        let due_tomorrow = deliverable_due(today.succ_opt());
        assert!(due_tomorrow.due_within_next_day(today));

        let overdue = deliverable_due(today.pred_opt());
        assert!(!overdue.due_within_next_day(today));

        let due_later = deliverable_due(Some(today + Days::new(2)));
        assert!(!due_later.due_within_next_day(today));

        let undated = deliverable_due(None);
        assert!(!undated.due_within_next_day(today));
    }

    #[test]
    fn test_deliverable_status_serde_kebab_case() {
        let status: DeliverableStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, DeliverableStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&DeliverableStatus::Done).unwrap(),
            "\"done\""
        );
    }
}
