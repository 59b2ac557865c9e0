use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    TaskAssigned,
    TaskCompleted,
    TaskStatusChanged,
    CommentAdded,
    DueDateReminder,
    TaskUpdated,
}

impl NotificationType {
    pub const ALL: [NotificationType; 6] = [
        NotificationType::TaskAssigned,
        NotificationType::TaskCompleted,
        NotificationType::TaskStatusChanged,
        NotificationType::CommentAdded,
        NotificationType::DueDateReminder,
        NotificationType::TaskUpdated,
    ];
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::TaskAssigned => write!(f, "task_assigned"),
            NotificationType::TaskCompleted => write!(f, "task_completed"),
            NotificationType::TaskStatusChanged => write!(f, "task_status_changed"),
            NotificationType::CommentAdded => write!(f, "comment_added"),
            NotificationType::DueDateReminder => write!(f, "due_date_reminder"),
            NotificationType::TaskUpdated => write!(f, "task_updated"),
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task_assigned" => Ok(NotificationType::TaskAssigned),
            "task_completed" => Ok(NotificationType::TaskCompleted),
            "task_status_changed" => Ok(NotificationType::TaskStatusChanged),
            "comment_added" => Ok(NotificationType::CommentAdded),
            "due_date_reminder" => Ok(NotificationType::DueDateReminder),
            "task_updated" => Ok(NotificationType::TaskUpdated),
            other => Err(format!("Unknown notification type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related_deliverable_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Insert payload shared by the live notifier, the backfill job and the
/// direct-creation endpoint.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub related_deliverable_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    pub metadata: serde_json::Value,
}
