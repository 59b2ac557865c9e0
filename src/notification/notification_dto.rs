use super::notification_models::Notification;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub related_deliverable_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateNotificationRequest {
    pub is_read: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    MarkRead,
    MarkUnread,
    Delete,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchNotificationRequest {
    pub action: String,
    pub notification_ids: Vec<String>,
}

impl BatchNotificationRequest {
    pub fn parse_action(&self) -> Result<BatchAction> {
        match self.action.as_str() {
            "mark_read" => Ok(BatchAction::MarkRead),
            "mark_unread" => Ok(BatchAction::MarkUnread),
            "delete" => Ok(BatchAction::Delete),
            _ => Err(AppError::BadRequest(
                "Invalid action. Must be: mark_read, mark_unread, or delete".to_string(),
            )),
        }
    }

    /// Full request validation, run before any store mutation: unknown
    /// actions, empty id lists, and malformed ids are all 400s from here.
    pub fn validate(&self) -> Result<(BatchAction, Vec<Uuid>)> {
        let action = self.parse_action()?;

        if self.notification_ids.is_empty() {
            return Err(AppError::BadRequest(
                "notification_ids must be a non-empty array".to_string(),
            ));
        }

        let ids = parse_notification_ids(&self.notification_ids).map_err(|invalid| {
            AppError::BadRequest(format!("Invalid notification IDs: {}", invalid.join(", ")))
        })?;

        Ok((action, ids))
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub unread_only: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    #[serde(rename = "unreadCount")]
    pub unread_count: i64,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

impl NotificationListResponse {
    /// The degraded payload the list endpoint serves whenever it cannot
    /// produce real data. Always paired with a 200 status.
    pub fn empty() -> Self {
        Self {
            notifications: Vec::new(),
            unread_count: 0,
            total_count: 0,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchNotificationResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "affectedCount")]
    pub affected_count: u64,
}

/// Checks every id against the canonical hyphenated UUID shape before any
/// store mutation happens. Returns the parsed ids, or the offending raw ids.
pub fn parse_notification_ids(ids: &[String]) -> std::result::Result<Vec<Uuid>, Vec<String>> {
    let mut parsed = Vec::with_capacity(ids.len());
    let mut invalid = Vec::new();

    for id in ids {
        match Uuid::try_parse(id) {
            Ok(uuid) if id.len() == 36 => parsed.push(uuid),
            _ => invalid.push(id.clone()),
        }
    }

    if invalid.is_empty() {
        Ok(parsed)
    } else {
        Err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notification_ids_accepts_canonical_uuids() {
        let ids = vec![
            "a3bb189e-8bf9-3888-9912-ace4e6543002".to_string(),
            "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
        ];
        let parsed = parse_notification_ids(&ids).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_parse_notification_ids_lists_offenders() {
        let ids = vec![
            "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
            "not-a-uuid".to_string(),
            "67e5504410b1426f9247bb680e5fe0c8".to_string(), // no hyphens
        ];
        let invalid = parse_notification_ids(&ids).unwrap_err();
        assert_eq!(
            invalid,
            vec![
                "not-a-uuid".to_string(),
                "67e5504410b1426f9247bb680e5fe0c8".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_rejects_empty_id_list() {
        let req = BatchNotificationRequest {
            action: "mark_read".to_string(),
            notification_ids: vec![],
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_validate_rejects_malformed_ids() {
        let req = BatchNotificationRequest {
            action: "delete".to_string(),
            notification_ids: vec![
                "67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
                "not-a-uuid".to_string(),
            ],
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid notification IDs: not-a-uuid"));
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let req = BatchNotificationRequest {
            action: "delete".to_string(),
            notification_ids: vec!["67e55044-10b1-426f-9247-bb680e5fe0c8".to_string()],
        };
        let (action, ids) = req.validate().unwrap();
        assert_eq!(action, BatchAction::Delete);
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_parse_action() {
        let req = BatchNotificationRequest {
            action: "mark_read".to_string(),
            notification_ids: vec![],
        };
        assert_eq!(req.parse_action().unwrap(), BatchAction::MarkRead);

        let req = BatchNotificationRequest {
            action: "archive".to_string(),
            notification_ids: vec![],
        };
        assert!(req.parse_action().is_err());
    }
}
