use super::deliverable_models::Deliverable;
use super::deliverable_repository::DeliverableRepository;
use tracing::warn;
use uuid::Uuid;

/// One change-history row waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryChange {
    pub action: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Computes the history rows a mutation produces: one per tracked field
/// transition. Pure so the transition matrix is unit-testable.
pub fn history_changes(previous: &Deliverable, updated: &Deliverable) -> Vec<HistoryChange> {
    let mut changes = Vec::new();

    if previous.status != updated.status {
        changes.push(HistoryChange {
            action: "Status updated to",
            old_value: Some(previous.status.to_string()),
            new_value: Some(updated.status.to_string()),
        });
    }

    if previous.assignee_name != updated.assignee_name {
        changes.push(HistoryChange {
            action: "Assignee changed to",
            old_value: previous.assignee_name.clone(),
            new_value: updated.assignee_name.clone(),
        });
    }

    changes
}

/// Writes the history rows for a mutation. History is bookkeeping, not the
/// primary action: failures are logged and swallowed.
pub async fn record_history(
    repo: &DeliverableRepository,
    previous: &Deliverable,
    updated: &Deliverable,
    actor: Option<Uuid>,
) {
    for change in history_changes(previous, updated) {
        if let Err(e) = repo
            .insert_history(
                updated.id,
                change.action,
                change.old_value.as_deref(),
                change.new_value.as_deref(),
                actor,
            )
            .await
        {
            warn!(
                "Failed to record history for deliverable {}: {:?}",
                updated.id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliverable::deliverable_models::DeliverableStatus;
    use chrono::Utc;

    fn deliverable(status: DeliverableStatus, assignee: Option<&str>) -> Deliverable {
        Deliverable {
            id: Uuid::new_v4(),
            title: "Draft launch plan".to_string(),
            description: None,
            status,
            assignee_id: None,
            assignee_name: assignee.map(String::from),
            project_area: "Operations".to_string(),
            due_date: None,
            week_number: None,
            document_link: None,
            progress: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_status_transition_recorded() {
        let prev = deliverable(DeliverableStatus::ToDo, Some("Alice"));
        let next = deliverable(DeliverableStatus::InProgress, Some("Alice"));

        let changes = history_changes(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, "Status updated to");
        assert_eq!(changes[0].old_value.as_deref(), Some("to-do"));
        assert_eq!(changes[0].new_value.as_deref(), Some("in-progress"));
    }

    #[test]
    fn test_assignee_transition_recorded() {
        let prev = deliverable(DeliverableStatus::ToDo, Some("Alice"));
        let next = deliverable(DeliverableStatus::ToDo, Some("Bob"));

        let changes = history_changes(&prev, &next);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].action, "Assignee changed to");
    }

    #[test]
    fn test_both_transitions_recorded() {
        let prev = deliverable(DeliverableStatus::ToDo, None);
        let next = deliverable(DeliverableStatus::Done, Some("Alice"));

        let changes = history_changes(&prev, &next);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_no_transition_no_rows() {
        let prev = deliverable(DeliverableStatus::ToDo, Some("Alice"));
        let next = deliverable(DeliverableStatus::ToDo, Some("Alice"));

        assert!(history_changes(&prev, &next).is_empty());
    }
}
