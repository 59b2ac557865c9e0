use super::notification_models::{NewNotification, NotificationType};
use super::notification_repository::NotificationRepository;
use crate::deliverable::deliverable_models::{Deliverable, DeliverableStatus};
use crate::profile::profile_repository::ProfileRepository;
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

/// One fired decision rule for a deliverable mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Assigned,
    Completed,
    StatusChanged {
        old: DeliverableStatus,
        new: DeliverableStatus,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotifierPolicy {
    /// Drop the status-change event when the completion event fires on the
    /// same mutation. Off by default: a completion historically produced both
    /// a task_completed and a task_status_changed row.
    pub suppress_status_change_on_completion: bool,
}

/// Evaluates the mutation decision rules. Pure; all I/O lives in
/// [`Notifier::notify_on_mutation`].
///
/// `previous` is absent on creation, which counts as "was not done" and
/// "had no assignee".
pub fn plan_events(
    previous: Option<&Deliverable>,
    updated: &Deliverable,
    policy: &NotifierPolicy,
) -> Vec<NotificationEvent> {
    let mut events = Vec::new();

    let was_done = previous.map_or(false, |p| p.status == DeliverableStatus::Done);
    let completed = updated.status == DeliverableStatus::Done && !was_done;

    let assigned = updated.has_assignee()
        && previous.map_or(true, |p| p.assignee_name != updated.assignee_name);

    if assigned {
        events.push(NotificationEvent::Assigned);
    }

    if completed {
        events.push(NotificationEvent::Completed);
    }

    // A plain status change only notifies when nothing else already tells the
    // assignee about the current state: a fresh assignment carries the status,
    // and a completion carries it too when the suppression policy is on.
    if let Some(previous) = previous {
        let status_changed = previous.status != updated.status
            && updated.has_assignee()
            && !assigned
            && !(completed && policy.suppress_status_change_on_completion);
        if status_changed {
            events.push(NotificationEvent::StatusChanged {
                old: previous.status,
                new: updated.status,
            });
        }
    }

    events
}

/// Translates a deliverable mutation into recipient-scoped notification rows.
#[derive(Clone)]
pub struct Notifier {
    profiles: ProfileRepository,
    notifications: NotificationRepository,
    policy: NotifierPolicy,
}

impl Notifier {
    pub fn new(
        profiles: ProfileRepository,
        notifications: NotificationRepository,
        policy: NotifierPolicy,
    ) -> Self {
        Self {
            profiles,
            notifications,
            policy,
        }
    }

    /// Runs every fired rule to completion. Failures are logged and swallowed:
    /// the triggering deliverable mutation must never fail because a
    /// notification could not be written.
    pub async fn notify_on_mutation(
        &self,
        previous: Option<&Deliverable>,
        updated: &Deliverable,
        actor: Option<Uuid>,
    ) {
        for event in plan_events(previous, updated, &self.policy) {
            let Some(assignee_name) = updated.assignee_name.as_deref() else {
                continue;
            };

            let recipient = match self.profiles.find_by_name(assignee_name).await {
                Ok(Some(profile)) => profile,
                Ok(None) => {
                    warn!("No profile found for assignee: {}", assignee_name);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to resolve assignee {}: {:?}", assignee_name, e);
                    continue;
                }
            };

            let new = build_notification(&event, updated, recipient.id, actor);

            match self.notifications.create(new).await {
                Ok(_) => info!(
                    "Created {:?} notification for \"{}\" -> {}",
                    event, updated.title, assignee_name
                ),
                Err(e) => warn!(
                    "Failed to create {:?} notification for \"{}\": {:?}",
                    event, updated.title, e
                ),
            }
        }
    }
}

fn build_notification(
    event: &NotificationEvent,
    task: &Deliverable,
    recipient_id: Uuid,
    actor: Option<Uuid>,
) -> NewNotification {
    let assignee_name = task.assignee_name.clone().unwrap_or_default();

    let (notification_type, title, message, metadata) = match event {
        NotificationEvent::Assigned => (
            NotificationType::TaskAssigned,
            "Task Assigned".to_string(),
            format!("You have been assigned to \"{}\"", task.title),
            json!({
                "assignee_name": assignee_name,
                "project_area": task.project_area,
                "due_date": task.due_date,
            }),
        ),
        NotificationEvent::Completed => (
            NotificationType::TaskCompleted,
            "Task Completed".to_string(),
            format!("Congratulations! You completed \"{}\"", task.title),
            json!({
                "assignee_name": assignee_name,
                "project_area": task.project_area,
                "completed_at": Utc::now(),
            }),
        ),
        NotificationEvent::StatusChanged { old, new } => (
            NotificationType::TaskStatusChanged,
            "Task Status Updated".to_string(),
            format!("\"{}\" status changed from {} to {}", task.title, old, new),
            json!({
                "assignee_name": assignee_name,
                "old_status": old.to_string(),
                "new_status": new.to_string(),
            }),
        ),
    };

    NewNotification {
        user_id: recipient_id,
        notification_type,
        title,
        message,
        related_deliverable_id: Some(task.id),
        related_user_id: actor,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deliverable(status: DeliverableStatus, assignee: &str) -> Deliverable {
        Deliverable {
            id: Uuid::new_v4(),
            title: "Draft launch plan".to_string(),
            description: None,
            status,
            assignee_id: None,
            assignee_name: if assignee.is_empty() {
                None
            } else {
                Some(assignee.to_string())
            },
            project_area: "Operations".to_string(),
            due_date: None,
            week_number: Some(3),
            document_link: None,
            progress: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_completion_fires_once() {
        let prev = deliverable(DeliverableStatus::InProgress, "Alice");
        let mut next = deliverable(DeliverableStatus::Done, "Alice");
        next.id = prev.id;

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert!(events.contains(&NotificationEvent::Completed));
        assert!(!events.contains(&NotificationEvent::Assigned));
    }

    #[test]
    fn test_completion_cofires_with_status_change_by_default() {
        let prev = deliverable(DeliverableStatus::InProgress, "Alice");
        let next = deliverable(DeliverableStatus::Done, "Alice");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert_eq!(
            events,
            vec![
                NotificationEvent::Completed,
                NotificationEvent::StatusChanged {
                    old: DeliverableStatus::InProgress,
                    new: DeliverableStatus::Done,
                },
            ]
        );
    }

    #[test]
    fn test_suppression_policy_drops_status_change_on_completion() {
        let prev = deliverable(DeliverableStatus::InProgress, "Alice");
        let next = deliverable(DeliverableStatus::Done, "Alice");
        let policy = NotifierPolicy {
            suppress_status_change_on_completion: true,
        };

        let events = plan_events(Some(&prev), &next, &policy);
        assert_eq!(events, vec![NotificationEvent::Completed]);
    }

    #[test]
    fn test_assignment_fires_on_new_assignee() {
        let prev = deliverable(DeliverableStatus::ToDo, "Alice");
        let next = deliverable(DeliverableStatus::ToDo, "Bob");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert_eq!(events, vec![NotificationEvent::Assigned]);
    }

    #[test]
    fn test_assignment_skips_unassigned_placeholder() {
        let prev = deliverable(DeliverableStatus::ToDo, "Alice");
        let next = deliverable(DeliverableStatus::ToDo, "Unassigned");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_status_change_fires_with_stable_assignee() {
        let prev = deliverable(DeliverableStatus::ToDo, "Alice");
        let next = deliverable(DeliverableStatus::InProgress, "Alice");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert_eq!(
            events,
            vec![NotificationEvent::StatusChanged {
                old: DeliverableStatus::ToDo,
                new: DeliverableStatus::InProgress,
            }]
        );
    }

    #[test]
    fn test_status_change_needs_an_assignee() {
        let prev = deliverable(DeliverableStatus::ToDo, "");
        let next = deliverable(DeliverableStatus::InProgress, "");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert!(events.is_empty());
    }

    // The least obvious behaviour: assigning and completing in one mutation
    // produces the assignment and completion events only, even though the
    // status also changed.
    #[test]
    fn test_assign_and_complete_in_one_mutation() {
        let prev = deliverable(DeliverableStatus::ToDo, "");
        let next = deliverable(DeliverableStatus::Done, "Alice");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert_eq!(
            events,
            vec![NotificationEvent::Assigned, NotificationEvent::Completed]
        );
    }

    #[test]
    fn test_creation_with_assignee_fires_assignment() {
        let next = deliverable(DeliverableStatus::ToDo, "Alice");

        let events = plan_events(None, &next, &NotifierPolicy::default());
        assert_eq!(events, vec![NotificationEvent::Assigned]);
    }

    #[test]
    fn test_creation_already_done_fires_completion_too() {
        let next = deliverable(DeliverableStatus::Done, "Alice");

        let events = plan_events(None, &next, &NotifierPolicy::default());
        assert_eq!(
            events,
            vec![NotificationEvent::Assigned, NotificationEvent::Completed]
        );
    }

    #[test]
    fn test_no_change_no_events() {
        let prev = deliverable(DeliverableStatus::InProgress, "Alice");
        let next = deliverable(DeliverableStatus::InProgress, "Alice");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_already_done_stays_done_fires_nothing() {
        let prev = deliverable(DeliverableStatus::Done, "Alice");
        let next = deliverable(DeliverableStatus::Done, "Alice");

        let events = plan_events(Some(&prev), &next, &NotifierPolicy::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_build_notification_messages() {
        let task = deliverable(DeliverableStatus::Done, "Alice");
        let recipient = Uuid::new_v4();

        let n = build_notification(&NotificationEvent::Completed, &task, recipient, None);
        assert_eq!(n.notification_type, NotificationType::TaskCompleted);
        assert_eq!(n.title, "Task Completed");
        assert!(n.message.contains("Draft launch plan"));
        assert_eq!(n.related_deliverable_id, Some(task.id));
        assert_eq!(n.metadata["assignee_name"], "Alice");

        let n = build_notification(
            &NotificationEvent::StatusChanged {
                old: DeliverableStatus::ToDo,
                new: DeliverableStatus::InReview,
            },
            &task,
            recipient,
            None,
        );
        assert_eq!(n.notification_type, NotificationType::TaskStatusChanged);
        assert!(n.message.contains("from to-do to in-review"));
    }
}
