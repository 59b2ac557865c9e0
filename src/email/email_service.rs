use super::email_templates;
use super::transport::MailTransport;
use crate::deliverable::deliverable_models::Deliverable;
use crate::notification::notifier::{plan_events, NotificationEvent, NotifierPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailEvent {
    Assignment,
    Congratulations,
    Completion,
}

impl std::str::FromStr for EmailEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment" => Ok(EmailEvent::Assignment),
            "congratulations" => Ok(EmailEvent::Congratulations),
            "completion" => Ok(EmailEvent::Completion),
            _ => Err("Invalid email type. Must be: assignment, congratulations, or completion"
                .to_string()),
        }
    }
}

/// Outcome of one dispatch. Failure is data, not an error: the deliverable
/// mutation that triggered the dispatch already succeeded.
#[derive(Debug, Clone)]
pub struct EmailOutcome {
    pub success: bool,
    pub error: Option<String>,
}

/// Maps notification events to outbound emails: who gets which template.
#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    directory: HashMap<String, String>,
    ops_email: String,
    app_url: String,
}

impl EmailService {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        directory: HashMap<String, String>,
        ops_email: String,
        app_url: String,
    ) -> Self {
        Self {
            transport,
            directory,
            ops_email,
            app_url,
        }
    }

    /// Best-effort fan-out for a deliverable mutation. Every dispatch outcome
    /// is logged here; callers do not need to inspect anything.
    pub async fn dispatch_for_mutation(&self, previous: Option<&Deliverable>, updated: &Deliverable) {
        let assignee_name = updated.assignee_name.clone().unwrap_or_default();

        // Email fan-out tracks the assignment and completion rules only; a
        // bare status change never emails anyone. The status-change policy is
        // irrelevant here, so the default policy is fine.
        for event in plan_events(previous, updated, &NotifierPolicy::default()) {
            let dispatches: &[EmailEvent] = match event {
                NotificationEvent::Assigned => &[EmailEvent::Assignment],
                NotificationEvent::Completed => {
                    &[EmailEvent::Congratulations, EmailEvent::Completion]
                }
                NotificationEvent::StatusChanged { .. } => &[],
            };

            for &dispatch in dispatches {
                let outcome = self.dispatch(dispatch, updated, &assignee_name).await;
                if !outcome.success {
                    warn!(
                        "Email dispatch {:?} failed for \"{}\": {}",
                        dispatch,
                        updated.title,
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
    }

    pub async fn dispatch(
        &self,
        event: EmailEvent,
        task: &Deliverable,
        assignee_name: &str,
    ) -> EmailOutcome {
        match event {
            EmailEvent::Assignment => self.send_assignment(task, assignee_name).await,
            EmailEvent::Congratulations => self.send_congratulations(task, assignee_name).await,
            EmailEvent::Completion => self.send_completion(task, assignee_name).await,
        }
    }

    async fn send_assignment(&self, task: &Deliverable, assignee_name: &str) -> EmailOutcome {
        let Some(recipient) = self.directory.get(assignee_name) else {
            warn!("No email found for team member: {}", assignee_name);
            return EmailOutcome {
                success: false,
                error: Some("No email found for team member".to_string()),
            };
        };

        let template = email_templates::task_assignment(task, assignee_name, &self.app_url);
        let personal = self
            .transport
            .send(recipient, &template.subject, &template.html)
            .await;

        // Staff copy goes out regardless; its failure is only logged.
        let notice = email_templates::assignment_staff_notice(task, assignee_name);
        let staff = self
            .transport
            .send(&self.ops_email, &notice.subject, &notice.html)
            .await;
        if !staff.success {
            warn!(
                "Staff assignment notice failed for \"{}\": {}",
                task.title,
                staff.error.as_deref().unwrap_or("unknown error")
            );
        }

        if personal.success {
            info!("Assignment email sent to {}", assignee_name);
            EmailOutcome {
                success: true,
                error: None,
            }
        } else {
            EmailOutcome {
                success: false,
                error: personal.error,
            }
        }
    }

    async fn send_congratulations(&self, task: &Deliverable, assignee_name: &str) -> EmailOutcome {
        let Some(recipient) = self.directory.get(assignee_name) else {
            warn!("No email found for team member: {}", assignee_name);
            return EmailOutcome {
                success: false,
                error: Some("No email found for team member".to_string()),
            };
        };

        let template = email_templates::congratulations(task, assignee_name);
        let outcome = self
            .transport
            .send(recipient, &template.subject, &template.html)
            .await;

        if outcome.success {
            info!("Congratulations email sent to {}", assignee_name);
        }
        EmailOutcome {
            success: outcome.success,
            error: outcome.error,
        }
    }

    /// Informs the company, not the worker: always goes to the operations
    /// address, whether or not the assignee resolves.
    async fn send_completion(&self, task: &Deliverable, assignee_name: &str) -> EmailOutcome {
        let template = email_templates::task_completion(task, assignee_name, &self.app_url);
        let outcome = self
            .transport
            .send(&self.ops_email, &template.subject, &template.html)
            .await;

        if outcome.success {
            info!("Completion email sent for \"{}\"", task.title);
        }
        EmailOutcome {
            success: outcome.success,
            error: outcome.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliverable::deliverable_models::DeliverableStatus;
    use crate::email::transport::SendOutcome;
    use axum::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug, Clone)]
    struct SentEmail {
        to: String,
        subject: String,
    }

    struct RecordingTransport {
        sent: Mutex<Vec<SentEmail>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn sent(&self) -> Vec<SentEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, to: &str, subject: &str, _html: &str) -> SendOutcome {
            self.sent.lock().unwrap().push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
            });
            if self.fail {
                SendOutcome::failed("smtp down")
            } else {
                SendOutcome::ok(Some("email-id".to_string()))
            }
        }
    }

    fn service(transport: Arc<RecordingTransport>) -> EmailService {
        let mut directory = HashMap::new();
        directory.insert("Alice".to_string(), "alice@example.com".to_string());
        EmailService::new(
            transport,
            directory,
            "ops@example.com".to_string(),
            "http://localhost:3000".to_string(),
        )
    }

    fn task(status: DeliverableStatus, assignee: &str) -> Deliverable {
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
            week_number: None,
            document_link: None,
            progress: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_assignment_sends_personal_and_staff_emails() {
        let transport = RecordingTransport::new(false);
        let svc = service(transport.clone());

        let outcome = svc
            .dispatch(
                EmailEvent::Assignment,
                &task(DeliverableStatus::ToDo, "Alice"),
                "Alice",
            )
            .await;

        assert!(outcome.success);
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[1].to, "ops@example.com");
        assert_ne!(sent[0].subject, sent[1].subject);
    }

    #[tokio::test]
    async fn test_assignment_fails_without_directory_entry() {
        let transport = RecordingTransport::new(false);
        let svc = service(transport.clone());

        let outcome = svc
            .dispatch(
                EmailEvent::Assignment,
                &task(DeliverableStatus::ToDo, "Mallory"),
                "Mallory",
            )
            .await;

        assert!(!outcome.success);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_congratulations_goes_to_the_assignee() {
        let transport = RecordingTransport::new(false);
        let svc = service(transport.clone());

        let outcome = svc
            .dispatch(
                EmailEvent::Congratulations,
                &task(DeliverableStatus::Done, "Alice"),
                "Alice",
            )
            .await;

        assert!(outcome.success);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
    }

    #[tokio::test]
    async fn test_completion_always_goes_to_ops() {
        let transport = RecordingTransport::new(false);
        let svc = service(transport.clone());

        // Assignee is not in the directory; the company still gets told.
        let outcome = svc
            .dispatch(
                EmailEvent::Completion,
                &task(DeliverableStatus::Done, "Mallory"),
                "Mallory",
            )
            .await;

        assert!(outcome.success);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.com");
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_outcome_not_a_panic() {
        let transport = RecordingTransport::new(true);
        let svc = service(transport.clone());

        let outcome = svc
            .dispatch(
                EmailEvent::Congratulations,
                &task(DeliverableStatus::Done, "Alice"),
                "Alice",
            )
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("smtp down"));
    }

    #[tokio::test]
    async fn test_mutation_completion_dispatches_congratulations_and_completion() {
        let transport = RecordingTransport::new(false);
        let svc = service(transport.clone());

        let prev = task(DeliverableStatus::InProgress, "Alice");
        let next = task(DeliverableStatus::Done, "Alice");
        svc.dispatch_for_mutation(Some(&prev), &next).await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[1].to, "ops@example.com");
    }

    #[tokio::test]
    async fn test_mutation_status_change_sends_nothing() {
        let transport = RecordingTransport::new(false);
        let svc = service(transport.clone());

        let prev = task(DeliverableStatus::ToDo, "Alice");
        let next = task(DeliverableStatus::InProgress, "Alice");
        svc.dispatch_for_mutation(Some(&prev), &next).await;

        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_email_event_from_str() {
        use std::str::FromStr;
        assert_eq!(
            EmailEvent::from_str("assignment").unwrap(),
            EmailEvent::Assignment
        );
        assert!(EmailEvent::from_str("reminder").is_err());
    }
}
