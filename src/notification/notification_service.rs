use crate::notification::notification_models::{NewNotification, NotificationType};
use crate::state::AppState;
use serde_json::json;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

/// Starts the hourly due-date reminder sweep. Failures inside a run are
/// logged and the job fires again on the next tick.
pub async fn start_reminder_service(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = JobScheduler::new().await?;

    // Run at the top of every hour to catch deliverables coming due
    let job = Job::new_async("0 0 * * * *", move |_uuid, _l| {
        let state = state.clone();

        Box::pin(async move {
            if let Err(e) = sweep_due_reminders(state).await {
                error!("Error sweeping due-date reminders: {:?}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Due-date reminder service started");
    Ok(())
}

async fn sweep_due_reminders(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let deliverables = state.deliverable_repository.find_due_soon().await?;

    for task in deliverables {
        let Some(assignee_name) = task.assignee_name.clone() else {
            continue;
        };

        let profile = match state.profile_repository.find_by_name(&assignee_name).await {
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

        // One reminder per deliverable, ever; keyed like the backfill
        let created = state
            .notification_repository
            .create_if_absent(
                NewNotification {
                    user_id: profile.id,
                    notification_type: NotificationType::DueDateReminder,
                    title: "Due Date Reminder".to_string(),
                    message: format!("Reminder: \"{}\" is due soon!", task.title),
                    related_deliverable_id: Some(task.id),
                    related_user_id: None,
                    metadata: json!({
                        "assignee_name": assignee_name,
                        "project_area": task.project_area,
                        "due_date": task.due_date,
                    }),
                },
                chrono::Utc::now(),
            )
            .await;

        match created {
            Ok(true) => info!("Sent due-date reminder for task: {}", task.title),
            Ok(false) => {}
            Err(e) => warn!("Failed to create reminder for \"{}\": {:?}", task.title, e),
        }
    }

    Ok(())
}
