//! One-shot reconciliation: synthesizes the notification rows that would have
//! been created had the live notifier seen every historical assignment and
//! completion. Idempotent; safe to re-run.

use anyhow::Context;
use cr_dashboard::db::create_pool;
use cr_dashboard::deliverable::{DeliverableRepository, DeliverableStatus};
use cr_dashboard::notification::notification_models::{NewNotification, NotificationType};
use cr_dashboard::notification::NotificationRepository;
use cr_dashboard::profile::ProfileRepository;
use serde_json::json;
use std::collections::BTreeMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let db = create_pool(&database_url)
        .await
        .context("failed to connect to database")?;

    let deliverables = DeliverableRepository::new(db.clone());
    let profiles = ProfileRepository::new(db.clone());
    let notifications = NotificationRepository::new(db);

    println!("Starting notifications backfill...\n");

    let assigned = deliverables.find_assigned().await?;
    println!("Found {} assigned tasks\n", assigned.len());

    let mut assignment_count = 0u32;
    let mut completion_count = 0u32;
    let mut per_recipient: BTreeMap<String, u32> = BTreeMap::new();

    for task in &assigned {
        let Some(assignee_name) = task.assignee_name.as_deref() else {
            continue;
        };

        let profile = match profiles.find_by_name(assignee_name).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                println!("  No profile found for: {}", assignee_name);
                continue;
            }
            Err(e) => {
                tracing::warn!("Failed to resolve {}: {:?}", assignee_name, e);
                continue;
            }
        };

        // Assignment notification, dated back to the task's creation so the
        // listing stays chronological.
        let created = notifications
            .create_if_absent(
                NewNotification {
                    user_id: profile.id,
                    notification_type: NotificationType::TaskAssigned,
                    title: "Task Assigned".to_string(),
                    message: format!("You have been assigned to \"{}\"", task.title),
                    related_deliverable_id: Some(task.id),
                    related_user_id: None,
                    metadata: json!({
                        "assignee_name": assignee_name,
                        "project_area": task.project_area,
                        "due_date": task.due_date,
                        "backfilled": true,
                    }),
                },
                task.created_at,
            )
            .await;

        match created {
            Ok(true) => {
                assignment_count += 1;
                *per_recipient.entry(profile.full_name.clone()).or_default() += 1;
                println!(
                    "  Created assignment notification: \"{}\" -> {}",
                    task.title, assignee_name
                );
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    "Failed to create assignment notification for \"{}\": {:?}",
                    task.title,
                    e
                );
            }
        }

        if task.status != DeliverableStatus::Done {
            continue;
        }

        // Completion notification, dated to the last update.
        let created = notifications
            .create_if_absent(
                NewNotification {
                    user_id: profile.id,
                    notification_type: NotificationType::TaskCompleted,
                    title: "Task Completed".to_string(),
                    message: format!("Congratulations! You completed \"{}\"", task.title),
                    related_deliverable_id: Some(task.id),
                    related_user_id: None,
                    metadata: json!({
                        "assignee_name": assignee_name,
                        "project_area": task.project_area,
                        "completed_at": task.updated_at,
                        "backfilled": true,
                    }),
                },
                task.updated_at,
            )
            .await;

        match created {
            Ok(true) => {
                completion_count += 1;
                *per_recipient.entry(profile.full_name.clone()).or_default() += 1;
                println!(
                    "  Created completion notification: \"{}\" -> {}",
                    task.title, assignee_name
                );
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(
                    "Failed to create completion notification for \"{}\": {:?}",
                    task.title,
                    e
                );
            }
        }
    }

    println!("\nBackfill complete!");
    println!("Created {} assignment notifications", assignment_count);
    println!("Created {} completion notifications", completion_count);
    println!("Total: {} notifications\n", assignment_count + completion_count);

    if !per_recipient.is_empty() {
        println!("Notifications by user:");
        for (name, count) in &per_recipient {
            println!("  {}: {} notifications", name, count);
        }
    }

    Ok(())
}
