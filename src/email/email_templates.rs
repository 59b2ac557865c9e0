use crate::deliverable::deliverable_models::Deliverable;

pub struct EmailTemplate {
    pub subject: String,
    pub html: String,
}

fn due_date_label(task: &Deliverable) -> String {
    task.due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "No due date set".to_string())
}

/// Sent to the assignee when a task lands on their plate.
pub fn task_assignment(task: &Deliverable, assignee_name: &str, app_url: &str) -> EmailTemplate {
    EmailTemplate {
        subject: format!("New Task Assigned: {}", task.title),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
               <h1>New Task Assigned</h1>\
               <p>Hi {assignee},</p>\
               <p>You've been assigned a new task for Project CR:</p>\
               <h3>{title}</h3>\
               {description}\
               <p><strong>Due Date:</strong> {due_date}<br>\
                  <strong>Project Area:</strong> {area}<br>\
                  <strong>Week:</strong> {week}<br>\
                  <strong>Progress:</strong> {progress}%</p>\
               <p><a href=\"{app_url}/task/{id}\">View Task Details</a></p>\
               <p>Best regards,<br>Project CR Team</p>\
             </div>",
            assignee = assignee_name,
            title = task.title,
            description = description_block(task),
            due_date = due_date_label(task),
            area = task.project_area,
            week = task
                .week_number
                .map(|w| w.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            progress = task.progress,
            app_url = app_url,
            id = task.id,
        ),
    }
}

/// Staff copy of an assignment, sent to the operations address.
pub fn assignment_staff_notice(task: &Deliverable, assignee_name: &str) -> EmailTemplate {
    EmailTemplate {
        subject: format!("Task Assigned: {} - Project CR Update", task.title),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
               <h1>Task Assignment</h1>\
               <p>Project CR Team,</p>\
               <p><strong>{title}</strong> has been assigned to {assignee}.</p>\
               <p><strong>Project Area:</strong> {area}<br>\
                  <strong>Due Date:</strong> {due_date}</p>\
               <p>Project CR Dashboard<br>Automated Notification System</p>\
             </div>",
            title = task.title,
            assignee = assignee_name,
            area = task.project_area,
            due_date = due_date_label(task),
        ),
    }
}

/// Sent to the assignee when they finish a task.
pub fn congratulations(task: &Deliverable, assignee_name: &str) -> EmailTemplate {
    EmailTemplate {
        subject: format!("Congratulations! Task Completed: {}", task.title),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
               <h1>Congratulations!</h1>\
               <p>Hi {assignee},</p>\
               <p>Excellent work! You've successfully completed:</p>\
               <h3>{title}</h3>\
               {description}\
               <p><strong>Project Area:</strong> {area}</p>\
               <p>Your contribution to Project CR is greatly appreciated!</p>\
               <p>Keep up the great work!<br>Project CR Team</p>\
             </div>",
            assignee = assignee_name,
            title = task.title,
            description = description_block(task),
            area = task.project_area,
        ),
    }
}

/// Company-wide completion notice, sent to the operations address.
pub fn task_completion(task: &Deliverable, assignee_name: &str, app_url: &str) -> EmailTemplate {
    EmailTemplate {
        subject: format!("Task Completed: {} - Project CR Update", task.title),
        html: format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
               <h1>Task Completed</h1>\
               <p>Project CR Team,</p>\
               <p>A task has been completed:</p>\
               <h3>{title}</h3>\
               {description}\
               <p><strong>Completed by:</strong> {assignee}<br>\
                  <strong>Project Area:</strong> {area}<br>\
                  <strong>Progress:</strong> {progress}%</p>\
               <p><a href=\"{app_url}/dashboard\">View Project Dashboard</a></p>\
               <p>Project CR Dashboard<br>Automated Notification System</p>\
             </div>",
            title = task.title,
            description = description_block(task),
            assignee = assignee_name,
            area = task.project_area,
            progress = task.progress,
            app_url = app_url,
        ),
    }
}

fn description_block(task: &Deliverable) -> String {
    task.description
        .as_deref()
        .map(|d| format!("<p>{}</p>", d))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliverable::deliverable_models::DeliverableStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn task() -> Deliverable {
        Deliverable {
            id: Uuid::new_v4(),
            title: "Draft launch plan".to_string(),
            description: Some("First pass".to_string()),
            status: DeliverableStatus::InProgress,
            assignee_id: None,
            assignee_name: Some("Alice".to_string()),
            project_area: "Operations".to_string(),
            due_date: None,
            week_number: Some(2),
            document_link: None,
            progress: 40,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_assignment_template_mentions_task_and_assignee() {
        let t = task_assignment(&task(), "Alice", "http://localhost:3000");
        assert!(t.subject.contains("Draft launch plan"));
        assert!(t.html.contains("Hi Alice"));
        assert!(t.html.contains("/task/"));
        assert!(t.html.contains("No due date set"));
    }

    #[test]
    fn test_staff_notice_differs_from_personal_assignment() {
        let personal = task_assignment(&task(), "Alice", "http://localhost:3000");
        let staff = assignment_staff_notice(&task(), "Alice");
        assert_ne!(personal.subject, staff.subject);
        assert!(staff.html.contains("Project CR Team"));
    }

    #[test]
    fn test_completion_template_addresses_the_company() {
        let t = task_completion(&task(), "Alice", "http://localhost:3000");
        assert!(t.subject.ends_with("Project CR Update"));
        assert!(t.html.contains("Completed by:</strong> Alice"));
    }
}
