use super::deliverable_models::DeliverableStatus;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDeliverableRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<DeliverableStatus>,
    pub assignee_id: Option<Uuid>,
    pub assignee_name: Option<String>,
    #[validate(length(min = 1))]
    pub project_area: String,
    pub due_date: Option<NaiveDate>,
    pub week_number: Option<i32>,
    pub document_link: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDeliverableRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<DeliverableStatus>,
    pub assignee_id: Option<Uuid>,
    pub assignee_name: Option<String>,
    pub project_area: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub week_number: Option<i32>,
    pub document_link: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub progress: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct DeliverableFilters {
    pub status: Option<DeliverableStatus>,
    pub project_area: Option<String>,
    pub week_number: Option<i32>,
}
