use super::email_service::EmailEvent;
use crate::deliverable::deliverable_models::Deliverable;
use crate::{
    error::{AppError, Result},
    state::AppState,
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailSendRequest {
    #[serde(rename = "type")]
    pub event: String,
    pub task: Deliverable,
    pub assignee_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmailSendResponse {
    pub success: bool,
    pub message: String,
}

/// Manually dispatch one of the notification emails
#[utoipa::path(
    post,
    path = "/api/email/send",
    request_body = EmailSendRequest,
    responses(
        (status = 200, description = "Email sent", body = EmailSendResponse),
        (status = 400, description = "Unknown email type"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Transport failure")
    ),
    tag = "email",
    security(("bearer_auth" = []))
)]
pub async fn send_email(
    State(state): State<AppState>,
    Extension(_user_id): Extension<Uuid>,
    Json(payload): Json<EmailSendRequest>,
) -> Result<Json<EmailSendResponse>> {
    let event = EmailEvent::from_str(&payload.event).map_err(AppError::BadRequest)?;

    let outcome = state
        .email_service
        .dispatch(event, &payload.task, &payload.assignee_name)
        .await;

    // This is the one endpoint whose whole job is the email, so transport
    // failure surfaces here instead of being swallowed.
    if outcome.success {
        Ok(Json(EmailSendResponse {
            success: true,
            message: "Email sent successfully".to_string(),
        }))
    } else {
        tracing::error!(
            "Manual email dispatch failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
        Err(AppError::InternalError)
    }
}
