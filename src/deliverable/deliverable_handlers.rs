use super::deliverable_dto::{CreateDeliverableRequest, DeliverableFilters, UpdateDeliverableRequest};
use super::deliverable_models::{Deliverable, DeliverableStatus, HistoryEntry};
use super::deliverable_service::record_history;
use crate::{
    error::{AppError, Result},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

/// List deliverables, optionally filtered by status, area, or week
#[utoipa::path(
    get,
    path = "/api/deliverables",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("project_area" = Option<String>, Query, description = "Filter by project area"),
        ("week_number" = Option<i32>, Query, description = "Filter by week")
    ),
    responses(
        (status = 200, description = "List of deliverables", body = Vec<Deliverable>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "deliverables",
    security(("bearer_auth" = []))
)]
pub async fn get_deliverables(
    State(state): State<AppState>,
    Query(filters): Query<DeliverableFilters>,
) -> Result<Json<Vec<Deliverable>>> {
    let deliverables = state.deliverable_repository.find_all(filters).await?;

    Ok(Json(deliverables))
}

// ... (get_deliverable)
pub async fn get_deliverable(
    State(state): State<AppState>,
    Path(deliverable_id): Path<Uuid>,
) -> Result<Json<Deliverable>> {
    let deliverable = state
        .deliverable_repository
        .find_by_id(deliverable_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deliverable not found".to_string()))?;

    Ok(Json(deliverable))
}

/// Create a deliverable
#[utoipa::path(
    post,
    path = "/api/deliverables",
    request_body = CreateDeliverableRequest,
    responses(
        (status = 201, description = "Deliverable created", body = Deliverable),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "deliverables",
    security(("bearer_auth" = []))
)]
pub async fn create_deliverable(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<CreateDeliverableRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let deliverable = state
        .deliverable_repository
        .create(
            &payload.title,
            payload.description.as_deref(),
            payload.status.unwrap_or(DeliverableStatus::NotStarted),
            payload.assignee_id,
            payload.assignee_name.as_deref(),
            &payload.project_area,
            payload.due_date,
            payload.week_number,
            payload.document_link.as_deref(),
            payload.progress.unwrap_or(0),
            Some(user_id),
        )
        .await?;

    // Fan-out with no previous state; a creation can already carry an
    // assignee (and, rarely, a done status).
    state
        .notifier
        .notify_on_mutation(None, &deliverable, Some(user_id))
        .await;
    state
        .email_service
        .dispatch_for_mutation(None, &deliverable)
        .await;

    Ok((StatusCode::CREATED, Json(deliverable)))
}

/// Update a deliverable; status/assignee transitions trigger notifications
/// and emails as best-effort side effects
#[utoipa::path(
    put,
    path = "/api/deliverables/{id}",
    params(
        ("id" = Uuid, Path, description = "Deliverable ID")
    ),
    request_body = UpdateDeliverableRequest,
    responses(
        (status = 200, description = "Deliverable updated", body = Deliverable),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Deliverable not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "deliverables",
    security(("bearer_auth" = []))
)]
pub async fn update_deliverable(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(deliverable_id): Path<Uuid>,
    Json(payload): Json<UpdateDeliverableRequest>,
) -> Result<Json<Deliverable>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Snapshot the pre-mutation state; the notifier compares against it.
    // There is no transaction around read-compare-write: two concurrent
    // updates may both see the same previous state. Accepted race.
    let previous = state
        .deliverable_repository
        .find_by_id(deliverable_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deliverable not found".to_string()))?;

    let updated = state
        .deliverable_repository
        .update(
            deliverable_id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.status,
            payload.assignee_id,
            payload.assignee_name.as_deref(),
            payload.project_area.as_deref(),
            payload.due_date,
            payload.week_number,
            payload.document_link.as_deref(),
            payload.progress,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Deliverable not found".to_string()))?;

    // Everything below is best-effort: the update already succeeded and
    // nothing here may turn it into a failure.
    record_history(
        &state.deliverable_repository,
        &previous,
        &updated,
        Some(user_id),
    )
    .await;
    state
        .notifier
        .notify_on_mutation(Some(&previous), &updated, Some(user_id))
        .await;
    state
        .email_service
        .dispatch_for_mutation(Some(&previous), &updated)
        .await;

    Ok(Json(updated))
}

// ... (get_deliverable_history)
pub async fn get_deliverable_history(
    State(state): State<AppState>,
    Path(deliverable_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>> {
    let history = state
        .deliverable_repository
        .find_history(deliverable_id)
        .await?;

    Ok(Json(history))
}

// ... (delete_deliverable); deletion has no notification side effect
pub async fn delete_deliverable(
    State(state): State<AppState>,
    Path(deliverable_id): Path<Uuid>,
) -> Result<StatusCode> {
    let rows_affected = state.deliverable_repository.delete(deliverable_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Deliverable not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
