use super::phase_models::ProjectPhase;
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};

/// List project phases in timeline order
#[utoipa::path(
    get,
    path = "/api/project-phases",
    responses(
        (status = 200, description = "Project phases ordered by index", body = Vec<ProjectPhase>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "phases",
    security(("bearer_auth" = []))
)]
pub async fn get_project_phases(State(state): State<AppState>) -> Result<Json<Vec<ProjectPhase>>> {
    let phases = state.phase_repository.find_all().await?;

    Ok(Json(phases))
}
