use super::profile_models::Profile;
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};

/// List active team members for assignee pickers
#[utoipa::path(
    get,
    path = "/api/team-members",
    responses(
        (status = 200, description = "Active team members", body = Vec<Profile>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn get_team_members(State(state): State<AppState>) -> Result<Json<Vec<Profile>>> {
    let members = state.profile_repository.find_active().await?;

    Ok(Json(members))
}
