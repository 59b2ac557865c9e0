use super::phase_models::ProjectPhase;
use crate::error::Result;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PhaseRepository {
    pool: PgPool,
}

impl PhaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<ProjectPhase>> {
        let phases = sqlx::query_as::<_, ProjectPhase>(
            "SELECT * FROM project_phases ORDER BY order_index",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(phases)
    }
}
