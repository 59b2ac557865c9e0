use super::profile_models::Profile;
use crate::error::Result;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a profile by its display name. The assignee relation is a
    /// denormalized name join, so zero matches and ambiguous matches both
    /// resolve to `None`.
    pub async fn find_by_name(&self, full_name: &str) -> Result<Option<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE full_name = $1",
        )
        .bind(full_name)
        .fetch_all(&self.pool)
        .await?;

        if profiles.len() == 1 {
            Ok(profiles.into_iter().next())
        } else {
            if profiles.len() > 1 {
                tracing::warn!("Ambiguous assignee name: {}", full_name);
            }
            Ok(None)
        }
    }

    pub async fn find_active(&self) -> Result<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT * FROM profiles WHERE is_active = true ORDER BY full_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }
}
