use super::notification_models::{NewNotification, Notification};
use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut query =
            "SELECT * FROM notifications WHERE user_id = $1".to_string();
        if unread_only {
            query.push_str(" AND is_read = false");
        }
        query.push_str(" ORDER BY created_at DESC LIMIT $2 OFFSET $3");

        let notifications = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(notifications)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewNotification) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications
                (user_id, type, title, message, related_deliverable_id, related_user_id, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(new.user_id)
        .bind(new.notification_type)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.related_deliverable_id)
        .bind(new.related_user_id)
        .bind(&new.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Insert keyed by (related deliverable, type), skipping when such a row
    /// already exists. The check and the write are one statement, so two
    /// concurrent backfill runs cannot interleave between them. Returns
    /// whether a row was written.
    pub async fn create_if_absent(
        &self,
        new: NewNotification,
        created_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO notifications
                (user_id, type, title, message, related_deliverable_id, related_user_id, metadata, created_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8
             WHERE NOT EXISTS (
                 SELECT 1 FROM notifications
                 WHERE related_deliverable_id = $5 AND type = $2
             )",
        )
        .bind(new.user_id)
        .bind(new.notification_type)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.related_deliverable_id)
        .bind(new.related_user_id)
        .bind(&new.metadata)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_read(
        &self,
        id: Uuid,
        user_id: Uuid,
        is_read: bool,
    ) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications
             SET is_read = $1,
                 read_at = CASE WHEN $1 THEN NOW() ELSE NULL END
             WHERE id = $2 AND user_id = $3
             RETURNING *",
        )
        .bind(is_read)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn batch_set_read(
        &self,
        ids: &[Uuid],
        user_id: Uuid,
        is_read: bool,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_read = $1,
                 read_at = CASE WHEN $1 THEN NOW() ELSE NULL END
             WHERE id = ANY($2) AND user_id = $3",
        )
        .bind(is_read)
        .bind(ids)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn batch_delete(&self, ids: &[Uuid], user_id: Uuid) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE id = ANY($1) AND user_id = $2")
                .bind(ids)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}
