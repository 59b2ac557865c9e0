use super::deliverable_dto::DeliverableFilters;
use super::deliverable_models::{Deliverable, DeliverableStatus, HistoryEntry};
use crate::error::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct DeliverableRepository {
    pool: PgPool,
}

impl DeliverableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, filters: DeliverableFilters) -> Result<Vec<Deliverable>> {
        let mut query = "SELECT * FROM deliverables WHERE 1 = 1".to_string();
        let mut params_count = 0;

        if filters.status.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND status = ${}", params_count));
        }

        if filters.project_area.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND project_area = ${}", params_count));
        }

        if filters.week_number.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND week_number = ${}", params_count));
        }

        query.push_str(" ORDER BY week_number NULLS LAST, created_at DESC");

        let mut db_query = sqlx::query_as::<_, Deliverable>(&query);

        if let Some(status) = filters.status {
            db_query = db_query.bind(status);
        }

        if let Some(project_area) = filters.project_area {
            db_query = db_query.bind(project_area);
        }

        if let Some(week_number) = filters.week_number {
            db_query = db_query.bind(week_number);
        }

        let deliverables = db_query.fetch_all(&self.pool).await?;
        Ok(deliverables)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Deliverable>> {
        let deliverable =
            sqlx::query_as::<_, Deliverable>("SELECT * FROM deliverables WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(deliverable)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        status: DeliverableStatus,
        assignee_id: Option<Uuid>,
        assignee_name: Option<&str>,
        project_area: &str,
        due_date: Option<NaiveDate>,
        week_number: Option<i32>,
        document_link: Option<&str>,
        progress: i32,
        created_by: Option<Uuid>,
    ) -> Result<Deliverable> {
        let deliverable = sqlx::query_as::<_, Deliverable>(
            "INSERT INTO deliverables
                (title, description, status, assignee_id, assignee_name, project_area,
                 due_date, week_number, document_link, progress, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(assignee_id)
        .bind(assignee_name)
        .bind(project_area)
        .bind(due_date)
        .bind(week_number)
        .bind(document_link)
        .bind(progress)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(deliverable)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        status: Option<DeliverableStatus>,
        assignee_id: Option<Uuid>,
        assignee_name: Option<&str>,
        project_area: Option<&str>,
        due_date: Option<NaiveDate>,
        week_number: Option<i32>,
        document_link: Option<&str>,
        progress: Option<i32>,
    ) -> Result<Option<Deliverable>> {
        let deliverable = sqlx::query_as::<_, Deliverable>(
            "UPDATE deliverables SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                assignee_id = COALESCE($4, assignee_id),
                assignee_name = COALESCE($5, assignee_name),
                project_area = COALESCE($6, project_area),
                due_date = COALESCE($7, due_date),
                week_number = COALESCE($8, week_number),
                document_link = COALESCE($9, document_link),
                progress = COALESCE($10, progress),
                updated_at = NOW()
             WHERE id = $11
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(status)
        .bind(assignee_id)
        .bind(assignee_name)
        .bind(project_area)
        .bind(due_date)
        .bind(week_number)
        .bind(document_link)
        .bind(progress)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deliverable)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM deliverables WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_history(
        &self,
        deliverable_id: Uuid,
        action: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        changed_by: Option<Uuid>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO deliverable_history (deliverable_id, action, old_value, new_value, changed_by)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(deliverable_id)
        .bind(action)
        .bind(old_value)
        .bind(new_value)
        .bind(changed_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_history(&self, deliverable_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            "SELECT * FROM deliverable_history WHERE deliverable_id = $1 ORDER BY created_at",
        )
        .bind(deliverable_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// All deliverables with a real assignee. Drives the backfill job.
    pub async fn find_assigned(&self) -> Result<Vec<Deliverable>> {
        let deliverables = sqlx::query_as::<_, Deliverable>(
            "SELECT * FROM deliverables
             WHERE assignee_name IS NOT NULL
               AND assignee_name <> ''
               AND assignee_name <> 'Unassigned'
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deliverables)
    }

    /// Assigned, unfinished deliverables due today or tomorrow. Drives the
    /// reminder sweep; the date window is the SQL form of
    /// [`Deliverable::due_within_next_day`].
    pub async fn find_due_soon(&self) -> Result<Vec<Deliverable>> {
        let deliverables = sqlx::query_as::<_, Deliverable>(
            "SELECT * FROM deliverables
             WHERE status <> 'done'
               AND due_date >= CURRENT_DATE
               AND due_date <= CURRENT_DATE + 1
               AND assignee_name IS NOT NULL
               AND assignee_name <> ''
               AND assignee_name <> 'Unassigned'",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(deliverables)
    }
}
