//! Repository for the `checklists` table.

use evalia_core::checklist::ChecklistItem;
use evalia_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::checklist::Checklist;

/// Column list for checklists queries.
const COLUMNS: &str = "id, title, description, items, created_by, created_at, updated_at";

/// Provides CRUD operations for checklists.
pub struct ChecklistRepo;

impl ChecklistRepo {
    /// Create a checklist with an already-sanitized item tree.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        description: &str,
        items: &[ChecklistItem],
        created_by: DbId,
    ) -> Result<Checklist, sqlx::Error> {
        let query = format!(
            "INSERT INTO checklists (title, description, items, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(title)
            .bind(description)
            .bind(Json(items))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a checklist by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM checklists WHERE id = $1");
        sqlx::query_as::<_, Checklist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List checklists, newest first, capped at 50 (matches the authoring UI).
    pub async fn list(pool: &PgPool) -> Result<Vec<Checklist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM checklists ORDER BY created_at DESC LIMIT 50");
        sqlx::query_as::<_, Checklist>(&query).fetch_all(pool).await
    }

    /// Replace a checklist whole (title, description, and full item tree).
    /// Last writer wins; returns `None` when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        title: &str,
        description: &str,
        items: &[ChecklistItem],
    ) -> Result<Option<Checklist>, sqlx::Error> {
        let query = format!(
            "UPDATE checklists
             SET title = $2, description = $3, items = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Checklist>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(Json(items))
            .fetch_optional(pool)
            .await
    }
}
