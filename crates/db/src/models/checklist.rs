//! Checklist entity model and DTOs.

use evalia_core::checklist::{ChecklistItem, ItemDraft};
use evalia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `checklists` table. The item tree lives in a JSONB column.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Checklist {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub items: Json<Vec<ChecklistItem>>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing a checklist. The items arrive as drafts and
/// are sanitized before storage; updates replace the whole tree.
#[derive(Debug, Deserialize)]
pub struct ChecklistInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ItemDraft>,
}
