//! Handlers for the `/checklists` resource (authoring).
//!
//! Item trees arrive as drafts, get sanitized in core, and are stored whole.
//! Updates replace the entire tree (last writer wins).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use evalia_core::checklist::{sanitize_items, ChecklistItem};
use evalia_core::error::CoreError;
use evalia_core::types::DbId;
use evalia_db::models::checklist::{Checklist, ChecklistInput};
use evalia_db::repositories::ChecklistRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/checklists
///
/// List checklists, newest first. Admin only.
pub async fn list_checklists(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Checklist>>>> {
    let checklists = ChecklistRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: checklists }))
}

/// POST /api/v1/checklists
///
/// Create a checklist. The item drafts are sanitized; the result must keep
/// at least one item. Admin only.
pub async fn create_checklist(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ChecklistInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Checklist>>)> {
    let (title, items) = validate_input(&input)?;

    let checklist =
        ChecklistRepo::create(&state.pool, title, &input.description, &items, admin.user_id)
            .await?;

    tracing::info!(checklist_id = checklist.id, "Checklist created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: checklist })))
}

/// GET /api/v1/checklists/{id}
pub async fn get_checklist(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Checklist>>> {
    let checklist = ChecklistRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "checklist",
            id,
        }))?;
    Ok(Json(DataResponse { data: checklist }))
}

/// PUT /api/v1/checklists/{id}
///
/// Replace title, description, and the whole item tree. Admin only.
pub async fn update_checklist(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ChecklistInput>,
) -> AppResult<Json<DataResponse<Checklist>>> {
    let (title, items) = validate_input(&input)?;

    let checklist = ChecklistRepo::update(&state.pool, id, title, &input.description, &items)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "checklist",
            id,
        }))?;

    tracing::info!(checklist_id = checklist.id, "Checklist updated");

    Ok(Json(DataResponse { data: checklist }))
}

/// Shared create/update validation: non-empty title, and at least one item
/// surviving sanitization.
fn validate_input(input: &ChecklistInput) -> Result<(&str, Vec<ChecklistItem>), AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be empty".into(),
        )));
    }

    let items = sanitize_items(&input.items);
    if items.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "checklist must have at least one titled item".into(),
        )));
    }

    Ok((title, items))
}
