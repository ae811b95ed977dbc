//! Route definitions for the `/checklists` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::checklists;
use crate::state::AppState;

/// Routes mounted at `/checklists` (all admin only).
///
/// ```text
/// GET  /      -> list_checklists
/// POST /      -> create_checklist
/// GET  /{id}  -> get_checklist
/// PUT  /{id}  -> update_checklist (whole-document replace)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(checklists::list_checklists).post(checklists::create_checklist),
        )
        .route(
            "/{id}",
            get(checklists::get_checklist).put(checklists::update_checklist),
        )
}
