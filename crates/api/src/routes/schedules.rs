//! Route definitions for the `/schedules` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::schedules;
use crate::state::AppState;

/// Routes mounted at `/schedules` (all admin only).
///
/// ```text
/// GET   /      -> list_schedules
/// PATCH /{id}  -> update_schedule ({active} toggle)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schedules::list_schedules))
        .route("/{id}", patch(schedules::update_schedule))
}
