//! Route definitions for the `/evaluations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::evaluations;
use crate::state::AppState;

/// Routes mounted at `/evaluations`.
///
/// ```text
/// GET    /      -> list_evaluations (admin|evaluator; reconciles first)
/// POST   /      -> create_evaluations (admin)
/// GET    /{id}  -> get_evaluation (admin|assignee)
/// PUT    /{id}  -> submit_evaluation (admin|assignee)
/// DELETE /{id}  -> delete_evaluation (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(evaluations::list_evaluations).post(evaluations::create_evaluations),
        )
        .route(
            "/{id}",
            get(evaluations::get_evaluation)
                .put(evaluations::submit_evaluation)
                .delete(evaluations::delete_evaluation),
        )
}
