pub mod auth;
pub mod checklists;
pub mod evaluations;
pub mod health;
pub mod schedules;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login           login (public)
///
/// /users                list, create (admin only)
///
/// /checklists           list, create (admin only)
/// /checklists/{id}      get, replace (admin only)
///
/// /evaluations          list (admin|evaluator), assign (admin only)
/// /evaluations/{id}     get (admin|assignee), submit (PUT), delete (admin)
///
/// /schedules            list (admin only)
/// /schedules/{id}       toggle active (PATCH, admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login only; no refresh or sessions).
        .nest("/auth", auth::router())
        // User directory (admin management).
        .nest("/users", users::router())
        // Checklist authoring.
        .nest("/checklists", checklists::router())
        // Evaluation assignment, listing, submission.
        .nest("/evaluations", evaluations::router())
        // Recurrence schedule administration.
        .nest("/schedules", schedules::router())
}
