//! Handlers for the `/users` resource (admin directory management).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use evalia_core::error::CoreError;
use evalia_core::roles::is_valid_role;
use evalia_db::models::user::{CreateUser, UserResponse};
use evalia_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /users`.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Restrict the listing to one role.
    pub role: Option<String>,
}

/// GET /api/v1/users?role=
///
/// Directory listing, username order. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    if let Some(ref role) = query.role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role: {role}"
            ))));
        }
    }

    let users = UserRepo::list(&state.pool, query.role.as_deref()).await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/users
///
/// Create a user with an argon2id-hashed password. Admin only.
pub async fn create_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    if input.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "username must not be empty".into(),
        )));
    }
    if input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "password must not be empty".into(),
        )));
    }
    if !is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role: {}",
            input.role
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // Duplicate usernames land on uq_users_username and surface as 409.
    let user = UserRepo::create(
        &state.pool,
        input.username.trim(),
        &password_hash,
        &input.role,
        &input.first_name,
        &input.last_name,
        &input.email,
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}
