//! Handlers for the `/schedules` resource (recurrence definitions).
//!
//! Schedules are created implicitly by recurring assignments; this surface
//! only lists them and toggles the active flag. Deactivated schedules stop
//! materializing new periods but keep their existing evaluations.

use axum::extract::{Path, State};
use axum::Json;
use evalia_core::error::CoreError;
use evalia_core::types::DbId;
use evalia_db::models::schedule::EvaluationSchedule;
use evalia_db::repositories::ScheduleRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /schedules/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateSchedule {
    pub active: bool,
}

/// GET /api/v1/schedules
///
/// List all schedules, newest first. Admin only.
pub async fn list_schedules(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<EvaluationSchedule>>>> {
    let schedules = ScheduleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: schedules }))
}

/// PATCH /api/v1/schedules/{id}
///
/// Toggle the active flag. Admin only.
pub async fn update_schedule(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSchedule>,
) -> AppResult<Json<DataResponse<EvaluationSchedule>>> {
    let schedule = ScheduleRepo::set_active(&state.pool, id, input.active)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "schedule",
            id,
        }))?;

    tracing::info!(schedule_id = id, active = input.active, "Schedule updated");

    Ok(Json(DataResponse { data: schedule }))
}
