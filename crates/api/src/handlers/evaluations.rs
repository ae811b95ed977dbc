//! Handlers for the `/evaluations` resource: assignment fan-out, the listing
//! (which reconciles recurring schedules first), submission, and deletion.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use evalia_core::checklist::{is_valid_time, validate_submission};
use evalia_core::error::CoreError;
use evalia_core::lifecycle::EvaluationStatus;
use evalia_core::period::Frequency;
use evalia_core::roles::{ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_EVALUATOR};
use evalia_core::types::{DbId, Timestamp};
use evalia_db::models::checklist::Checklist;
use evalia_db::models::evaluation::{
    Evaluation, EvaluationFilter, ListedEvaluation, NewEvaluation, SubmitEvaluation,
};
use evalia_db::models::schedule::NewSchedule;
use evalia_db::repositories::{ChecklistRepo, EvaluationRepo, ScheduleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireEvaluator};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default listing page size.
const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum listing page size.
const MAX_PAGE_SIZE: usize = 50;

/// Display name used for general evaluations (no specific employee).
const GENERAL_LABEL: &str = "General";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Recurrence block of [`CreateEvaluations`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(default)]
    pub enabled: bool,
    /// `daily` or `monthly`. Required when enabled.
    pub frequency: Option<String>,
    /// Advisory `HH:MM` deadline. Never affects period bucketing.
    #[serde(default)]
    pub due_time: String,
}

/// Request body for `POST /evaluations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvaluations {
    pub checklist_id: DbId,
    #[serde(default)]
    pub evaluator_ids: Vec<DbId>,
    #[serde(default)]
    pub employee_ids: Vec<DbId>,
    /// Snapshot the whole employee roster instead of `employee_ids`.
    #[serde(default)]
    pub apply_to_all_employees: bool,
    #[serde(default)]
    pub notes: String,
    pub recurrence: Option<Recurrence>,
}

/// Query parameters for `GET /evaluations`.
#[derive(Debug, Deserialize)]
pub struct ListEvaluationsQuery {
    /// `pending` or `completed`.
    pub status: Option<String>,
    pub checklist_id: Option<DbId>,
    /// Numeric employee id, or `none` for general evaluations.
    pub employee_id: Option<String>,
    pub from: Option<NaiveDate>,
    /// Inclusive end of the creation-date range.
    pub to: Option<NaiveDate>,
    /// Free text over checklist title, evaluator, employee, and notes.
    pub q: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// One listed evaluation, with the general placeholder rendered in.
#[derive(Debug, Serialize)]
pub struct ListedEvaluationView {
    pub id: DbId,
    pub checklist_id: DbId,
    pub checklist_title: String,
    pub schedule_id: Option<DbId>,
    pub period_key: Option<String>,
    pub assigned_to: DbId,
    pub evaluator_name: String,
    pub employee_id: Option<DbId>,
    pub employee_name: String,
    pub status: String,
    pub submitted_at: Option<Timestamp>,
    pub notes: String,
    pub created_at: Timestamp,
}

impl From<ListedEvaluation> for ListedEvaluationView {
    fn from(row: ListedEvaluation) -> Self {
        ListedEvaluationView {
            id: row.id,
            checklist_id: row.checklist_id,
            checklist_title: row.checklist_title,
            schedule_id: row.schedule_id,
            period_key: row.period_key,
            assigned_to: row.assigned_to,
            evaluator_name: row.evaluator_name,
            employee_id: row.employee_id,
            employee_name: row.employee_name.unwrap_or_else(|| GENERAL_LABEL.to_string()),
            status: row.status,
            submitted_at: row.submitted_at,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Per-group counts for the listing summary.
#[derive(Debug, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub total: usize,
    pub completed: usize,
}

/// Aggregates over the full filtered set (not just the current page).
#[derive(Debug, Serialize)]
pub struct ListingSummary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Completed share as a rounded percentage (0 when empty).
    pub completion_rate: u32,
    pub by_employee: Vec<GroupSummary>,
    pub by_checklist: Vec<GroupSummary>,
}

/// Response body for `GET /evaluations`.
#[derive(Debug, Serialize)]
pub struct EvaluationListing {
    pub items: Vec<ListedEvaluationView>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub summary: ListingSummary,
}

/// Response body for `GET /evaluations/{id}`.
#[derive(Debug, Serialize)]
pub struct EvaluationDetail {
    pub evaluation: Evaluation,
    pub checklist: Checklist,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/evaluations
///
/// Assign evaluations: one per (evaluator x resolved employee). With a
/// recurrence block this finds-or-creates the schedule and materializes the
/// current period immediately; without one it creates one-off pending rows.
/// Admin only.
pub async fn create_evaluations(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateEvaluations>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Evaluation>>>)> {
    // 1. The checklist must exist.
    if ChecklistRepo::find_by_id(&state.pool, input.checklist_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::InvalidReference(format!(
            "checklist {} does not exist",
            input.checklist_id
        ))));
    }

    // 2. At least one evaluator, deduplicated preserving order.
    let evaluator_ids = dedup_ids(&input.evaluator_ids);
    if evaluator_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "at least one evaluator is required".into(),
        )));
    }

    // 3. Parse the recurrence block up front so nothing is created on a bad one.
    let recurrence = parse_recurrence(input.recurrence.as_ref())?;

    // 4. Resolve employee targets. "Apply to all" snapshots the roster now;
    //    no employees at all means one general evaluation per evaluator.
    let employee_ids = if input.apply_to_all_employees {
        UserRepo::list_ids_by_role(&state.pool, ROLE_EMPLOYEE).await?
    } else {
        dedup_ids(&input.employee_ids)
    };
    let targets: Vec<Option<DbId>> = if employee_ids.is_empty() {
        vec![None]
    } else {
        employee_ids.iter().copied().map(Some).collect()
    };

    // 5. Role checks on every referenced user.
    for &evaluator_id in &evaluator_ids {
        let role = UserRepo::find_role(&state.pool, evaluator_id).await?;
        match role.as_deref() {
            Some(ROLE_EVALUATOR) | Some(ROLE_ADMIN) => {}
            _ => {
                return Err(AppError::Core(CoreError::InvalidReference(format!(
                    "user {evaluator_id} is not an evaluator"
                ))));
            }
        }
    }
    for &employee_id in &employee_ids {
        let role = UserRepo::find_role(&state.pool, employee_id).await?;
        if role.as_deref() != Some(ROLE_EMPLOYEE) {
            return Err(AppError::Core(CoreError::InvalidReference(format!(
                "user {employee_id} is not an employee"
            ))));
        }
    }

    // 6. Fan out.
    let today = Utc::now().date_naive();
    let mut created = Vec::new();
    for &evaluator_id in &evaluator_ids {
        for &employee_id in &targets {
            match recurrence {
                Some((frequency, ref due_time)) => {
                    let schedule = ScheduleRepo::find_or_create(
                        &state.pool,
                        &NewSchedule {
                            checklist_id: input.checklist_id,
                            evaluator_id,
                            employee_id,
                            created_by: admin.user_id,
                            frequency: frequency.as_str().to_string(),
                            due_time: due_time.clone(),
                            notes: input.notes.clone(),
                        },
                    )
                    .await?;

                    let key = evalia_core::period::period_key(today, frequency);
                    if let Some(evaluation) =
                        EvaluationRepo::materialize_for_period(&state.pool, &schedule, &key)
                            .await?
                    {
                        created.push(evaluation);
                    }
                }
                None => {
                    let evaluation = EvaluationRepo::create_one_off(
                        &state.pool,
                        &NewEvaluation {
                            checklist_id: input.checklist_id,
                            assigned_to: evaluator_id,
                            assigned_by: admin.user_id,
                            employee_id,
                            notes: input.notes.clone(),
                        },
                    )
                    .await?;
                    created.push(evaluation);
                }
            }
        }
    }

    tracing::info!(
        checklist_id = input.checklist_id,
        evaluators = evaluator_ids.len(),
        targets = targets.len(),
        created = created.len(),
        recurring = recurrence.is_some(),
        "Evaluations assigned"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/evaluations
///
/// Reconcile active schedules for the current period, then list with
/// filters, pagination, and summary aggregates. Evaluators see only their
/// own assignments; admins see everything.
pub async fn list_evaluations(
    State(state): State<AppState>,
    RequireEvaluator(user): RequireEvaluator,
    Query(query): Query<ListEvaluationsQuery>,
) -> AppResult<Json<DataResponse<EvaluationListing>>> {
    let visible_to = if user.is_admin() {
        None
    } else {
        Some(user.user_id)
    };

    // Materialize the current period before reading.
    let schedules = ScheduleRepo::list_active(&state.pool, visible_to).await?;
    let created =
        EvaluationRepo::reconcile_schedules(&state.pool, &schedules, Utc::now().date_naive())
            .await?;
    if created > 0 {
        tracing::info!(created, "Materialized recurring evaluations");
    }

    let filter = build_filter(&query, visible_to)?;
    let rows = EvaluationRepo::list(&state.pool, &filter).await?;

    let summary = summarize(&rows);

    // Paginate in memory over the filtered set.
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let total_pages = rows.len().div_ceil(page_size).max(1);
    let items: Vec<ListedEvaluationView> = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(ListedEvaluationView::from)
        .collect();

    Ok(Json(DataResponse {
        data: EvaluationListing {
            items,
            page,
            page_size,
            total_pages,
            summary,
        },
    }))
}

/// GET /api/v1/evaluations/{id}
///
/// Full evaluation detail including the checklist tree and any responses.
/// Admin or the assigned evaluator.
pub async fn get_evaluation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EvaluationDetail>>> {
    let evaluation = find_authorized(&state, &user, id).await?;

    let checklist = ChecklistRepo::find_by_id(&state.pool, evaluation.checklist_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "checklist",
            id: evaluation.checklist_id,
        }))?;

    Ok(Json(DataResponse {
        data: EvaluationDetail {
            evaluation,
            checklist,
        },
    }))
}

/// PUT /api/v1/evaluations/{id}
///
/// Submit responses. The validator gates the terminal transition; a valid
/// submission sets status=completed and submitted_at exactly once.
pub async fn submit_evaluation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitEvaluation>,
) -> AppResult<Json<DataResponse<Evaluation>>> {
    let evaluation = find_authorized(&state, &user, id).await?;

    if evaluation.status == EvaluationStatus::Completed.as_str() {
        return Err(AppError::Core(CoreError::Conflict(
            "evaluation has already been submitted".into(),
        )));
    }

    // Optional employee reassignment at submission time.
    if let Some(employee_id) = input.employee_id {
        let role = UserRepo::find_role(&state.pool, employee_id).await?;
        if role.as_deref() != Some(ROLE_EMPLOYEE) {
            return Err(AppError::Core(CoreError::InvalidReference(format!(
                "user {employee_id} is not an employee"
            ))));
        }
    }

    let checklist = ChecklistRepo::find_by_id(&state.pool, evaluation.checklist_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "checklist",
            id: evaluation.checklist_id,
        }))?;

    validate_submission(&checklist.items.0, &input.responses)
        .map_err(|rejection| AppError::Core(CoreError::Submission(rejection)))?;

    // The pending guard in the UPDATE closes the double-submit race.
    let updated = EvaluationRepo::submit(
        &state.pool,
        id,
        &input.responses,
        &input.notes,
        input.employee_id,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "evaluation has already been submitted".into(),
        ))
    })?;

    tracing::info!(evaluation_id = id, user_id = user.user_id, "Evaluation submitted");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/evaluations/{id}
///
/// Permanently delete an evaluation. Admin only.
pub async fn delete_evaluation(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EvaluationRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "evaluation",
            id,
        }));
    }

    tracing::info!(evaluation_id = id, "Evaluation deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find an evaluation and check access: admin or the assigned evaluator.
/// Wrong-user access to an existing row is a 403, never a 404.
async fn find_authorized(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<Evaluation, AppError> {
    let evaluation = EvaluationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "evaluation",
            id,
        }))?;

    if !user.is_admin() && evaluation.assigned_to != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not assigned to this evaluation".into(),
        )));
    }

    Ok(evaluation)
}

/// Deduplicate ids preserving first-occurrence order.
fn dedup_ids(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Validate and normalize a recurrence block into (frequency, due_time).
fn parse_recurrence(
    recurrence: Option<&Recurrence>,
) -> Result<Option<(Frequency, String)>, AppError> {
    let Some(recurrence) = recurrence else {
        return Ok(None);
    };
    if !recurrence.enabled {
        return Ok(None);
    }

    let frequency = recurrence
        .frequency
        .as_deref()
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "recurrence frequency is required".into(),
            ))
        })?
        .parse::<Frequency>()
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let due_time = recurrence.due_time.trim();
    if !due_time.is_empty() && !is_valid_time(due_time) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "due time must be HH:MM, got: {due_time}"
        ))));
    }

    Ok(Some((frequency, due_time.to_string())))
}

/// Translate listing query parameters into the repository filter.
fn build_filter(
    query: &ListEvaluationsQuery,
    visible_to: Option<DbId>,
) -> Result<EvaluationFilter, AppError> {
    if let Some(ref status) = query.status {
        status.parse::<EvaluationStatus>().map_err(|e| {
            AppError::Core(CoreError::Validation(e))
        })?;
    }

    let employee = match query.employee_id.as_deref() {
        None => None,
        Some("none") => Some(None),
        Some(raw) => {
            let id: DbId = raw.parse().map_err(|_| {
                AppError::Core(CoreError::Validation(format!(
                    "employee_id must be a number or 'none', got: {raw}"
                )))
            })?;
            Some(Some(id))
        }
    };

    Ok(EvaluationFilter {
        assigned_to: visible_to,
        status: query.status.clone(),
        checklist_id: query.checklist_id,
        employee,
        from: query.from,
        to: query.to,
        q: query.q.clone().filter(|q| !q.trim().is_empty()),
    })
}

/// Compute listing aggregates over the full filtered set.
fn summarize(rows: &[ListedEvaluation]) -> ListingSummary {
    let completed_status = EvaluationStatus::Completed.as_str();

    let total = rows.len();
    let completed = rows.iter().filter(|r| r.status == completed_status).count();
    let pending = total - completed;
    let completion_rate = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };

    let mut by_employee: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut by_checklist: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let employee = row
            .employee_name
            .clone()
            .unwrap_or_else(|| GENERAL_LABEL.to_string());
        let is_completed = row.status == completed_status;

        let entry = by_employee.entry(employee).or_default();
        entry.0 += 1;
        entry.1 += usize::from(is_completed);

        let entry = by_checklist.entry(row.checklist_title.clone()).or_default();
        entry.0 += 1;
        entry.1 += usize::from(is_completed);
    }

    let into_groups = |map: BTreeMap<String, (usize, usize)>| {
        map.into_iter()
            .map(|(name, (total, completed))| GroupSummary {
                name,
                total,
                completed,
            })
            .collect()
    };

    ListingSummary {
        total,
        pending,
        completed,
        completion_rate,
        by_employee: into_groups(by_employee),
        by_checklist: into_groups(by_checklist),
    }
}
