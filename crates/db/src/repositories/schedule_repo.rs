//! Repository for the `evaluation_schedules` table.

use evalia_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule::{EvaluationSchedule, NewSchedule};

/// Column list for evaluation_schedules queries.
const COLUMNS: &str = "id, checklist_id, evaluator_id, employee_id, created_by, frequency, \
    due_time, notes, active, created_at, updated_at";

/// Provides schedule lookup, find-or-create, and activation toggling.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Find an active schedule with the same identity tuple, or create one.
    ///
    /// The partial unique index `uq_evaluation_schedules_identity` backstops
    /// this under concurrent assignment requests: a losing insert surfaces as
    /// a unique violation rather than a duplicate schedule.
    pub async fn find_or_create(
        pool: &PgPool,
        input: &NewSchedule,
    ) -> Result<EvaluationSchedule, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM evaluation_schedules
             WHERE checklist_id = $1
               AND evaluator_id = $2
               AND employee_id IS NOT DISTINCT FROM $3
               AND frequency = $4
               AND due_time = $5
               AND active"
        );
        let existing = sqlx::query_as::<_, EvaluationSchedule>(&query)
            .bind(input.checklist_id)
            .bind(input.evaluator_id)
            .bind(input.employee_id)
            .bind(&input.frequency)
            .bind(&input.due_time)
            .fetch_optional(pool)
            .await?;
        if let Some(schedule) = existing {
            return Ok(schedule);
        }

        let query = format!(
            "INSERT INTO evaluation_schedules
                (checklist_id, evaluator_id, employee_id, created_by, frequency, due_time, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EvaluationSchedule>(&query)
            .bind(input.checklist_id)
            .bind(input.evaluator_id)
            .bind(input.employee_id)
            .bind(input.created_by)
            .bind(&input.frequency)
            .bind(&input.due_time)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Active schedules visible to a caller: all of them for admins
    /// (`evaluator = None`), otherwise only the caller's own.
    pub async fn list_active(
        pool: &PgPool,
        evaluator: Option<DbId>,
    ) -> Result<Vec<EvaluationSchedule>, sqlx::Error> {
        match evaluator {
            Some(evaluator_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM evaluation_schedules
                     WHERE active AND evaluator_id = $1
                     ORDER BY id"
                );
                sqlx::query_as::<_, EvaluationSchedule>(&query)
                    .bind(evaluator_id)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM evaluation_schedules WHERE active ORDER BY id"
                );
                sqlx::query_as::<_, EvaluationSchedule>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// List all schedules, newest first (admin listing).
    pub async fn list(pool: &PgPool) -> Result<Vec<EvaluationSchedule>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM evaluation_schedules ORDER BY created_at DESC");
        sqlx::query_as::<_, EvaluationSchedule>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a schedule by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EvaluationSchedule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM evaluation_schedules WHERE id = $1");
        sqlx::query_as::<_, EvaluationSchedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Toggle the active flag, returning the updated row.
    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        active: bool,
    ) -> Result<Option<EvaluationSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE evaluation_schedules
             SET active = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EvaluationSchedule>(&query)
            .bind(id)
            .bind(active)
            .fetch_optional(pool)
            .await
    }
}
