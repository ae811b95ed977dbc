//! Repository for the `evaluations` table, including the reconcile pass
//! that materializes recurring evaluation instances.

use chrono::{NaiveDate, TimeZone, Utc};
use evalia_core::checklist::SubmittedResponse;
use evalia_core::period::{period_key, Frequency};
use evalia_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::evaluation::{Evaluation, EvaluationFilter, ListedEvaluation, NewEvaluation};
use crate::models::schedule::EvaluationSchedule;

/// Column list for evaluations queries.
const COLUMNS: &str = "id, checklist_id, schedule_id, period_key, assigned_to, assigned_by, \
    employee_id, status, responses, submitted_at, notes, created_at, updated_at";

/// Joined listing SELECT: display names resolved in SQL, with the same
/// "first last, else username" fallback the directory uses.
const LISTED_SELECT: &str = "SELECT e.id, e.checklist_id, c.title AS checklist_title, \
    e.schedule_id, e.period_key, e.assigned_to, \
    COALESCE(NULLIF(TRIM(ue.first_name || ' ' || ue.last_name), ''), ue.username) AS evaluator_name, \
    e.employee_id, \
    COALESCE(NULLIF(TRIM(um.first_name || ' ' || um.last_name), ''), um.username) AS employee_name, \
    e.status, e.submitted_at, e.notes, e.created_at \
    FROM evaluations e \
    JOIN checklists c ON c.id = e.checklist_id \
    JOIN users ue ON ue.id = e.assigned_to \
    LEFT JOIN users um ON um.id = e.employee_id";

/// Typed bind value for the dynamically-built listing query.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

/// Provides evaluation CRUD, submission, and schedule reconciliation.
pub struct EvaluationRepo;

impl EvaluationRepo {
    /// Create a one-off (non-recurring) evaluation, status pending.
    pub async fn create_one_off(
        pool: &PgPool,
        input: &NewEvaluation,
    ) -> Result<Evaluation, sqlx::Error> {
        let query = format!(
            "INSERT INTO evaluations (checklist_id, assigned_to, assigned_by, employee_id, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(input.checklist_id)
            .bind(input.assigned_to)
            .bind(input.assigned_by)
            .bind(input.employee_id)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Materialize the evaluation for one schedule and period, unless it
    /// already exists.
    ///
    /// Idempotent and race-safe: the insert lands on the
    /// `uq_evaluations_schedule_period` unique index with ON CONFLICT DO
    /// NOTHING, so concurrent passes for the same (schedule, period) produce
    /// exactly one row. Returns the created row, or `None` on the no-op.
    pub async fn materialize_for_period(
        pool: &PgPool,
        schedule: &EvaluationSchedule,
        key: &str,
    ) -> Result<Option<Evaluation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO evaluations
                (checklist_id, schedule_id, period_key, assigned_to, assigned_by, employee_id, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (schedule_id, period_key) WHERE schedule_id IS NOT NULL DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(schedule.checklist_id)
            .bind(schedule.id)
            .bind(key)
            .bind(schedule.evaluator_id)
            .bind(schedule.created_by)
            .bind(schedule.employee_id)
            .bind(&schedule.notes)
            .fetch_optional(pool)
            .await
    }

    /// Reconcile a set of active schedules against the current period:
    /// ensure each one has its evaluation for `today`'s period key.
    ///
    /// Returns how many evaluations were created. Schedules whose stored
    /// frequency fails to parse are skipped (the CHECK constraint makes
    /// that unreachable in practice).
    pub async fn reconcile_schedules(
        pool: &PgPool,
        schedules: &[EvaluationSchedule],
        today: NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let mut created = 0u64;
        for schedule in schedules {
            let Ok(frequency) = schedule.frequency.parse::<Frequency>() else {
                continue;
            };
            let key = period_key(today, frequency);
            if Self::materialize_for_period(pool, schedule, &key)
                .await?
                .is_some()
            {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Find an evaluation by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Evaluation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM evaluations WHERE id = $1");
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List evaluations with display names joined in, newest first.
    ///
    /// All filters are applied in SQL; pagination and summary aggregation
    /// happen in the caller over the full filtered set.
    pub async fn list(
        pool: &PgPool,
        filter: &EvaluationFilter,
    ) -> Result<Vec<ListedEvaluation>, sqlx::Error> {
        let (where_clause, bind_values) = build_filter(filter);
        let query = format!(
            "SELECT * FROM ({LISTED_SELECT}) ev {where_clause} ORDER BY created_at DESC"
        );
        let mut q = sqlx::query_as::<_, ListedEvaluation>(&query);
        for value in &bind_values {
            q = match value {
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.fetch_all(pool).await
    }

    /// Record a validated submission: responses, notes, optional employee
    /// reassignment, pending -> completed, submitted_at set once.
    ///
    /// The `status = 'pending'` guard makes the terminal transition race-safe:
    /// a concurrent second submit sees zero rows and gets `None`.
    pub async fn submit(
        pool: &PgPool,
        id: DbId,
        responses: &[SubmittedResponse],
        notes: &str,
        employee_id: Option<DbId>,
    ) -> Result<Option<Evaluation>, sqlx::Error> {
        let query = format!(
            "UPDATE evaluations
             SET responses = $2,
                 notes = $3,
                 employee_id = COALESCE($4, employee_id),
                 status = 'completed',
                 submitted_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Evaluation>(&query)
            .bind(id)
            .bind(Json(responses))
            .bind(notes)
            .bind(employee_id)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an evaluation. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM evaluations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build a WHERE clause and bind values from the listing filter.
///
/// The clause is empty when no filters are active, or starts with `WHERE `.
fn build_filter(filter: &EvaluationFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(assigned_to) = filter.assigned_to {
        conditions.push(format!("assigned_to = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(assigned_to));
    }

    if let Some(ref status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.clone()));
    }

    if let Some(checklist_id) = filter.checklist_id {
        conditions.push(format!("checklist_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(checklist_id));
    }

    match filter.employee {
        Some(Some(employee_id)) => {
            conditions.push(format!("employee_id = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::BigInt(employee_id));
        }
        Some(None) => conditions.push("employee_id IS NULL".to_string()),
        None => {}
    }

    if let Some(from) = filter.from {
        let start = Utc.from_utc_datetime(&from.and_hms_opt(0, 0, 0).unwrap());
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(start));
    }

    if let Some(to) = filter.to {
        // Inclusive end of day: strictly before the next midnight. The last
        // representable date has no next midnight, and no timestamp can lie
        // past it, so the bound is simply omitted there.
        if let Some(next) = to.checked_add_days(chrono::Days::new(1)) {
            let end = Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0).unwrap());
            conditions.push(format!("created_at < ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Timestamp(end));
        }
    }

    if let Some(ref q) = filter.q {
        conditions.push(format!(
            "(checklist_title || ' ' || evaluator_name || ' ' || \
             COALESCE(employee_name, 'General') || ' ' || notes) ILIKE ${bind_idx}"
        ));
        bind_values.push(BindValue::Text(format!("%{q}%")));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}
