//! Evaluation schedule (recurrence definition) model.

use evalia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `evaluation_schedules` table.
///
/// `employee_id = NULL` means the schedule is general (no specific employee).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EvaluationSchedule {
    pub id: DbId,
    pub checklist_id: DbId,
    pub evaluator_id: DbId,
    pub employee_id: Option<DbId>,
    pub created_by: Option<DbId>,
    /// `daily` or `monthly` (core `Frequency` in storage form).
    pub frequency: String,
    /// Advisory `HH:MM` deadline, or empty. Never affects period bucketing.
    pub due_time: String,
    pub notes: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Identity tuple + metadata for find-or-create of a schedule.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub checklist_id: DbId,
    pub evaluator_id: DbId,
    pub employee_id: Option<DbId>,
    pub created_by: DbId,
    pub frequency: String,
    pub due_time: String,
    pub notes: String,
}
