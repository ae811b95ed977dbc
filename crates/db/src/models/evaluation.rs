//! Evaluation instance models and listing DTOs.

use chrono::NaiveDate;
use evalia_core::checklist::SubmittedResponse;
use evalia_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `evaluations` table.
///
/// `schedule_id` and `period_key` are both NULL for one-off assignments.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Evaluation {
    pub id: DbId,
    pub checklist_id: DbId,
    pub schedule_id: Option<DbId>,
    pub period_key: Option<String>,
    pub assigned_to: DbId,
    pub assigned_by: Option<DbId>,
    pub employee_id: Option<DbId>,
    pub status: String,
    pub responses: Json<Vec<SubmittedResponse>>,
    pub submitted_at: Option<Timestamp>,
    pub notes: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One-off evaluation creation parameters (admin assignment).
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub checklist_id: DbId,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub employee_id: Option<DbId>,
    pub notes: String,
}

/// A listed evaluation with display names joined in, as returned by the
/// listing endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListedEvaluation {
    pub id: DbId,
    pub checklist_id: DbId,
    pub checklist_title: String,
    pub schedule_id: Option<DbId>,
    pub period_key: Option<String>,
    pub assigned_to: DbId,
    pub evaluator_name: String,
    pub employee_id: Option<DbId>,
    /// NULL for general evaluations; the API layer renders "General".
    pub employee_name: Option<String>,
    pub status: String,
    pub submitted_at: Option<Timestamp>,
    pub notes: String,
    pub created_at: Timestamp,
}

/// Filters for the evaluation listing query. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct EvaluationFilter {
    /// Restrict to this assignee (set for non-admin callers).
    pub assigned_to: Option<DbId>,
    /// `pending` or `completed`.
    pub status: Option<String>,
    pub checklist_id: Option<DbId>,
    /// `Some(None)` filters for general evaluations (employee IS NULL).
    pub employee: Option<Option<DbId>>,
    /// Inclusive creation-date lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive creation-date upper bound (end of day).
    pub to: Option<NaiveDate>,
    /// Case-insensitive free text over checklist title, evaluator name,
    /// employee name, and notes.
    pub q: Option<String>,
}

/// Deserialized submission body for `PUT /evaluations/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEvaluation {
    #[serde(default)]
    pub responses: Vec<SubmittedResponse>,
    #[serde(default)]
    pub notes: String,
    /// Optional employee reassignment at submission time.
    #[serde(default)]
    pub employee_id: Option<DbId>,
}
