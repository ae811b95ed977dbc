//! Response validation -- pure logic, no database access.
//!
//! Given a checklist tree and a flat set of submitted responses, decides
//! whether the submission is complete and structurally valid. The whole
//! submission is atomic: any missing or invalid item rejects it.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::item::{ChecklistItem, FieldType};

/// The fixed four-value rating scale used when a rating item carries no
/// option override.
pub const RATING_SCALE: [&str; 4] = ["siempre", "casi_siempre", "aveces", "nunca"];

/// Boolean answers accepted in both native and string form (case-sensitive).
const BOOLEAN_VALUES: [&str; 6] = ["si", "no", "true", "false", "1", "0"];

/// One submitted answer for a checklist item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
    pub item_id: String,
    pub value: Value,
    #[serde(default)]
    pub comment: String,
}

/// The legal response domain of a checkable item, resolved from its field
/// type and options. A total match over this drives validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseDomain {
    /// Finite set of allowed string values (select, or rating's scale).
    Choice(Vec<String>),
    Boolean,
    Number,
    Date,
    Time,
    Text,
}

/// Why a submission was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionReason {
    /// At least one required item has no answer.
    Incomplete,
    /// All items answered, but at least one value is outside its domain.
    Invalid,
}

/// Aggregate rejection payload: the caller is always told exactly which
/// items are missing or invalid so a client can highlight fields.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRejection {
    pub reason: RejectionReason,
    pub missing_ids: Vec<String>,
    pub invalid_ids: Vec<String>,
}

impl std::fmt::Display for SubmissionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            RejectionReason::Incomplete => write!(
                f,
                "submission incomplete: {} item(s) unanswered",
                self.missing_ids.len()
            ),
            RejectionReason::Invalid => write!(
                f,
                "submission invalid: {} item(s) outside their allowed values",
                self.invalid_ids.len()
            ),
        }
    }
}

/// Resolve the response domain for one item, or `None` for sections.
///
/// A rating or select item without options answers against the fixed
/// [`RATING_SCALE`]. For select that is a degenerate authoring state; the
/// fallback keeps such an item answerable instead of rejecting every value.
pub fn response_domain(item: &ChecklistItem) -> Option<ResponseDomain> {
    let domain = match item.field_type {
        FieldType::Section => return None,
        FieldType::Rating | FieldType::Select => {
            if item.options.is_empty() {
                ResponseDomain::Choice(RATING_SCALE.iter().map(|s| s.to_string()).collect())
            } else {
                ResponseDomain::Choice(item.options.iter().map(|o| o.value.clone()).collect())
            }
        }
        FieldType::Boolean => ResponseDomain::Boolean,
        FieldType::Number => ResponseDomain::Number,
        FieldType::Date => ResponseDomain::Date,
        FieldType::Time => ResponseDomain::Time,
        FieldType::Text => ResponseDomain::Text,
    };
    Some(domain)
}

/// Flatten the tree depth-first into `(item_id, domain)` pairs, skipping
/// section nodes entirely.
fn required_domains(items: &[ChecklistItem], acc: &mut Vec<(String, ResponseDomain)>) {
    for item in items {
        if let Some(domain) = response_domain(item) {
            acc.push((item.id.clone(), domain));
        }
        required_domains(&item.children, acc);
    }
}

/// Validate a submission against a checklist tree.
///
/// Returns `Ok(())` when every checkable item has a present, structurally
/// valid value. Otherwise returns a [`SubmissionRejection`] carrying both
/// aggregate id lists; incompleteness takes precedence as the reason when
/// both kinds of failure occur.
pub fn validate_submission(
    items: &[ChecklistItem],
    responses: &[SubmittedResponse],
) -> Result<(), SubmissionRejection> {
    let mut required = Vec::new();
    required_domains(items, &mut required);

    // Duplicate answers for the same item keep the first occurrence.
    let mut by_id: HashMap<&str, &SubmittedResponse> = HashMap::new();
    for response in responses {
        by_id.entry(response.item_id.as_str()).or_insert(response);
    }

    let mut missing_ids = Vec::new();
    let mut invalid_ids = Vec::new();

    for (id, domain) in &required {
        match by_id.get(id.as_str()) {
            None => missing_ids.push(id.clone()),
            Some(response) if value_is_empty(&response.value) => missing_ids.push(id.clone()),
            Some(response) => {
                if !value_matches_domain(&response.value, domain) {
                    invalid_ids.push(id.clone());
                }
            }
        }
    }

    if missing_ids.is_empty() && invalid_ids.is_empty() {
        return Ok(());
    }

    let reason = if missing_ids.is_empty() {
        RejectionReason::Invalid
    } else {
        RejectionReason::Incomplete
    };
    Err(SubmissionRejection {
        reason,
        missing_ids,
        invalid_ids,
    })
}

/// A value counts as absent when it is null or a blank string.
fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn value_matches_domain(value: &Value, domain: &ResponseDomain) -> bool {
    match domain {
        ResponseDomain::Choice(allowed) => value
            .as_str()
            .map(|s| allowed.iter().any(|a| a == s))
            .unwrap_or(false),
        ResponseDomain::Boolean => match value {
            Value::Bool(_) => true,
            Value::String(s) => BOOLEAN_VALUES.contains(&s.as_str()),
            _ => false,
        },
        ResponseDomain::Number => match value {
            Value::Number(n) => n.as_f64().map(f64::is_finite).unwrap_or(false),
            Value::String(s) => s.trim().parse::<f64>().map(|n| n.is_finite()).unwrap_or(false),
            _ => false,
        },
        ResponseDomain::Date => value
            .as_str()
            .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok())
            .unwrap_or(false),
        ResponseDomain::Time => value.as_str().map(is_valid_time).unwrap_or(false),
        ResponseDomain::Text => value.as_str().map(|s| !s.trim().is_empty()).unwrap_or(false),
    }
}

/// 24-hour `HH:MM` with hour 00-23 and minute 00-59.
///
/// Also used for the advisory `due_time` on evaluation schedules.
pub fn is_valid_time(value: &str) -> bool {
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    let re = TIME_RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());
    re.is_match(value)
}
