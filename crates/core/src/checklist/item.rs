//! Checklist item tree: node types and sanitization.
//!
//! Items are stored as a JSONB forest, so the serde representation here is
//! the wire and storage format at the same time. Field names are camelCase
//! to match what editors round-trip (`fieldType`, `children`, ...).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The response domain selector for a checklist item.
///
/// `Section` nodes are pure grouping/headings and never carry a response.
/// Every other type is checkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Section,
    Rating,
    Text,
    Number,
    Date,
    Time,
    Boolean,
    Select,
}

impl FieldType {
    /// Whether items of this type require a response.
    pub fn is_checkable(self) -> bool {
        self != FieldType::Section
    }

    /// Whether items of this type may carry an options list.
    pub fn supports_options(self) -> bool {
        matches!(self, FieldType::Rating | FieldType::Select)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Section => "section",
            FieldType::Rating => "rating",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Boolean => "boolean",
            FieldType::Select => "select",
        }
    }
}

/// One selectable option of a `select` item, or an override of the default
/// rating scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    /// Build an option from a bare label, deriving the stored value from it
    /// (lowercased, whitespace collapsed to `_`).
    pub fn from_label(label: &str) -> Self {
        FieldOption {
            label: label.to_string(),
            value: derive_option_value(label),
        }
    }
}

/// Derive a machine value from an option label.
pub fn derive_option_value(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// A sanitized node in a checklist tree.
///
/// The `id` is unique across the entire tree, assigned once at sanitization
/// and preserved by every subsequent edit. In-flight evaluations reference
/// items by this id, so restructuring must never regenerate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChecklistItem>,
}

/// The serde-friendly candidate superset submitted by authoring clients.
///
/// Legacy payloads carry `hasCheck: false` instead of an explicit field type,
/// and may use `type` as an alias for `fieldType`. Sanitization collapses
/// all of that into a [`ChecklistItem`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "type")]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub has_check: Option<bool>,
    #[serde(default)]
    pub options: Vec<OptionDraft>,
    #[serde(default)]
    pub children: Vec<ItemDraft>,
}

/// Candidate option: either side may be missing; the value is derived from
/// the label when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionDraft {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Resolve the effective field type of a draft.
///
/// Precedence: explicit `fieldType`/`type`, then `hasCheck == false` meaning
/// a section heading, then the default `rating`.
fn field_type_for(draft: &ItemDraft) -> FieldType {
    if let Some(ft) = draft.field_type {
        return ft;
    }
    if draft.has_check == Some(false) {
        return FieldType::Section;
    }
    FieldType::Rating
}

/// Sanitize a candidate forest into a valid checklist tree.
///
/// Items with an empty or whitespace-only title are dropped along with their
/// entire subtree (children are not promoted). Surviving items get a UUID v4
/// id when missing; existing ids are preserved, which makes sanitization
/// idempotent modulo first-time id assignment.
pub fn sanitize_items(drafts: &[ItemDraft]) -> Vec<ChecklistItem> {
    drafts
        .iter()
        .filter_map(|draft| {
            let title = draft.title.trim();
            if title.is_empty() {
                return None;
            }
            let field_type = field_type_for(draft);
            let id = draft
                .id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let options = if field_type.supports_options() {
                sanitize_options(&draft.options)
            } else {
                Vec::new()
            };
            Some(ChecklistItem {
                id,
                title: title.to_string(),
                field_type,
                options,
                children: sanitize_items(&draft.children),
            })
        })
        .collect()
}

fn sanitize_options(drafts: &[OptionDraft]) -> Vec<FieldOption> {
    drafts
        .iter()
        .filter_map(|opt| {
            let label = opt.label.as_deref().map(str::trim).unwrap_or("");
            let value = opt.value.as_deref().map(str::trim).unwrap_or("");
            match (label.is_empty(), value.is_empty()) {
                (true, true) => None,
                (false, true) => Some(FieldOption::from_label(label)),
                (true, false) => Some(FieldOption {
                    label: value.to_string(),
                    value: value.to_string(),
                }),
                (false, false) => Some(FieldOption {
                    label: label.to_string(),
                    value: value.to_string(),
                }),
            }
        })
        .collect()
}

/// Collect the ids of all checkable (non-section) items, depth-first.
pub fn collect_checkable_ids(items: &[ChecklistItem]) -> Vec<String> {
    let mut acc = Vec::new();
    fn walk(items: &[ChecklistItem], acc: &mut Vec<String>) {
        for item in items {
            if item.field_type.is_checkable() {
                acc.push(item.id.clone());
            }
            walk(&item.children, acc);
        }
    }
    walk(items, &mut acc);
    acc
}

/// Collect every id in the tree, depth-first, sections included.
pub fn flatten_ids(items: &[ChecklistItem]) -> Vec<String> {
    let mut acc = Vec::new();
    fn walk(items: &[ChecklistItem], acc: &mut Vec<String>) {
        for item in items {
            acc.push(item.id.clone());
            walk(&item.children, acc);
        }
    }
    walk(items, &mut acc);
    acc
}
