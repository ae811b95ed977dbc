//! The hierarchical checklist model and its operations.
//!
//! A checklist is an ordered forest of [`item::ChecklistItem`] nodes. Authors
//! edit it through the pure operations in [`editor`]; submissions against it
//! are checked by [`validate`].

pub mod editor;
pub mod item;
pub mod validate;

pub use item::{sanitize_items, ChecklistItem, FieldOption, FieldType, ItemDraft};
pub use validate::{
    is_valid_time, validate_submission, RejectionReason, SubmissionRejection, SubmittedResponse,
};
