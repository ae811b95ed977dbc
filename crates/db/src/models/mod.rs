pub mod checklist;
pub mod evaluation;
pub mod schedule;
pub mod user;
