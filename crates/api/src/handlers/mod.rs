pub mod auth;
pub mod checklists;
pub mod evaluations;
pub mod schedules;
pub mod users;
