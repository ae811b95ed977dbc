//! Well-known role name constants.
//!
//! These must match the role CHECK constraint in
//! `20260810000001_create_users_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_EVALUATOR: &str = "evaluator";

/// Check whether a role name is one of the known roles.
pub fn is_valid_role(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_EMPLOYEE | ROLE_EVALUATOR)
}
