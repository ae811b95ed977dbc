//! Repository for the `users` table.

use evalia_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for users queries.
const COLUMNS: &str =
    "id, username, password_hash, role, first_name, last_name, email, created_at, updated_at";

/// Provides directory and identity operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a new user, returning the created row.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
        role: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, role, first_name, last_name, email)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (used by login).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List users, optionally restricted to one role, username order.
    pub async fn list(pool: &PgPool, role: Option<&str>) -> Result<Vec<User>, sqlx::Error> {
        match role {
            Some(role) => {
                let query =
                    format!("SELECT {COLUMNS} FROM users WHERE role = $1 ORDER BY username");
                sqlx::query_as::<_, User>(&query)
                    .bind(role)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM users ORDER BY username");
                sqlx::query_as::<_, User>(&query).fetch_all(pool).await
            }
        }
    }

    /// Ids of every user holding the given role. Used to snapshot the
    /// employee roster for "apply to all employees" assignments.
    pub async fn list_ids_by_role(pool: &PgPool, role: &str) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM users WHERE role = $1 ORDER BY id")
            .bind(role)
            .fetch_all(pool)
            .await
    }

    /// Role of one user, or `None` when the user does not exist.
    pub async fn find_role(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
