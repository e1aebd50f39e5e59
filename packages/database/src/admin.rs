//! Admin account storage and the token revocation list.
//!
//! Usernames are stored lowercase so lookups are case-insensitive.
//! Password hashes are produced by the auth crate; this module never sees
//! a plaintext password.

use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// An admin account as stored in the database.
///
/// The `password_hash` stays inside the backend; API-facing summaries are
/// built in the server models crate and never include it.
#[derive(Debug, Clone)]
pub struct AdminRow {
    /// Database row ID.
    pub id: i64,
    /// Lowercase unique username.
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Role label (`admin` or `super_admin`); recorded, not enforced.
    pub role: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Last successful login (RFC 3339), if any.
    pub last_login: Option<String>,
    /// When the account was created (RFC 3339).
    pub created_at: String,
    /// When the account was last modified (RFC 3339).
    pub updated_at: String,
}

/// Fields for creating a new admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    /// Username; lowercased and trimmed before storage.
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Role label.
    pub role: String,
}

/// Returns the number of admin accounts.
///
/// The first-admin setup path is only reachable while this is zero.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn count_admins(db: &dyn Database) -> Result<u64, DbError> {
    let rows = db
        .query_raw_params("SELECT COUNT(*) as cnt FROM admins", &[])
        .await?;

    let count: i64 = rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0));

    #[allow(clippy::cast_sign_loss)]
    Ok(count as u64)
}

/// Finds an admin by username (case-insensitive).
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_by_username(
    db: &dyn Database,
    username: &str,
) -> Result<Option<AdminRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, username, password_hash, email, role, is_active,
                    last_login, created_at, updated_at
             FROM admins WHERE username = $1",
            &[DatabaseValue::String(username.trim().to_lowercase())],
        )
        .await?;

    Ok(rows.first().map(admin_from_row))
}

/// Finds an admin by row ID.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn find_by_id(db: &dyn Database, id: i64) -> Result<Option<AdminRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, username, password_hash, email, role, is_active,
                    last_login, created_at, updated_at
             FROM admins WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    Ok(rows.first().map(admin_from_row))
}

/// Creates a new admin account and returns its ID.
///
/// Callers check for an existing username first (via
/// [`find_by_username`]) so duplicates surface as a field-specific error
/// instead of a driver-level constraint violation.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_admin(db: &dyn Database, admin: &NewAdmin) -> Result<i64, DbError> {
    let now = crate::now_rfc3339();

    let rows = db
        .query_raw_params(
            "INSERT INTO admins (
                username, password_hash, email, role, is_active,
                created_at, updated_at
             ) VALUES ($1, $2, $3, $4, 1, $5, $5)
             RETURNING id",
            &[
                DatabaseValue::String(admin.username.trim().to_lowercase()),
                DatabaseValue::String(admin.password_hash.clone()),
                admin
                    .email
                    .as_ref()
                    .map_or(DatabaseValue::Null, |e| DatabaseValue::String(e.clone())),
                DatabaseValue::String(admin.role.clone()),
                DatabaseValue::String(now),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get admin id from insert".to_string(),
    })?;

    row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse admin id: {e}"),
    })
}

/// Records a successful login.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn update_last_login(db: &dyn Database, id: i64) -> Result<(), DbError> {
    db.exec_raw_params(
        "UPDATE admins SET last_login = $1, updated_at = $1 WHERE id = $2",
        &[
            DatabaseValue::String(crate::now_rfc3339()),
            DatabaseValue::Int64(id),
        ],
    )
    .await?;

    Ok(())
}

/// Replaces an admin's password hash.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn update_password_hash(
    db: &dyn Database,
    id: i64,
    password_hash: &str,
) -> Result<(), DbError> {
    db.exec_raw_params(
        "UPDATE admins SET password_hash = $1, updated_at = $2 WHERE id = $3",
        &[
            DatabaseValue::String(password_hash.to_string()),
            DatabaseValue::String(crate::now_rfc3339()),
            DatabaseValue::Int64(id),
        ],
    )
    .await?;

    Ok(())
}

/// Enables or disables an admin account.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn set_active(db: &dyn Database, id: i64, is_active: bool) -> Result<(), DbError> {
    db.exec_raw_params(
        "UPDATE admins SET is_active = $1, updated_at = $2 WHERE id = $3",
        &[
            DatabaseValue::Int64(i64::from(is_active)),
            DatabaseValue::String(crate::now_rfc3339()),
            DatabaseValue::Int64(id),
        ],
    )
    .await?;

    Ok(())
}

/// Adds a token ID to the revocation list (logout).
///
/// Idempotent — revoking an already-revoked token is not an error.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn revoke_token(db: &dyn Database, jti: &str) -> Result<(), DbError> {
    db.exec_raw_params(
        "INSERT INTO revoked_tokens (jti, revoked_at) VALUES ($1, $2)
         ON CONFLICT (jti) DO NOTHING",
        &[
            DatabaseValue::String(jti.to_string()),
            DatabaseValue::String(crate::now_rfc3339()),
        ],
    )
    .await?;

    Ok(())
}

/// Returns whether a token ID has been revoked.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn is_token_revoked(db: &dyn Database, jti: &str) -> Result<bool, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT 1 as found FROM revoked_tokens WHERE jti = $1",
            &[DatabaseValue::String(jti.to_string())],
        )
        .await?;

    Ok(!rows.is_empty())
}

/// Decodes an admin row.
fn admin_from_row(row: &switchy_database::Row) -> AdminRow {
    let is_active: i64 = row.to_value("is_active").unwrap_or(1);

    AdminRow {
        id: row.to_value("id").unwrap_or(0),
        username: row.to_value("username").unwrap_or_default(),
        password_hash: row.to_value("password_hash").unwrap_or_default(),
        email: row.to_value("email").unwrap_or(None),
        role: row.to_value("role").unwrap_or_else(|_| "admin".to_string()),
        is_active: is_active != 0,
        last_login: row.to_value("last_login").unwrap_or(None),
        created_at: row.to_value("created_at").unwrap_or_default(),
        updated_at: row.to_value("updated_at").unwrap_or_default(),
    }
}
