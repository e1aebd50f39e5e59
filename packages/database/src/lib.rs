#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `SQLite` storage for the rth-map backend.
//!
//! Holds the three collections the system needs: kecamatan boundary
//! polygons (read-only reference data), RTH metrics records, and admin
//! accounts with a token-revocation list. Uses `switchy_database` for all
//! database operations; the schema is created on open with
//! `CREATE TABLE IF NOT EXISTS` rather than versioned migrations — the
//! tables are few and additive changes have not been needed.

pub mod admin;
pub mod queries;

use std::path::Path;

use switchy_database::Database;
use switchy_database_connection::init_sqlite_rusqlite;

/// Default path for the rth-map database, overridable via
/// `RTH_MAP_DB_PATH`.
pub const DEFAULT_DB_PATH: &str = "data/rth-map.db";

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Failed to open the database file.
    #[error("Failed to open database: {0}")]
    Open(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Resolves the database path from `RTH_MAP_DB_PATH`, falling back to
/// [`DEFAULT_DB_PATH`].
#[must_use]
pub fn db_path_from_env() -> std::path::PathBuf {
    std::env::var("RTH_MAP_DB_PATH")
        .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string())
        .into()
}

/// Opens (or creates) the rth-map `SQLite` database and ensures the
/// schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the database cannot be opened or schema
/// creation fails.
pub async fn open_db(path: &Path) -> Result<Box<dyn Database>, DbError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = init_sqlite_rusqlite(Some(path)).map_err(|e| DbError::Open(e.to_string()))?;

    ensure_schema(db.as_ref()).await?;
    log::info!("Opened database at {}", path.display());

    Ok(db)
}

/// Creates all tables if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS district_boundaries (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL,
            geometry  TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS rth_kecamatan (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            kecamatan       TEXT NOT NULL,
            luas_taman      REAL NOT NULL DEFAULT 0,
            luas_pemakaman  REAL NOT NULL DEFAULT 0,
            total_rth       REAL NOT NULL DEFAULT 0,
            luas_kecamatan  REAL NOT NULL DEFAULT 0,
            cluster         TEXT NOT NULL DEFAULT 'cluster_0',
            tanggal_update  TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS admins (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT NOT NULL UNIQUE,
            password_hash   TEXT NOT NULL,
            email           TEXT,
            role            TEXT NOT NULL DEFAULT 'admin',
            is_active       INTEGER NOT NULL DEFAULT 1,
            last_login      TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS revoked_tokens (
            jti         TEXT PRIMARY KEY,
            revoked_at  TEXT NOT NULL
        )",
    )
    .await?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_rth_kecamatan_name
         ON rth_kecamatan (kecamatan)",
    )
    .await?;

    Ok(())
}

/// Current timestamp in the RFC 3339 format used for all stored dates.
#[must_use]
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
