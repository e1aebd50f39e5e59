#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the rth-map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract, and so the password hash can never leak into a response.

use rth_map_database::admin::AdminRow;
use rth_map_rth_models::MetricRow;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// An admin account as returned by the API. No password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl From<AdminRow> for AdminSummary {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
        }
    }
}

/// `POST /api/auth/login` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/login` response body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminSummary,
}

/// `GET /api/setup/status` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupStatus {
    /// `true` until the first admin account exists.
    pub setup_required: bool,
}

/// `POST /api/setup/admin` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SetupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /api/auth/change-password` request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// `POST /api/rth-kecamatan/bulk` request body: the full replacement
/// dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkPayload {
    pub data: Vec<MetricRow>,
}

/// Response body for bulk replace and spreadsheet import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub message: String,
    /// Rows now in the store.
    pub inserted: usize,
    /// Upload rows skipped during validation.
    pub skipped: usize,
    /// Rows removed by the replace.
    pub removed: u64,
}

/// Query parameters for the tabular view.
///
/// All optional and parsed leniently: an unknown `sort_by` or `order`
/// value means "no sort" / "ascending" rather than a 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableQueryParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// Query parameters for destructive endpoints (`bulk`, `import`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: Option<String>,
    /// Original filename of the uploaded spreadsheet, used to pick the
    /// parser.
    #[serde(default)]
    pub filename: Option<String>,
}

impl ConfirmParams {
    /// Whether the caller explicitly confirmed the destructive replace.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("true")
    }
}
