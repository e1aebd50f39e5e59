//! HTTP handler functions for the rth-map API.

use actix_web::{HttpRequest, HttpResponse, http::header, web};
use rth_map_auth::AuthError;
use rth_map_database::{admin, queries};
use rth_map_database::admin::AdminRow;
use rth_map_reconcile::{map::build_map_view, matcher::TwoPhaseMatcher};
use rth_map_rth_models::MetricRow;
use rth_map_server_models::{
    AdminSummary, ApiHealth, BulkPayload, BulkResult, ChangePasswordRequest, ConfirmParams,
    LoginRequest, LoginResponse, SetupRequest, SetupStatus, TableQueryParams,
};
use rth_map_table::{SortDirection, SortKey, TableQuery};

use crate::AppState;

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

/// Maps an [`AuthError`] to the HTTP response the admin frontend expects:
/// 401 for anything token- or credential-shaped, 403 for disabled
/// accounts, 400 for bad requests, 500 for internal failures.
fn auth_error_response(e: &AuthError) -> HttpResponse {
    match e {
        AuthError::InvalidCredentials
        | AuthError::MissingToken
        | AuthError::TokenInvalid
        | AuthError::TokenExpired
        | AuthError::TokenRevoked
        | AuthError::NoAdminForToken => HttpResponse::Unauthorized().json(error_body(e)),
        AuthError::AccountInactive => HttpResponse::Forbidden().json(error_body(e)),
        AuthError::AdminExists
        | AuthError::DuplicateUsername
        | AuthError::MissingFields
        | AuthError::WeakPassword => HttpResponse::BadRequest().json(error_body(e)),
        AuthError::Hash(_) | AuthError::Db(_) => {
            log::error!("Auth failure: {e}");
            HttpResponse::InternalServerError().json(error_body("Internal server error"))
        }
    }
}

fn bearer_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Resolves the request's bearer token to an active admin.
async fn require_admin(state: &AppState, req: &HttpRequest) -> Result<AdminRow, HttpResponse> {
    rth_map_auth::authorize(state.db.as_ref(), &state.auth, bearer_header(req))
        .await
        .map_err(|e| auth_error_response(&e))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/kecamatan/public`
///
/// Returns the boundary store as a plain `GeoJSON` `FeatureCollection`.
pub async fn boundaries_public(state: web::Data<AppState>) -> HttpResponse {
    match queries::get_boundaries(state.db.as_ref()).await {
        Ok(boundaries) => {
            let features: Vec<serde_json::Value> = boundaries
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "type": "Feature",
                        "properties": { "name": b.name },
                        "geometry": b.geometry,
                    })
                })
                .collect();
            HttpResponse::Ok().json(serde_json::json!({
                "type": "FeatureCollection",
                "features": features,
            }))
        }
        Err(e) => {
            log::error!("Failed to query boundaries: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to query boundaries"))
        }
    }
}

/// `GET /api/rth-kecamatan/public`
pub async fn rth_public(state: web::Data<AppState>) -> HttpResponse {
    match queries::get_rth_records(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to query RTH records: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to query RTH records"))
        }
    }
}

/// `GET /api/map/public`
///
/// Fetches boundaries and metrics concurrently and returns the complete
/// reconciled map view. Either fetch failing fails the whole request —
/// the map is never rendered from partial data.
pub async fn map_public(state: web::Data<AppState>) -> HttpResponse {
    let db = state.db.as_ref();
    match tokio::try_join!(queries::get_boundaries(db), queries::get_rth_records(db)) {
        Ok((boundaries, metrics)) => {
            let view = build_map_view(&boundaries, &metrics, &TwoPhaseMatcher);
            HttpResponse::Ok().json(view)
        }
        Err(e) => {
            log::error!("Failed to build map view: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to build map view"))
        }
    }
}

/// `GET /api/rth-kecamatan/table`
///
/// Filtered, sorted tabular view. Unknown `sort_by`/`order` values are
/// ignored rather than rejected.
pub async fn rth_table(
    state: web::Data<AppState>,
    params: web::Query<TableQueryParams>,
) -> HttpResponse {
    let query = TableQuery {
        search: params.search.clone(),
        cluster: params.cluster.clone(),
        sort_by: params
            .sort_by
            .as_deref()
            .and_then(|s| s.parse::<SortKey>().ok()),
        order: params
            .order
            .as_deref()
            .and_then(|s| s.parse::<SortDirection>().ok())
            .unwrap_or_default(),
    };

    match queries::get_rth_records(state.db.as_ref()).await {
        Ok(rows) => HttpResponse::Ok().json(rth_map_table::project(&rows, &query)),
        Err(e) => {
            log::error!("Failed to query RTH records: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to query RTH records"))
        }
    }
}

/// `GET /api/setup/status`
pub async fn setup_status(state: web::Data<AppState>) -> HttpResponse {
    match admin::count_admins(state.db.as_ref()).await {
        Ok(count) => HttpResponse::Ok().json(SetupStatus {
            setup_required: count == 0,
        }),
        Err(e) => {
            log::error!("Failed to count admins: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to check setup status"))
        }
    }
}

/// `POST /api/setup/admin`
///
/// Creates the very first admin account. Refuses with 400 once any admin
/// exists.
pub async fn setup_admin(
    state: web::Data<AppState>,
    body: web::Json<SetupRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    match rth_map_auth::setup_initial_admin(
        state.db.as_ref(),
        &body.username,
        &body.password,
        body.email,
    )
    .await
    {
        Ok(account) => HttpResponse::Created().json(AdminSummary::from(account)),
        Err(e) => auth_error_response(&e),
    }
}

/// `POST /api/auth/login`
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    match rth_map_auth::login(
        state.db.as_ref(),
        &state.auth,
        &body.username,
        &body.password,
    )
    .await
    {
        Ok((token, account)) => HttpResponse::Ok().json(LoginResponse {
            token,
            admin: AdminSummary::from(account),
        }),
        Err(e) => auth_error_response(&e),
    }
}

/// `GET /api/auth/profile`
pub async fn profile(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    match require_admin(&state, &req).await {
        Ok(account) => HttpResponse::Ok().json(AdminSummary::from(account)),
        Err(response) => response,
    }
}

/// `POST /api/auth/logout`
///
/// Revokes the presented token. Best-effort: a bad token still logs out.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    match rth_map_auth::logout(state.db.as_ref(), &state.auth, bearer_header(&req)).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Logout berhasil" })),
        Err(e) => auth_error_response(&e),
    }
}

/// `POST /api/auth/change-password`
pub async fn change_password(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> HttpResponse {
    let account = match require_admin(&state, &req).await {
        Ok(account) => account,
        Err(response) => return response,
    };

    match rth_map_auth::change_password(
        state.db.as_ref(),
        &account,
        &body.current_password,
        &body.new_password,
    )
    .await
    {
        Ok(()) => {
            HttpResponse::Ok().json(serde_json::json!({ "message": "Password berhasil diubah" }))
        }
        Err(e) => auth_error_response(&e),
    }
}

/// `GET /api/rth-kecamatan`
pub async fn rth_list(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }
    rth_public(state).await
}

/// `POST /api/rth-kecamatan`
pub async fn rth_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<MetricRow>,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }

    let row = body.into_inner();
    if row.kecamatan.trim().is_empty() {
        return HttpResponse::BadRequest().json(error_body("Nama kecamatan harus diisi"));
    }

    match queries::insert_rth_record(state.db.as_ref(), &row).await {
        Ok(id) => match queries::get_rth_record(state.db.as_ref(), id).await {
            Ok(Some(record)) => HttpResponse::Created().json(record),
            Ok(None) => {
                log::error!("Inserted RTH record {id} not found");
                HttpResponse::InternalServerError().json(error_body("Failed to create record"))
            }
            Err(e) => {
                log::error!("Failed to read back RTH record {id}: {e}");
                HttpResponse::InternalServerError().json(error_body("Failed to create record"))
            }
        },
        Err(e) => {
            log::error!("Failed to insert RTH record: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to create record"))
        }
    }
}

/// `PUT /api/rth-kecamatan/{id}`
pub async fn rth_update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<MetricRow>,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }

    let id = path.into_inner();
    let row = body.into_inner();
    if row.kecamatan.trim().is_empty() {
        return HttpResponse::BadRequest().json(error_body("Nama kecamatan harus diisi"));
    }

    match queries::update_rth_record(state.db.as_ref(), id, &row).await {
        Ok(true) => match queries::get_rth_record(state.db.as_ref(), id).await {
            Ok(Some(record)) => HttpResponse::Ok().json(record),
            Ok(None) | Err(_) => {
                HttpResponse::Ok().json(serde_json::json!({ "message": "Data berhasil diubah" }))
            }
        },
        Ok(false) => HttpResponse::NotFound().json(error_body("Data tidak ditemukan")),
        Err(e) => {
            log::error!("Failed to update RTH record {id}: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to update record"))
        }
    }
}

/// `DELETE /api/rth-kecamatan/{id}`
pub async fn rth_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }

    let id = path.into_inner();
    match queries::delete_rth_record(state.db.as_ref(), id).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "message": "Data berhasil dihapus" })),
        Ok(false) => HttpResponse::NotFound().json(error_body("Data tidak ditemukan")),
        Err(e) => {
            log::error!("Failed to delete RTH record {id}: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to delete record"))
        }
    }
}

/// `POST /api/rth-kecamatan/bulk?confirm=true`
///
/// Full replace of the metrics store with the posted rows. Destructive,
/// so the caller must pass `confirm=true` explicitly.
pub async fn rth_bulk(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ConfirmParams>,
    body: web::Json<BulkPayload>,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }
    if !params.confirmed() {
        return HttpResponse::BadRequest().json(error_body(
            "Operasi ini mengganti seluruh data RTH. Tambahkan confirm=true untuk melanjutkan.",
        ));
    }

    let rows: Vec<MetricRow> = body
        .into_inner()
        .data
        .into_iter()
        .filter(|row| !row.kecamatan.trim().is_empty())
        .collect();
    if rows.is_empty() {
        return HttpResponse::BadRequest()
            .json(error_body("Tidak ada data valid yang ditemukan"));
    }

    match queries::replace_rth_records(state.db.as_ref(), &rows).await {
        Ok(removed) => HttpResponse::Ok().json(BulkResult {
            message: format!("{} data berhasil disimpan", rows.len()),
            inserted: rows.len(),
            skipped: 0,
            removed,
        }),
        Err(e) => {
            log::error!("Failed to replace RTH records: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to replace records"))
        }
    }
}

/// `POST /api/rth-kecamatan/import?filename=rth.xlsx&confirm=true`
///
/// Parses an uploaded spreadsheet (raw bytes body) and replaces the
/// metrics store with its valid rows.
pub async fn rth_import(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ConfirmParams>,
    body: web::Bytes,
) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }
    if !params.confirmed() {
        return HttpResponse::BadRequest().json(error_body(
            "Operasi ini mengganti seluruh data RTH. Tambahkan confirm=true untuk melanjutkan.",
        ));
    }
    let Some(filename) = params.filename.as_deref() else {
        return HttpResponse::BadRequest().json(error_body("Parameter filename harus diisi"));
    };

    let parsed = rth_map_import::parse_spreadsheet(&body, filename)
        .and_then(|rows| rth_map_import::validate(&rows));
    let (rows, skipped) = match parsed {
        Ok(result) => result,
        Err(e) => return HttpResponse::BadRequest().json(error_body(e)),
    };

    match queries::replace_rth_records(state.db.as_ref(), &rows).await {
        Ok(removed) => {
            log::info!(
                "Imported {} rows from '{filename}' ({skipped} skipped, {removed} replaced)",
                rows.len()
            );
            HttpResponse::Ok().json(BulkResult {
                message: format!("{} data berhasil diimpor", rows.len()),
                inserted: rows.len(),
                skipped,
                removed,
            })
        }
        Err(e) => {
            log::error!("Failed to replace RTH records: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to replace records"))
        }
    }
}

/// `GET /api/rth-kecamatan/export`
///
/// Streams the metrics store back out as a CSV the importer accepts.
pub async fn rth_export(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Err(response) = require_admin(&state, &req).await {
        return response;
    }

    let rows = match queries::get_rth_records(state.db.as_ref()).await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Failed to query RTH records: {e}");
            return HttpResponse::InternalServerError()
                .json(error_body("Failed to query RTH records"));
        }
    };

    match rth_map_import::export_csv(&rows) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"rth-kecamatan.csv\"",
            ))
            .body(csv),
        Err(e) => {
            log::error!("Failed to export CSV: {e}");
            HttpResponse::InternalServerError().json(error_body("Failed to export CSV"))
        }
    }
}
