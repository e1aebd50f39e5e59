#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the rth-map application.
//!
//! Serves the public map data (boundaries, metrics, the reconciled map
//! view) and the admin surface (login, record CRUD, bulk replace,
//! spreadsheet import). All state lives in `SQLite`; the map view is
//! recomputed from the two stores on every request.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use rth_map_auth::AuthConfig;
use rth_map_database::{db_path_from_env, open_db};
use rth_map_import::MAX_IMPORT_BYTES;
use switchy_database::Database;

/// Shared application state.
pub struct AppState {
    /// `SQLite` database holding boundaries, metrics, and admins.
    pub db: Arc<dyn Database>,
    /// Token secret and expiry, resolved once at startup.
    pub auth: AuthConfig,
}

/// Starts the rth-map API server.
///
/// Opens (and if needed creates) the `SQLite` database, resolves the auth
/// config from the environment, and starts the Actix-Web HTTP server.
/// This is a regular async function — the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database cannot be opened.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path = db_path_from_env();
    log::info!("Opening database at {}...", db_path.display());
    let db = open_db(&db_path).await.expect("Failed to open database");

    let state = web::Data::new(AppState {
        db: Arc::from(db),
        auth: AuthConfig::from_env(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            // Spreadsheet uploads arrive as raw bytes; the importer
            // enforces its own 5 MiB cap with a proper error body.
            .app_data(web::PayloadConfig::new(MAX_IMPORT_BYTES + 1024))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/kecamatan/public", web::get().to(handlers::boundaries_public))
                    .route("/rth-kecamatan/public", web::get().to(handlers::rth_public))
                    .route("/map/public", web::get().to(handlers::map_public))
                    .route("/rth-kecamatan/table", web::get().to(handlers::rth_table))
                    .route("/setup/status", web::get().to(handlers::setup_status))
                    .route("/setup/admin", web::post().to(handlers::setup_admin))
                    .route("/auth/login", web::post().to(handlers::login))
                    .route("/auth/profile", web::get().to(handlers::profile))
                    .route("/auth/logout", web::post().to(handlers::logout))
                    .route(
                        "/auth/change-password",
                        web::post().to(handlers::change_password),
                    )
                    .route("/rth-kecamatan", web::get().to(handlers::rth_list))
                    .route("/rth-kecamatan", web::post().to(handlers::rth_create))
                    .route("/rth-kecamatan/bulk", web::post().to(handlers::rth_bulk))
                    .route("/rth-kecamatan/import", web::post().to(handlers::rth_import))
                    .route("/rth-kecamatan/export", web::get().to(handlers::rth_export))
                    .route("/rth-kecamatan/{id}", web::put().to(handlers::rth_update))
                    .route("/rth-kecamatan/{id}", web::delete().to(handlers::rth_delete)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
