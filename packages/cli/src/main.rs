#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ops CLI for the rth-map backend.
//!
//! Covers everything an operator does outside the HTTP surface: starting
//! the server, creating admin accounts, seeding the boundary store from a
//! `GeoJSON` file, and importing/exporting the metrics dataset.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Password};
use geojson::GeoJson;
use rth_map_database::{db_path_from_env, open_db, queries};
use rth_map_geography_models::DistrictBoundary;

#[derive(Parser)]
#[command(name = "rth-map", about = "RTH map backend toolchain", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server.
    Serve,
    /// Create an admin account (prompts for the password).
    CreateAdmin {
        /// Username for the new account.
        #[arg(long)]
        username: String,
        /// Email address, optional.
        #[arg(long)]
        email: Option<String>,
        /// Grant the super_admin role instead of admin.
        #[arg(long = "super")]
        super_admin: bool,
    },
    /// Replace the boundary store with features from a GeoJSON file.
    SeedBoundaries {
        /// Path to a GeoJSON FeatureCollection of kecamatan boundaries.
        file: PathBuf,
    },
    /// Replace the metrics store with rows from a spreadsheet (CSV/XLSX).
    Import {
        /// Path to the spreadsheet.
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Export the metrics store to a CSV file.
    Export {
        /// Destination path.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if matches!(cli.command, Command::Serve) {
        // run_server installs the logger itself; the actix runtime must
        // not be nested inside this tokio runtime.
        return Ok(tokio::task::spawn_blocking(|| {
            actix_web::rt::System::new().block_on(rth_map_server::run_server())
        })
        .await??);
    }

    pretty_env_logger::init_custom_env("RUST_LOG");

    match cli.command {
        Command::Serve => unreachable!(),
        Command::CreateAdmin {
            username,
            email,
            super_admin,
        } => create_admin(&username, email, super_admin).await?,
        Command::SeedBoundaries { file } => seed_boundaries(&file).await?,
        Command::Import { file, yes } => import(&file, yes).await?,
        Command::Export { file } => export(&file).await?,
    }

    Ok(())
}

async fn create_admin(
    username: &str,
    email: Option<String>,
    super_admin: bool,
) -> Result<(), Box<dyn Error>> {
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let db = open_db(&db_path_from_env()).await?;
    let role = if super_admin { "super_admin" } else { "admin" };
    let account = rth_map_auth::create_admin(db.as_ref(), username, &password, email, role).await?;

    println!("Created admin '{}' (role {})", account.username, account.role);
    Ok(())
}

async fn seed_boundaries(file: &PathBuf) -> Result<(), Box<dyn Error>> {
    let raw = std::fs::read_to_string(file)?;
    let GeoJson::FeatureCollection(collection) = raw.parse::<GeoJson>()? else {
        return Err("expected a GeoJSON FeatureCollection".into());
    };

    let mut boundaries = Vec::new();
    for feature in collection.features {
        let Some(name) = feature
            .property("name")
            .or_else(|| feature.property("kecamatan"))
            .and_then(serde_json::Value::as_str)
        else {
            log::warn!("Skipping feature without a name property");
            continue;
        };
        let Some(geometry) = feature.geometry.as_ref() else {
            log::warn!("Skipping feature '{name}' without geometry");
            continue;
        };

        boundaries.push(DistrictBoundary {
            name: name.to_string(),
            geometry: serde_json::to_value(geometry)?,
        });
    }

    if boundaries.is_empty() {
        return Err("no named features found in the file".into());
    }

    let db = open_db(&db_path_from_env()).await?;
    queries::replace_boundaries(db.as_ref(), &boundaries).await?;

    println!("Seeded {} kecamatan boundaries", boundaries.len());
    Ok(())
}

async fn import(file: &PathBuf, yes: bool) -> Result<(), Box<dyn Error>> {
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("invalid file name")?;
    let bytes = std::fs::read(file)?;

    let rows = rth_map_import::parse_spreadsheet(&bytes, filename)?;
    let (valid, skipped) = rth_map_import::validate(&rows)?;

    if skipped > 0 {
        log::warn!("{skipped} baris diabaikan karena tidak memiliki nama kecamatan");
    }

    if !yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Replace the entire RTH dataset with {} rows from '{filename}'?",
                valid.len()
            ))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Aborted");
            return Ok(());
        }
    }

    let db = open_db(&db_path_from_env()).await?;
    let removed = queries::replace_rth_records(db.as_ref(), &valid).await?;

    println!(
        "Imported {} rows ({} replaced, {} skipped)",
        valid.len(),
        removed,
        skipped
    );
    Ok(())
}

async fn export(file: &PathBuf) -> Result<(), Box<dyn Error>> {
    let db = open_db(&db_path_from_env()).await?;
    let rows = queries::get_rth_records(db.as_ref()).await?;
    let csv = rth_map_import::export_csv(&rows)?;
    std::fs::write(file, csv)?;

    println!("Exported {} rows to {}", rows.len(), file.display());
    Ok(())
}
