//! Queries for boundary and RTH metrics collections.
//!
//! All queries go through `query_raw_params()` / `exec_raw_params()` with
//! `$n` placeholders. Row decoding uses `ToValue` with storage defaults
//! (numeric fields fall back to 0, cluster to `cluster_0`), mirroring the
//! permissive defaults of the source dataset.

use moosicbox_json_utils::database::ToValue as _;
use rth_map_geography_models::DistrictBoundary;
use rth_map_rth_models::{MetricRow, RthRecord};
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Returns all district boundaries in insertion order.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails or a stored
/// geometry is not valid JSON.
pub async fn get_boundaries(db: &dyn Database) -> Result<Vec<DistrictBoundary>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT name, geometry FROM district_boundaries ORDER BY id",
            &[],
        )
        .await?;

    let mut boundaries = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.to_value("name").unwrap_or_default();
        let geometry_json: String = row.to_value("geometry").unwrap_or_default();
        let geometry = serde_json::from_str(&geometry_json).map_err(|e| DbError::Conversion {
            message: format!("Invalid stored geometry for '{name}': {e}"),
        })?;
        boundaries.push(DistrictBoundary { name, geometry });
    }

    Ok(boundaries)
}

/// Replaces the entire boundary collection.
///
/// Boundaries are reference data; the only writer is the seeding path,
/// which always loads a complete dataset.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails or a geometry
/// cannot be serialized.
pub async fn replace_boundaries(
    db: &dyn Database,
    boundaries: &[DistrictBoundary],
) -> Result<u64, DbError> {
    db.exec_raw("DELETE FROM district_boundaries").await?;

    let mut written = 0u64;
    for boundary in boundaries {
        let geometry_json =
            serde_json::to_string(&boundary.geometry).map_err(|e| DbError::Conversion {
                message: format!("Failed to serialize geometry for '{}': {e}", boundary.name),
            })?;
        written += db
            .exec_raw_params(
                "INSERT INTO district_boundaries (name, geometry) VALUES ($1, $2)",
                &[
                    DatabaseValue::String(boundary.name.clone()),
                    DatabaseValue::String(geometry_json),
                ],
            )
            .await?;
    }

    Ok(written)
}

/// Returns all RTH metrics records in insertion order.
///
/// Insertion order matters: the reconciliation join is last-write-wins for
/// duplicate names, so callers must see records in the order they were
/// written.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_rth_records(db: &dyn Database) -> Result<Vec<RthRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, kecamatan, luas_taman, luas_pemakaman, total_rth,
                    luas_kecamatan, cluster, tanggal_update
             FROM rth_kecamatan ORDER BY id",
            &[],
        )
        .await?;

    Ok(rows.iter().map(record_from_row).collect())
}

/// Returns a single RTH record by ID, or `None` if it doesn't exist.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn get_rth_record(db: &dyn Database, id: i64) -> Result<Option<RthRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, kecamatan, luas_taman, luas_pemakaman, total_rth,
                    luas_kecamatan, cluster, tanggal_update
             FROM rth_kecamatan WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    Ok(rows.first().map(record_from_row))
}

/// Inserts a new RTH record and returns its ID.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn insert_rth_record(db: &dyn Database, row: &MetricRow) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO rth_kecamatan (
                kecamatan, luas_taman, luas_pemakaman, total_rth,
                luas_kecamatan, cluster, tanggal_update
             ) VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
            &metric_params(row),
        )
        .await?;

    let db_row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get id from insert".to_string(),
    })?;

    db_row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse inserted id: {e}"),
    })
}

/// Updates an existing RTH record. Returns `false` if no row matched.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn update_rth_record(
    db: &dyn Database,
    id: i64,
    row: &MetricRow,
) -> Result<bool, DbError> {
    let mut params = metric_params(row).to_vec();
    params.push(DatabaseValue::Int64(id));

    let updated = db
        .exec_raw_params(
            "UPDATE rth_kecamatan SET
                kecamatan = $1, luas_taman = $2, luas_pemakaman = $3,
                total_rth = $4, luas_kecamatan = $5, cluster = $6,
                tanggal_update = $7
             WHERE id = $8",
            &params,
        )
        .await?;

    Ok(updated > 0)
}

/// Deletes an RTH record. Returns `false` if no row matched.
///
/// # Errors
///
/// Returns [`DbError`] if the database operation fails.
pub async fn delete_rth_record(db: &dyn Database, id: i64) -> Result<bool, DbError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM rth_kecamatan WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    Ok(deleted > 0)
}

/// Replaces the entire RTH metrics collection with the given rows.
///
/// This is the bulk-import commit: a deliberate full replace, not a merge.
/// Old records are removed first so stale districts don't survive an
/// import that dropped them.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub async fn replace_rth_records(db: &dyn Database, rows: &[MetricRow]) -> Result<u64, DbError> {
    let removed = db.exec_raw_params("DELETE FROM rth_kecamatan", &[]).await?;
    log::info!("Bulk replace: removed {removed} existing RTH records");

    let mut written = 0u64;
    for row in rows {
        written += db
            .exec_raw_params(
                "INSERT INTO rth_kecamatan (
                    kecamatan, luas_taman, luas_pemakaman, total_rth,
                    luas_kecamatan, cluster, tanggal_update
                 ) VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &metric_params(row),
            )
            .await?;
    }

    Ok(written)
}

/// Builds the parameter list shared by insert, update, and bulk replace.
fn metric_params(row: &MetricRow) -> [DatabaseValue; 7] {
    [
        DatabaseValue::String(row.kecamatan.clone()),
        DatabaseValue::Real64(row.luas_taman),
        DatabaseValue::Real64(row.luas_pemakaman),
        DatabaseValue::Real64(row.total_rth),
        DatabaseValue::Real64(row.luas_kecamatan),
        DatabaseValue::String(row.cluster.clone()),
        DatabaseValue::String(crate::now_rfc3339()),
    ]
}

/// Decodes an RTH row with storage defaults for missing fields.
fn record_from_row(row: &switchy_database::Row) -> RthRecord {
    RthRecord {
        id: row.to_value("id").unwrap_or(0),
        kecamatan: row.to_value("kecamatan").unwrap_or_default(),
        luas_taman: row.to_value("luas_taman").unwrap_or(0.0),
        luas_pemakaman: row.to_value("luas_pemakaman").unwrap_or(0.0),
        total_rth: row.to_value("total_rth").unwrap_or(0.0),
        luas_kecamatan: row.to_value("luas_kecamatan").unwrap_or(0.0),
        cluster: row
            .to_value("cluster")
            .unwrap_or_else(|_| "cluster_0".to_string()),
        tanggal_update: row.to_value("tanggal_update").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rth-map-test-{name}-{}.db", std::process::id()))
    }

    async fn open_temp(name: &str) -> Box<dyn Database> {
        let path = temp_db_path(name);
        let _ = std::fs::remove_file(&path);
        crate::open_db(&path).await.expect("open temp db")
    }

    fn sample_row(name: &str, cluster: &str) -> MetricRow {
        MetricRow {
            kecamatan: name.to_string(),
            luas_taman: 12.5,
            luas_pemakaman: 8.75,
            total_rth: 21.25,
            luas_kecamatan: 1650.0,
            cluster: cluster.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_round_trip() {
        let db = open_temp("insert-fetch").await;
        let id = insert_rth_record(db.as_ref(), &sample_row("Andir", "cluster_2"))
            .await
            .unwrap();

        let record = get_rth_record(db.as_ref(), id).await.unwrap().unwrap();
        assert_eq!(record.kecamatan, "Andir");
        assert_eq!(record.cluster, "cluster_2");
        assert!((record.total_rth - 21.25).abs() < f64::EPSILON);
        assert!(!record.tanggal_update.is_empty());
    }

    #[tokio::test]
    async fn bulk_replace_removes_old_records() {
        let db = open_temp("bulk-replace").await;
        insert_rth_record(db.as_ref(), &sample_row("Andir", "cluster_0"))
            .await
            .unwrap();
        insert_rth_record(db.as_ref(), &sample_row("Cibiru", "cluster_1"))
            .await
            .unwrap();

        let written = replace_rth_records(db.as_ref(), &[sample_row("Antapani", "cluster_2")])
            .await
            .unwrap();
        assert_eq!(written, 1);

        let records = get_rth_records(db.as_ref()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kecamatan, "Antapani");
    }

    #[tokio::test]
    async fn update_and_delete_report_row_matches() {
        let db = open_temp("update-delete").await;
        let id = insert_rth_record(db.as_ref(), &sample_row("Regol", "cluster_0"))
            .await
            .unwrap();

        assert!(
            update_rth_record(db.as_ref(), id, &sample_row("Regol", "cluster_1"))
                .await
                .unwrap()
        );
        assert!(
            !update_rth_record(db.as_ref(), id + 999, &sample_row("X", "cluster_0"))
                .await
                .unwrap()
        );

        assert!(delete_rth_record(db.as_ref(), id).await.unwrap());
        assert!(!delete_rth_record(db.as_ref(), id).await.unwrap());
    }

    #[tokio::test]
    async fn boundaries_round_trip_preserves_geometry() {
        let db = open_temp("boundaries").await;
        let boundary = DistrictBoundary {
            name: "Andir".to_string(),
            geometry: serde_json::json!({
                "type": "MultiPolygon",
                "coordinates": [[[[107.57, -6.91], [107.58, -6.91], [107.58, -6.92], [107.57, -6.91]]]],
            }),
        };

        replace_boundaries(db.as_ref(), std::slice::from_ref(&boundary))
            .await
            .unwrap();

        let loaded = get_boundaries(db.as_ref()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Andir");
        assert_eq!(loaded[0].geometry, boundary.geometry);
    }
}
