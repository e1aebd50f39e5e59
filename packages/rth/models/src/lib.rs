#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Green open space (RTH) metric types.
//!
//! This crate defines the canonical per-kecamatan RTH metrics record used
//! across the rth-map system, plus the precomputed cluster classification
//! that drives the map coloring. Field names follow the source dataset
//! (hectare areas, Indonesian column names) so spreadsheet imports and API
//! payloads stay 1:1 with the published data.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Precomputed green-space classification for a kecamatan.
///
/// The cluster labels come from an upstream k-means run over the RTH
/// metrics; this system only consumes them. `Cluster0` is the storage
/// default for rows imported without a cluster column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Cluster {
    /// Low green-space share.
    #[serde(rename = "cluster_0")]
    #[strum(serialize = "cluster_0")]
    Cluster0,
    /// Medium green-space share.
    #[serde(rename = "cluster_1")]
    #[strum(serialize = "cluster_1")]
    Cluster1,
    /// High green-space share.
    #[serde(rename = "cluster_2")]
    #[strum(serialize = "cluster_2")]
    Cluster2,
}

impl Cluster {
    /// All known clusters, lowest green-space share first.
    pub const ALL: &[Self] = &[Self::Cluster0, Self::Cluster1, Self::Cluster2];

    /// Parses a raw cluster string, returning `None` for anything
    /// unrecognized (including the empty string).
    ///
    /// Storage keeps the raw string untouched; this is only used where a
    /// typed cluster is needed (styling, filtering).
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl Default for Cluster {
    fn default() -> Self {
        Self::Cluster0
    }
}

/// A per-kecamatan RTH metrics record as stored in the database.
///
/// One record per kecamatan is the intent, but duplicates are not enforced;
/// the reconciliation join resolves them last-write-wins. All areas are in
/// hectares. The `cluster` field is a raw string so unrecognized labels
/// survive a round trip through the API (they classify as "unknown" for
/// styling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RthRecord {
    /// Database row ID.
    pub id: i64,
    /// Kecamatan (district) name as entered.
    pub kecamatan: String,
    /// Park area (ha).
    pub luas_taman: f64,
    /// Cemetery green area (ha).
    pub luas_pemakaman: f64,
    /// Total green open space area (ha).
    pub total_rth: f64,
    /// Total district area (ha).
    pub luas_kecamatan: f64,
    /// Cluster label, e.g. `cluster_0`.
    pub cluster: String,
    /// When the record was last written (RFC 3339).
    pub tanggal_update: String,
}

impl RthRecord {
    /// Green-space percentage of the district area.
    ///
    /// Returns 0 when the district area is 0 so a missing denominator never
    /// produces `NaN` or infinity.
    #[must_use]
    pub fn rth_percentage(&self) -> f64 {
        if self.luas_kecamatan > 0.0 {
            self.total_rth / self.luas_kecamatan * 100.0
        } else {
            0.0
        }
    }
}

/// A candidate metrics row as produced by the bulk importer or accepted by
/// the bulk-replace endpoint, before it has a database identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    /// Kecamatan (district) name.
    pub kecamatan: String,
    /// Park area (ha).
    #[serde(default)]
    pub luas_taman: f64,
    /// Cemetery green area (ha).
    #[serde(default)]
    pub luas_pemakaman: f64,
    /// Total green open space area (ha).
    #[serde(default)]
    pub total_rth: f64,
    /// Total district area (ha).
    #[serde(default)]
    pub luas_kecamatan: f64,
    /// Cluster label; defaults to `cluster_0` when absent.
    #[serde(default = "default_cluster")]
    pub cluster: String,
}

fn default_cluster() -> String {
    Cluster::Cluster0.to_string()
}

impl MetricRow {
    /// An empty row with the storage defaults applied.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kecamatan: String::new(),
            luas_taman: 0.0,
            luas_pemakaman: 0.0,
            total_rth: 0.0,
            luas_kecamatan: 0.0,
            cluster: default_cluster(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_round_trips_through_strum() {
        assert_eq!(Cluster::Cluster1.to_string(), "cluster_1");
        assert_eq!(Cluster::parse_lossy("cluster_1"), Some(Cluster::Cluster1));
    }

    #[test]
    fn unknown_cluster_parses_to_none() {
        assert_eq!(Cluster::parse_lossy("cluster_9"), None);
        assert_eq!(Cluster::parse_lossy(""), None);
    }

    #[test]
    fn percentage_guards_zero_district_area() {
        let record = RthRecord {
            id: 1,
            kecamatan: "Andir".to_string(),
            luas_taman: 5.0,
            luas_pemakaman: 5.0,
            total_rth: 10.0,
            luas_kecamatan: 0.0,
            cluster: "cluster_0".to_string(),
            tanggal_update: String::new(),
        };
        assert!((record.rth_percentage() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_computes_share() {
        let record = RthRecord {
            id: 1,
            kecamatan: "Andir".to_string(),
            luas_taman: 12.5,
            luas_pemakaman: 8.75,
            total_rth: 21.25,
            luas_kecamatan: 1650.0,
            cluster: "cluster_2".to_string(),
            tanggal_update: String::new(),
        };
        assert!((record.rth_percentage() - 1.287_878_787_878_788).abs() < 1e-9);
    }

    #[test]
    fn metric_row_defaults_cluster_when_absent() {
        let row: MetricRow = serde_json::from_str(r#"{"kecamatan":"Cibiru"}"#).unwrap();
        assert_eq!(row.cluster, "cluster_0");
        assert!((row.total_rth - 0.0).abs() < f64::EPSILON);
    }
}
