#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular projection of RTH records: cluster filter, then name search,
//! then a stable single-column sort. Pure — the caller fetches the rows
//! and serializes the result.

use std::cmp::Ordering;

use rth_map_rth_models::RthRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sortable columns of the RTH table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum SortKey {
    #[serde(rename = "kecamatan")]
    #[strum(serialize = "kecamatan")]
    Kecamatan,
    #[serde(rename = "luas_taman")]
    #[strum(serialize = "luas_taman")]
    LuasTaman,
    #[serde(rename = "luas_pemakaman")]
    #[strum(serialize = "luas_pemakaman")]
    LuasPemakaman,
    #[serde(rename = "total_rth")]
    #[strum(serialize = "total_rth")]
    TotalRth,
    #[serde(rename = "luas_kecamatan")]
    #[strum(serialize = "luas_kecamatan")]
    LuasKecamatan,
    #[serde(rename = "cluster")]
    #[strum(serialize = "cluster")]
    Cluster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ascending")]
    #[strum(serialize = "ascending")]
    Ascending,
    #[serde(rename = "descending")]
    #[strum(serialize = "descending")]
    Descending,
}

/// Filter and sort settings for one table render.
///
/// All fields optional; the default query is the identity projection
/// (every row, insertion order).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableQuery {
    /// Case-insensitive substring match on the kecamatan name.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact cluster label, or `None` / `"all"` for every cluster.
    #[serde(default)]
    pub cluster: Option<String>,
    #[serde(default)]
    pub sort_by: Option<SortKey>,
    #[serde(default)]
    pub order: SortDirection,
}

impl TableQuery {
    fn cluster_filter(&self) -> Option<&str> {
        self.cluster
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "all")
    }
}

fn compare_by(key: SortKey, a: &RthRecord, b: &RthRecord) -> Ordering {
    match key {
        SortKey::Kecamatan => a.kecamatan.to_lowercase().cmp(&b.kecamatan.to_lowercase()),
        SortKey::LuasTaman => a.luas_taman.total_cmp(&b.luas_taman),
        SortKey::LuasPemakaman => a.luas_pemakaman.total_cmp(&b.luas_pemakaman),
        SortKey::TotalRth => a.total_rth.total_cmp(&b.total_rth),
        SortKey::LuasKecamatan => a.luas_kecamatan.total_cmp(&b.luas_kecamatan),
        SortKey::Cluster => a.cluster.cmp(&b.cluster),
    }
}

/// Applies the query to the rows: cluster filter, then search, then a
/// stable sort. Rows that tie keep their input order, so the unsorted
/// view is exactly the input order.
#[must_use]
pub fn project(rows: &[RthRecord], query: &TableQuery) -> Vec<RthRecord> {
    let search = query
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());

    let mut result: Vec<RthRecord> = rows
        .iter()
        .filter(|row| {
            query
                .cluster_filter()
                .is_none_or(|cluster| row.cluster == cluster)
        })
        .filter(|row| {
            search
                .as_deref()
                .is_none_or(|needle| row.kecamatan.to_lowercase().contains(needle))
        })
        .cloned()
        .collect();

    if let Some(key) = query.sort_by {
        result.sort_by(|a, b| {
            let ordering = compare_by(key, a, b);
            match query.order {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kecamatan: &str, cluster: &str, total_rth: f64) -> RthRecord {
        RthRecord {
            id: 0,
            kecamatan: kecamatan.to_string(),
            luas_taman: 0.0,
            luas_pemakaman: 0.0,
            total_rth,
            luas_kecamatan: 100.0,
            cluster: cluster.to_string(),
            tanggal_update: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn names(rows: &[RthRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.kecamatan.as_str()).collect()
    }

    #[test]
    fn default_query_is_identity() {
        let rows = vec![row("Cibiru", "cluster_0", 1.0), row("Andir", "cluster_1", 2.0)];
        let projected = project(&rows, &TableQuery::default());
        assert_eq!(names(&projected), ["Cibiru", "Andir"]);
    }

    #[test]
    fn cluster_filter_is_exact_and_all_means_no_filter() {
        let rows = vec![
            row("Andir", "cluster_0", 1.0),
            row("Cibiru", "cluster_1", 2.0),
            row("Regol", "cluster_0", 3.0),
        ];

        let filtered = project(
            &rows,
            &TableQuery {
                cluster: Some("cluster_0".to_string()),
                ..TableQuery::default()
            },
        );
        assert_eq!(names(&filtered), ["Andir", "Regol"]);

        let all = project(
            &rows,
            &TableQuery {
                cluster: Some("all".to_string()),
                ..TableQuery::default()
            },
        );
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = vec![
            row("Bojongloa Kaler", "cluster_0", 1.0),
            row("Bojongloa Kidul", "cluster_0", 2.0),
            row("Andir", "cluster_0", 3.0),
        ];
        let projected = project(
            &rows,
            &TableQuery {
                search: Some("BOJONG".to_string()),
                ..TableQuery::default()
            },
        );
        assert_eq!(names(&projected), ["Bojongloa Kaler", "Bojongloa Kidul"]);
    }

    #[test]
    fn numeric_sort_descending() {
        let rows = vec![
            row("Andir", "cluster_0", 2.0),
            row("Cibiru", "cluster_0", 9.0),
            row("Regol", "cluster_0", 5.0),
        ];
        let projected = project(
            &rows,
            &TableQuery {
                sort_by: Some(SortKey::TotalRth),
                order: SortDirection::Descending,
                ..TableQuery::default()
            },
        );
        assert_eq!(names(&projected), ["Cibiru", "Regol", "Andir"]);
    }

    #[test]
    fn name_sort_ignores_case_and_is_stable_on_ties() {
        let mut first = row("andir", "cluster_0", 1.0);
        first.luas_taman = 1.0;
        let mut second = row("Andir", "cluster_0", 2.0);
        second.luas_taman = 2.0;
        let rows = vec![row("cibiru", "cluster_0", 0.0), first, second];

        let projected = project(
            &rows,
            &TableQuery {
                sort_by: Some(SortKey::Kecamatan),
                ..TableQuery::default()
            },
        );
        assert_eq!(projected[0].kecamatan, "andir");
        assert_eq!(projected[1].kecamatan, "Andir");
        assert!((projected[0].luas_taman - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn filters_compose_before_sort() {
        let rows = vec![
            row("Bojongloa Kaler", "cluster_0", 5.0),
            row("Bojongloa Kidul", "cluster_1", 1.0),
            row("Buahbatu", "cluster_1", 3.0),
            row("Batununggal", "cluster_1", 2.0),
        ];
        let projected = project(
            &rows,
            &TableQuery {
                search: Some("b".to_string()),
                cluster: Some("cluster_1".to_string()),
                sort_by: Some(SortKey::TotalRth),
                order: SortDirection::Ascending,
            },
        );
        assert_eq!(names(&projected), ["Bojongloa Kidul", "Batununggal", "Buahbatu"]);
    }

    #[test]
    fn sort_key_parses_from_query_string_form() {
        assert_eq!("total_rth".parse::<SortKey>().ok(), Some(SortKey::TotalRth));
        assert!("bogus".parse::<SortKey>().is_err());
    }
}
