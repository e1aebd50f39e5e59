//! Reconciliation engine: joins boundary geometries to RTH metrics by
//! district name. Pure and stateless — the join is recomputed from the
//! two stores on every call, never persisted.

use rth_map_geography_models::{DistrictBoundary, EnrichedFeature, EnrichedFeatureCollection};
use rth_map_rth_models::RthRecord;

use crate::{matcher::NameMatcher, normalize::normalize};

/// Metrics keyed by normalized district name.
///
/// Built once per join. Keys keep first-occurrence order (the matcher's
/// substring fallback is order-dependent), while a repeated name
/// overwrites the earlier record in place — last write wins.
#[derive(Debug, Clone, Default)]
pub struct MetricsIndex {
    keys: Vec<String>,
    records: Vec<RthRecord>,
}

impl MetricsIndex {
    #[must_use]
    pub fn build(metrics: &[RthRecord]) -> Self {
        let mut index = Self::default();
        for record in metrics {
            let key = normalize(&record.kecamatan);
            if let Some(pos) = index.keys.iter().position(|k| *k == key) {
                index.records[pos] = record.clone();
            } else {
                index.keys.push(key);
                index.records.push(record.clone());
            }
        }
        index
    }

    /// Looks up the record for a raw (un-normalized) district name.
    #[must_use]
    pub fn lookup(&self, matcher: &dyn NameMatcher, raw_name: &str) -> Option<&RthRecord> {
        let target = normalize(raw_name);
        matcher
            .find(&target, &self.keys)
            .map(|idx| &self.records[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Joins every boundary to its metrics record, producing exactly one
/// enriched feature per boundary, in boundary input order. Boundaries
/// with no matching record come back with `has_rth_data == false` and
/// are never dropped.
#[must_use]
pub fn reconcile(
    boundaries: &[DistrictBoundary],
    metrics: &[RthRecord],
    matcher: &dyn NameMatcher,
) -> EnrichedFeatureCollection {
    let index = MetricsIndex::build(metrics);
    let features = boundaries
        .iter()
        .map(|boundary| {
            let matched = index.lookup(matcher, &boundary.name).cloned();
            EnrichedFeature::new(boundary, matched)
        })
        .collect();
    EnrichedFeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::matcher::TwoPhaseMatcher;

    fn boundary(name: &str) -> DistrictBoundary {
        DistrictBoundary {
            name: name.to_string(),
            geometry: json!({"type": "MultiPolygon", "coordinates": []}),
        }
    }

    fn record(name: &str, total_rth: f64) -> RthRecord {
        RthRecord {
            id: 0,
            kecamatan: name.to_string(),
            luas_taman: 0.0,
            luas_pemakaman: 0.0,
            total_rth,
            luas_kecamatan: 100.0,
            cluster: "cluster_1".to_string(),
            tanggal_update: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn every_boundary_yields_one_feature_in_order() {
        let boundaries = vec![boundary("Andir"), boundary("Antapani"), boundary("Cibiru")];
        let metrics = vec![record("ANDIR", 12.0)];
        let collection = reconcile(&boundaries, &metrics, &TwoPhaseMatcher);

        assert_eq!(collection.collection_type, "FeatureCollection");
        assert_eq!(collection.features.len(), 3);
        assert_eq!(collection.features[0].properties.name, "Andir");
        assert!(collection.features[0].properties.has_rth_data);
        assert_eq!(collection.features[1].properties.name, "Antapani");
        assert!(!collection.features[1].properties.has_rth_data);
        assert!(!collection.features[2].properties.has_rth_data);
    }

    #[test]
    fn join_is_case_and_whitespace_insensitive() {
        let boundaries = vec![boundary("  sukaJADI ")];
        let metrics = vec![record("Sukajadi", 3.5)];
        let collection = reconcile(&boundaries, &metrics, &TwoPhaseMatcher);

        let matched = collection.features[0].properties.rth_data.as_ref();
        assert_eq!(matched.map(|r| r.total_rth), Some(3.5));
    }

    #[test]
    fn duplicate_metric_names_are_last_write_wins() {
        let metrics = vec![record("Andir", 1.0), record("andir", 9.0)];
        let index = MetricsIndex::build(&metrics);

        assert_eq!(index.len(), 1);
        let found = index.lookup(&TwoPhaseMatcher, "Andir");
        assert_eq!(found.map(|r| r.total_rth), Some(9.0));
    }

    #[test]
    fn aliased_boundary_name_joins_renamed_metric() {
        let boundaries = vec![boundary("Ujung Berung")];
        let metrics = vec![record("Ujungberung", 7.0)];
        let collection = reconcile(&boundaries, &metrics, &TwoPhaseMatcher);

        assert!(collection.features[0].properties.has_rth_data);
    }

    #[test]
    fn empty_metrics_still_renders_all_boundaries() {
        let boundaries = vec![boundary("Andir"), boundary("Cibiru")];
        let collection = reconcile(&boundaries, &[], &TwoPhaseMatcher);

        assert_eq!(collection.features.len(), 2);
        assert!(collection.features.iter().all(|f| !f.properties.has_rth_data));
    }
}
