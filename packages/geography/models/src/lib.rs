#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Kecamatan boundary and enriched map feature types.
//!
//! A kecamatan is both a geometry (administrative boundary polygon) and a
//! metrics record; these types cover the geometry side and the derived
//! feature produced by joining the two. Geometry is carried as a parsed
//! `GeoJSON` geometry object (`serde_json::Value`) rather than typed
//! coordinates — the server never inspects coordinates, it only passes
//! them through to the map client.

use rth_map_rth_models::RthRecord;
use serde::{Deserialize, Serialize};

/// An administrative boundary for one kecamatan.
///
/// Immutable reference data, written only by the boundary seeding path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictBoundary {
    /// Kecamatan name as recorded in the boundary dataset.
    pub name: String,
    /// `GeoJSON` geometry object (`MultiPolygon` in practice).
    pub geometry: serde_json::Value,
}

/// Per-feature properties of an [`EnrichedFeature`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProperties {
    /// Kecamatan name from the boundary dataset.
    pub name: String,
    /// Matched metrics record, or `None` when no record joined.
    pub rth_data: Option<RthRecord>,
    /// Whether `rth_data` is present.
    pub has_rth_data: bool,
}

/// A boundary feature enriched with its matched RTH metrics.
///
/// Derived and ephemeral — recomputed on every fetch, never stored. The
/// reconciliation engine guarantees exactly one enriched feature per input
/// boundary, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedFeature {
    /// Always `"Feature"`.
    #[serde(rename = "type")]
    pub feature_type: String,
    /// `GeoJSON` geometry carried over from the boundary.
    pub geometry: serde_json::Value,
    /// Name, metrics, and join status.
    pub properties: EnrichedProperties,
}

impl EnrichedFeature {
    /// Builds a feature from a boundary and an optional matched record.
    #[must_use]
    pub fn new(boundary: &DistrictBoundary, metrics: Option<RthRecord>) -> Self {
        Self {
            feature_type: "Feature".to_string(),
            geometry: boundary.geometry.clone(),
            properties: EnrichedProperties {
                name: boundary.name.clone(),
                has_rth_data: metrics.is_some(),
                rth_data: metrics,
            },
        }
    }
}

/// A `GeoJSON` `FeatureCollection` of enriched features, as served to the
/// map client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedFeatureCollection {
    /// Always `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub collection_type: String,
    /// One feature per boundary.
    pub features: Vec<EnrichedFeature>,
}

impl EnrichedFeatureCollection {
    /// Wraps features into a collection.
    #[must_use]
    pub fn new(features: Vec<EnrichedFeature>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// A static label point for one kecamatan, used for the marker layer.
///
/// Markers are a fixed list, independent of the boundary geometries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerPoint {
    /// Kecamatan name.
    pub name: &'static str,
    /// Latitude of the label point.
    pub lat: f64,
    /// Longitude of the label point.
    pub lng: f64,
}
