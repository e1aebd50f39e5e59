//! Map renderer: assembles the complete, render-ready description of the
//! map view from the two stores. The client only draws what it is given —
//! colors, tooltips, popups, legend, and summary are all decided here.

use rth_map_geography_models::{DistrictBoundary, EnrichedFeature};
use rth_map_rth_models::RthRecord;
use serde::Serialize;

use crate::{
    engine::MetricsIndex,
    markers::{KECAMATAN_MARKERS, MAP_CENTER},
    matcher::NameMatcher,
    style::{self, ClusterStyle, LegendEntry},
};

pub const DEFAULT_ZOOM: u8 = 12;

/// Polygon stroke/fill parameters for one render state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    pub fill_color: &'static str,
    pub weight: u8,
    pub opacity: f64,
    pub color: &'static str,
    pub dash_array: &'static str,
    pub fill_opacity: f64,
}

impl PolygonStyle {
    const fn base(fill_color: &'static str) -> Self {
        Self {
            fill_color,
            weight: 1,
            opacity: 1.0,
            color: "#333",
            dash_array: "0.5",
            fill_opacity: 0.5,
        }
    }

    const fn highlight(fill_color: &'static str) -> Self {
        Self {
            fill_color,
            weight: 3,
            opacity: 1.0,
            color: "#555",
            dash_array: "",
            fill_opacity: 0.7,
        }
    }
}

/// One district polygon with its resolved styles and hover tooltip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonView {
    #[serde(flatten)]
    pub feature: EnrichedFeature,
    pub style: PolygonStyle,
    pub highlight_style: PolygonStyle,
    pub tooltip: String,
}

/// Popup body for one marker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPopup {
    pub title: String,
    pub subtitle: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PopupMetrics>,
}

/// Metric rows shown inside a marker popup, hectares throughout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupMetrics {
    pub total_rth: f64,
    pub luas_taman: f64,
    pub luas_pemakaman: f64,
    pub luas_kecamatan: f64,
    pub rth_percentage: f64,
    pub cluster_label: &'static str,
    pub cluster_color: &'static str,
}

/// One label marker with its popup, joined to metrics independently of
/// the polygon layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub has_data: bool,
    pub popup: MarkerPopup,
}

/// Counts for the info panel next to the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub total_kecamatan: usize,
    pub with_data: usize,
    pub cluster_0: usize,
    pub cluster_1: usize,
    pub cluster_2: usize,
}

/// The complete render description served to the map client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub polygons: Vec<PolygonView>,
    pub markers: Vec<MarkerView>,
    pub legend: Vec<LegendEntry>,
    pub summary: MapSummary,
}

fn cluster_of(record: &RthRecord) -> ClusterStyle {
    style::style_for(Some(&record.cluster))
}

fn polygon_view(boundary: &DistrictBoundary, matched: Option<&RthRecord>) -> PolygonView {
    let (fill, tooltip) = match matched {
        Some(record) => {
            let style = cluster_of(record);
            (
                style.fill_color,
                format!("{} ({})", boundary.name, style.legend_label),
            )
        }
        None => (
            style::STYLE_UNKNOWN.fill_color,
            format!("{} (Data tidak tersedia)", boundary.name),
        ),
    };
    PolygonView {
        feature: EnrichedFeature::new(boundary, matched.cloned()),
        style: PolygonStyle::base(fill),
        highlight_style: PolygonStyle::highlight(fill),
        tooltip,
    }
}

fn marker_view(
    marker: rth_map_geography_models::MarkerPoint,
    matched: Option<&RthRecord>,
) -> MarkerView {
    let title = format!("Kecamatan {}", marker.name);
    match matched {
        Some(record) => {
            let style = cluster_of(record);
            MarkerView {
                name: marker.name,
                lat: marker.lat,
                lng: marker.lng,
                color: style.marker_color,
                has_data: true,
                popup: MarkerPopup {
                    title,
                    subtitle: "Informasi Ruang Terbuka Hijau",
                    metrics: Some(PopupMetrics {
                        total_rth: record.total_rth,
                        luas_taman: record.luas_taman,
                        luas_pemakaman: record.luas_pemakaman,
                        luas_kecamatan: record.luas_kecamatan,
                        rth_percentage: record.rth_percentage(),
                        cluster_label: style.legend_label,
                        cluster_color: style.marker_color,
                    }),
                },
            }
        }
        None => MarkerView {
            name: marker.name,
            lat: marker.lat,
            lng: marker.lng,
            color: style::STYLE_UNKNOWN.marker_color,
            has_data: false,
            popup: MarkerPopup {
                title,
                subtitle: "Data RTH tidak tersedia",
                metrics: None,
            },
        },
    }
}

/// Builds the full map view. Polygons and markers each join to the
/// metrics on their own, so a district missing a boundary polygon still
/// gets a marker and vice versa.
#[must_use]
pub fn build_map_view(
    boundaries: &[DistrictBoundary],
    metrics: &[RthRecord],
    matcher: &dyn NameMatcher,
) -> MapView {
    let index = MetricsIndex::build(metrics);

    let polygons = boundaries
        .iter()
        .map(|boundary| polygon_view(boundary, index.lookup(matcher, &boundary.name)))
        .collect();

    let markers: Vec<MarkerView> = KECAMATAN_MARKERS
        .iter()
        .map(|marker| marker_view(*marker, index.lookup(matcher, marker.name)))
        .collect();

    let count_cluster = |label: &str| {
        markers
            .iter()
            .filter_map(|m| m.popup.metrics.as_ref())
            .filter(|m| {
                style::style_for(Some(label)).legend_label == m.cluster_label
            })
            .count()
    };
    let summary = MapSummary {
        total_kecamatan: markers.len(),
        with_data: markers.iter().filter(|m| m.has_data).count(),
        cluster_0: count_cluster("cluster_0"),
        cluster_1: count_cluster("cluster_1"),
        cluster_2: count_cluster("cluster_2"),
    };

    MapView {
        center: [MAP_CENTER.0, MAP_CENTER.1],
        zoom: DEFAULT_ZOOM,
        polygons,
        markers,
        legend: style::legend(),
        summary,
    }
}
