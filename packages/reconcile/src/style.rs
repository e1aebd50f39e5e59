//! Classification-to-style mapping. Every cluster label, including an
//! absent or unrecognized one, resolves to a concrete style so the map
//! never renders an unstyled district.

use rth_map_rth_models::Cluster;
use serde::Serialize;

/// Visual treatment for one cluster classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStyle {
    /// Polygon fill, hex RGB.
    pub fill_color: &'static str,
    /// Marker tint for the point layer.
    pub marker_color: &'static str,
    /// Human-readable label shown in popups and the legend.
    pub legend_label: &'static str,
}

pub const STYLE_CLUSTER_0: ClusterStyle = ClusterStyle {
    fill_color: "#E53E3E",
    marker_color: "red",
    legend_label: "Cluster 0 (RTH Rendah)",
};

pub const STYLE_CLUSTER_1: ClusterStyle = ClusterStyle {
    fill_color: "#F6E05E",
    marker_color: "orange",
    legend_label: "Cluster 1 (RTH Menengah)",
};

pub const STYLE_CLUSTER_2: ClusterStyle = ClusterStyle {
    fill_color: "#38A169",
    marker_color: "green",
    legend_label: "Cluster 2 (RTH Tinggi)",
};

/// Fallback for districts with no metrics or an unrecognized label.
pub const STYLE_UNKNOWN: ClusterStyle = ClusterStyle {
    fill_color: "#CCCCCC",
    marker_color: "gray",
    legend_label: "Tidak diketahui",
};

/// Maps a raw cluster label to its style. Total: `None` and anything
/// that is not one of the known labels both land on [`STYLE_UNKNOWN`].
#[must_use]
pub fn style_for(cluster: Option<&str>) -> ClusterStyle {
    match cluster.and_then(Cluster::parse_lossy) {
        Some(Cluster::Cluster0) => STYLE_CLUSTER_0,
        Some(Cluster::Cluster1) => STYLE_CLUSTER_1,
        Some(Cluster::Cluster2) => STYLE_CLUSTER_2,
        None => STYLE_UNKNOWN,
    }
}

/// One row of the map legend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: &'static str,
}

/// The full legend: the three clusters in order, then the no-data entry.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    [STYLE_CLUSTER_0, STYLE_CLUSTER_1, STYLE_CLUSTER_2, STYLE_UNKNOWN]
        .into_iter()
        .map(|style| LegendEntry {
            color: style.fill_color,
            label: style.legend_label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_clusters_map_to_their_colors() {
        assert_eq!(style_for(Some("cluster_0")).fill_color, "#E53E3E");
        assert_eq!(style_for(Some("cluster_1")).fill_color, "#F6E05E");
        assert_eq!(style_for(Some("cluster_2")).fill_color, "#38A169");
    }

    #[test]
    fn missing_and_unrecognized_fall_back_to_gray() {
        assert_eq!(style_for(None), STYLE_UNKNOWN);
        assert_eq!(style_for(Some("cluster_9")), STYLE_UNKNOWN);
        assert_eq!(style_for(Some("")), STYLE_UNKNOWN);
    }

    #[test]
    fn legend_lists_clusters_then_unknown() {
        let legend = legend();
        assert_eq!(legend.len(), 4);
        assert_eq!(legend[0].label, "Cluster 0 (RTH Rendah)");
        assert_eq!(legend[3].label, "Tidak diketahui");
    }
}
