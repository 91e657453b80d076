//! Chart inputs derived from one filtered view.

use crate::stats::{DashboardSummary, FilteredView, HistogramBin, StatsCalculator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output settings for the static charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    /// Also draw rating against review volume
    pub review_volume: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("charts"),
            width: 1000,
            height: 500,
            histogram_bins: 40,
            review_volume: false,
        }
    }
}

/// Series for every chart of the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub price_histogram: Vec<HistogramBin>,
    pub mean_discount_by_brand: Vec<(String, f64)>,
    pub price_vs_rating: Vec<(f64, f64)>,
    pub count_by_brand: Vec<(String, f64)>,
    pub reviews_vs_rating: Vec<(f64, f64)>,
}

impl ChartData {
    pub fn build(view: &FilteredView<'_>, summary: &DashboardSummary, bins: usize) -> Self {
        let prices: Vec<f64> = view.records.iter().map(|p| p.discount_price).collect();

        Self {
            price_histogram: StatsCalculator::histogram(&prices, bins),
            mean_discount_by_brand: summary
                .mean_discount_by_brand
                .iter()
                .map(|m| (m.brand.clone(), m.mean_discount))
                .collect(),
            price_vs_rating: view
                .records
                .iter()
                .map(|p| (p.discount_price, p.rating))
                .collect(),
            count_by_brand: summary
                .count_by_brand
                .iter()
                .map(|c| (c.brand.clone(), c.count as f64))
                .collect(),
            reviews_vs_rating: view
                .records
                .iter()
                .filter_map(|p| p.no_of_ratings.map(|n| (n as f64, p.rating)))
                .collect(),
        }
    }
}
