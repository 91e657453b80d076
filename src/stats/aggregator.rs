//! Aggregator Module
//! Groupwise brand aggregates and summary statistics for a filtered view.

use super::calculator::{Correlation, DescriptiveStats, StatsCalculator};
use super::filter::FilteredView;
use crate::data::CleanedDataset;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandMean {
    pub brand: String,
    pub mean_discount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: usize,
}

/// Everything the presentation layer needs for one interaction.
///
/// Counts and descriptive statistics cover the whole filtered view; the two
/// brand series cover only its brand-scoped subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub count_total: usize,
    pub price_matched: usize,
    /// Distinct brands in the unfiltered dataset.
    pub brand_count: usize,
    pub brands_shown: usize,
    pub mean_discount_by_brand: Vec<BrandMean>,
    pub count_by_brand: Vec<BrandCount>,
    pub price: Option<DescriptiveStats>,
    pub rating: Option<DescriptiveStats>,
    pub discount: Option<DescriptiveStats>,
    pub price_rating_correlation: Option<Correlation>,
}

pub struct Aggregator;

impl Aggregator {
    pub fn summarize(dataset: &CleanedDataset, view: &FilteredView<'_>) -> DashboardSummary {
        let count_by_brand = Self::count_by_brand(view);
        let prices: Vec<f64> = view.records.iter().map(|p| p.discount_price).collect();
        let ratings: Vec<f64> = view.records.iter().map(|p| p.rating).collect();
        let discounts: Vec<f64> = view
            .records
            .iter()
            .map(|p| p.discount_percentage)
            .collect();

        DashboardSummary {
            count_total: view.len(),
            price_matched: view.price_matched,
            brand_count: dataset.brand_count(),
            brands_shown: count_by_brand.len(),
            mean_discount_by_brand: Self::mean_discount_by_brand(view),
            count_by_brand,
            price: StatsCalculator::compute_descriptive_stats(&prices),
            rating: StatsCalculator::compute_descriptive_stats(&ratings),
            discount: StatsCalculator::compute_descriptive_stats(&discounts),
            price_rating_correlation: StatsCalculator::pearson(&prices, &ratings),
        }
    }

    /// Mean discount percentage per brand, highest first; ties by brand name.
    pub fn mean_discount_by_brand(view: &FilteredView<'_>) -> Vec<BrandMean> {
        let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
        for p in &view.brand_records {
            let Some(brand) = p.brand.as_deref() else {
                continue;
            };
            groups.entry(brand).or_default().push(p.discount_percentage);
        }

        let mut means: Vec<BrandMean> = groups
            .into_iter()
            .filter_map(|(brand, values)| {
                Some(BrandMean {
                    brand: brand.to_string(),
                    mean_discount: StatsCalculator::mean(&values)?,
                    count: values.len(),
                })
            })
            .collect();

        means.sort_by(|a, b| {
            b.mean_discount
                .total_cmp(&a.mean_discount)
                .then_with(|| a.brand.cmp(&b.brand))
        });
        means
    }

    /// Records per brand, most first; ties keep first appearance in the view.
    pub fn count_by_brand(view: &FilteredView<'_>) -> Vec<BrandCount> {
        let mut counts: Vec<BrandCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for brand in view.brand_records.iter().filter_map(|p| p.brand.as_deref()) {
            match index.get(brand) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(brand, counts.len());
                    counts.push(BrandCount {
                        brand: brand.to_string(),
                        count: 1,
                    });
                }
            }
        }

        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }
}
