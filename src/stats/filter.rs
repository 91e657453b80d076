//! Filter Module
//! Price-range and brand-scope predicates over a cleaned dataset.

use crate::data::{CleanedDataset, Product};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of brands kept by the top-brands profile.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid price range: {min} to {max}")]
    InvalidPriceRange { min: f64, max: f64 },
}

/// Inclusive bounds on discount price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, FilterError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(FilterError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The floored observed range of the dataset, `(0, 0)` when it is empty.
    pub fn full(dataset: &CleanedDataset) -> Self {
        let (min, max) = dataset.price_bounds().unwrap_or((0.0, 0.0));
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Which brands survive the brand stage.
#[derive(Debug, Clone, PartialEq)]
pub enum BrandScope {
    All,
    Selected(BTreeSet<String>),
    /// The N most frequent brands of the price-filtered view.
    TopN(usize),
}

/// The two filter profiles the dashboard ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilterProfile {
    /// Restrict brand charts to the most frequent brands
    #[default]
    TopBrands,
    /// Free-form brand allow-list
    BrandSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub price_range: PriceRange,
    pub brands: BrandScope,
}

impl FilterParams {
    pub fn defaults(dataset: &CleanedDataset, profile: FilterProfile) -> Self {
        let brands = match profile {
            FilterProfile::TopBrands => BrandScope::TopN(DEFAULT_TOP_N),
            FilterProfile::BrandSelection => BrandScope::All,
        };
        Self {
            price_range: PriceRange::full(dataset),
            brands,
        }
    }
}

/// A borrowed subset of the cleaned dataset.
///
/// `records` feeds the product count and the price charts. `brand_records` feeds
/// the brand charts; it differs from `records` only under [`BrandScope::TopN`],
/// where the brand cut applies to brand-scoped output alone.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    pub records: Vec<&'a Product>,
    pub brand_records: Vec<&'a Product>,
    /// Records inside the price range, before the brand stage.
    pub price_matched: usize,
    /// The effective brand set, in ranking or first-appearance order.
    pub brands: Vec<String>,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Apply `params` to `dataset`. Pure: the dataset is only read.
pub fn apply_filters<'a>(
    dataset: &'a CleanedDataset,
    params: &FilterParams,
) -> Result<FilteredView<'a>, FilterError> {
    let range = PriceRange::new(params.price_range.min, params.price_range.max)?;

    let in_range: Vec<&Product> = dataset
        .products()
        .iter()
        .filter(|p| range.contains(p.discount_price))
        .collect();

    let brands = match &params.brands {
        BrandScope::All => dataset.brands(),
        BrandScope::Selected(selection) => {
            let known: HashSet<String> = dataset.brands().into_iter().collect();
            for unknown in selection.iter().filter(|b| !known.contains(*b)) {
                warn!(brand = %unknown, "Selected brand not present in dataset");
            }
            selection.iter().cloned().collect()
        }
        BrandScope::TopN(n) => top_brands(&in_range, *n),
    };

    let allowed: HashSet<&str> = brands.iter().map(String::as_str).collect();
    let brand_records: Vec<&Product> = in_range
        .iter()
        .copied()
        .filter(|p| p.brand.as_deref().is_some_and(|b| allowed.contains(b)))
        .collect();

    let price_matched = in_range.len();
    let records = match params.brands {
        BrandScope::TopN(_) => in_range,
        _ => brand_records.clone(),
    };

    debug!(
        min = range.min,
        max = range.max,
        price_matched,
        retained = records.len(),
        brand_scoped = brand_records.len(),
        "Applied filters"
    );

    Ok(FilteredView {
        records,
        brand_records,
        price_matched,
        brands,
    })
}

/// The `n` most frequent brands, most frequent first; ties keep first appearance.
pub fn top_brands(records: &[&Product], n: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for brand in records.iter().filter_map(|p| p.brand.as_deref()) {
        let count = counts.entry(brand).or_insert(0);
        if *count == 0 {
            order.push(brand);
        }
        *count += 1;
    }

    // sort_by is stable, so equal counts stay in first-appearance order
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(n).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{raw, DataCleaner};
    use std::path::Path;

    fn dataset() -> CleanedDataset {
        let rows = vec![
            raw(0, "Acme", "₹200", "₹100", "4.0", "10"),
            raw(1, "Brio", "₹200", "₹150", "3.0", "10"),
            raw(2, "Brio", "₹400", "₹300", "4.5", "10"),
            raw(3, "Cora", "₹500", "₹500", "2.0", "10"),
            raw(4, "Acme", "₹900", "₹450", "4.8", "10"),
            raw(5, "Dune", "₹60", "₹50", "3.3", "10"),
            raw(6, "Brio", "₹100", "₹90", "3.9", "10"),
        ];
        DataCleaner::default().clean(Path::new("products.csv"), &rows)
    }

    fn rows(view: &FilteredView<'_>) -> Vec<usize> {
        view.records.iter().map(|p| p.row).collect()
    }

    fn brand_rows(view: &FilteredView<'_>) -> Vec<usize> {
        view.brand_records.iter().map(|p| p.row).collect()
    }

    #[test]
    fn test_default_range_covers_dataset() {
        let ds = dataset();
        let params = FilterParams::defaults(&ds, FilterProfile::BrandSelection);

        assert_eq!(params.price_range, PriceRange { min: 50.0, max: 500.0 });
        let view = apply_filters(&ds, &params).expect("filter");
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.brands, vec!["Acme", "Brio", "Cora", "Dune"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let ds = dataset();
        let params = FilterParams {
            price_range: PriceRange::new(100.0, 300.0).expect("range"),
            brands: BrandScope::All,
        };

        let view = apply_filters(&ds, &params).expect("filter");
        assert_eq!(rows(&view), vec![0, 1, 2]);
    }

    #[test]
    fn test_selected_brands() {
        let ds = dataset();
        let params = FilterParams {
            price_range: PriceRange::full(&ds),
            brands: BrandScope::Selected(
                ["Brio".to_string(), "Zeta".to_string()].into_iter().collect(),
            ),
        };

        let view = apply_filters(&ds, &params).expect("filter");
        assert_eq!(rows(&view), vec![1, 2, 6]);
        assert_eq!(brand_rows(&view), rows(&view));
        assert_eq!(view.price_matched, 7);
    }

    #[test]
    fn test_top_n_uses_price_filtered_counts() {
        let ds = dataset();
        // Rows 2 to 4 fall outside, leaving Brio as the only brand with two records
        let params = FilterParams {
            price_range: PriceRange::new(0.0, 299.0).expect("range"),
            brands: BrandScope::TopN(1),
        };
        let view = apply_filters(&ds, &params).expect("filter");
        assert_eq!(view.price_matched, 4);
        assert_eq!(view.brands, vec!["Brio"]);
        assert_eq!(brand_rows(&view), vec![1, 6]);
        // The top-N cut leaves the general view untouched
        assert_eq!(rows(&view), vec![0, 1, 5, 6]);

        let params = FilterParams {
            price_range: PriceRange::new(0.0, 460.0).expect("range"),
            brands: BrandScope::TopN(2),
        };
        let view = apply_filters(&ds, &params).expect("filter");
        assert_eq!(view.brands, vec!["Brio", "Acme"]);
        assert_eq!(brand_rows(&view), vec![0, 1, 2, 4, 6]);
        assert_eq!(view.len(), view.price_matched);
    }

    #[test]
    fn test_top_n_size_and_ties() {
        let ds = dataset();
        let all: Vec<&Product> = ds.products().iter().collect();

        assert_eq!(top_brands(&all, 2), vec!["Brio", "Acme"]);
        assert_eq!(top_brands(&all, 3), vec!["Brio", "Acme", "Cora"]);
        assert_eq!(top_brands(&all, 50).len(), ds.brand_count());
        assert!(top_brands(&all, 0).is_empty());
        assert!(top_brands(&[], 5).is_empty());
    }

    #[test]
    fn test_empty_range_yields_empty_view() {
        let ds = dataset();
        let params = FilterParams {
            price_range: PriceRange::new(10_000.0, 20_000.0).expect("range"),
            brands: BrandScope::TopN(5),
        };

        let view = apply_filters(&ds, &params).expect("filter");
        assert!(view.is_empty());
        assert_eq!(view.price_matched, 0);
        assert!(view.brands.is_empty());
    }

    #[test]
    fn test_degenerate_range_and_purity() {
        let ds = dataset();
        let params = FilterParams {
            price_range: PriceRange::new(150.0, 150.0).expect("range"),
            brands: BrandScope::All,
        };

        let first = apply_filters(&ds, &params).expect("filter");
        let second = apply_filters(&ds, &params).expect("filter");
        assert_eq!(rows(&first), vec![1]);
        assert_eq!(rows(&first), rows(&second));
        assert_eq!(first.brands, second.brands);
    }

    #[test]
    fn test_invalid_range_is_rejected() {
        assert_eq!(
            PriceRange::new(10.0, 5.0),
            Err(FilterError::InvalidPriceRange { min: 10.0, max: 5.0 })
        );
        assert!(PriceRange::new(f64::NAN, 5.0).is_err());

        let ds = dataset();
        let params = FilterParams {
            price_range: PriceRange { min: 9.0, max: 1.0 },
            brands: BrandScope::All,
        };
        assert!(apply_filters(&ds, &params).is_err());
    }

    #[test]
    fn test_full_range_of_empty_dataset() {
        let ds = DataCleaner::default().clean(Path::new("empty.csv"), &[]);
        assert_eq!(PriceRange::full(&ds), PriceRange { min: 0.0, max: 0.0 });

        let params = FilterParams::defaults(&ds, FilterProfile::TopBrands);
        let view = apply_filters(&ds, &params).expect("filter");
        assert!(view.is_empty());
    }

    #[test]
    fn test_top_n_keeps_every_brand_in_price_view() {
        let rows: Vec<_> = (0..12)
            .map(|i| raw(i, &format!("Brand{i:02}"), "₹100", "₹80", "4.0", "1"))
            .collect();
        let ds = DataCleaner::default().clean(Path::new("many.csv"), &rows);
        let params = FilterParams {
            price_range: PriceRange::full(&ds),
            brands: BrandScope::TopN(10),
        };

        let view = apply_filters(&ds, &params).expect("filter");
        assert_eq!(view.price_matched, 12);
        assert_eq!(view.len(), 12);
        assert_eq!(view.brand_records.len(), 10);
        assert_eq!(view.brands.len(), 10);
    }

    #[test]
    fn test_brandless_rows_stay_out_of_brand_scopes() {
        let ds = DataCleaner::default().clean(
            Path::new("brandless.csv"),
            &[
                raw(0, "", "₹100", "₹80", "4.0", "1"),
                raw(1, "Acme", "₹100", "₹50", "4.0", "1"),
                raw(2, "", "₹100", "₹60", "3.0", "1"),
            ],
        );

        let top = FilterParams {
            price_range: PriceRange::full(&ds),
            brands: BrandScope::TopN(5),
        };
        let view = apply_filters(&ds, &top).expect("filter");
        assert_eq!(rows(&view), vec![0, 1, 2]);
        assert_eq!(brand_rows(&view), vec![1]);
        assert_eq!(view.brands, vec!["Acme"]);

        let all = FilterParams {
            price_range: PriceRange::full(&ds),
            brands: BrandScope::All,
        };
        let view = apply_filters(&ds, &all).expect("filter");
        assert_eq!(rows(&view), vec![1]);
    }
}
