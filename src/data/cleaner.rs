//! Data Cleaner Module
//! Coerces raw text fields into typed product records and drops invalid rows.

use super::loader::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parsing rules for the currency and numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    pub currency_symbol: String,
    pub thousands_separator: char,
    pub rating_max: f64,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            thousands_separator: ',',
            rating_max: 5.0,
        }
    }
}

/// A cleaned product row.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Position in the source file; defines natural order.
    pub row: usize,
    /// `None` keeps the row in price views but out of every brand aggregate.
    pub brand: Option<String>,
    pub actual_price: f64,
    pub discount_price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub no_of_ratings: Option<u64>,
}

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_read: usize,
    pub rows_retained: usize,
    pub invalid_actual_price: usize,
    pub zero_actual_price: usize,
    pub invalid_discount_price: usize,
    pub invalid_rating: usize,
    pub missing_brand: usize,
    pub missing_review_count: usize,
}

impl CleanReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_retained
    }
}

/// Immutable result of loading and cleaning one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDataset {
    source: PathBuf,
    products: Vec<Product>,
    report: CleanReport,
}

impl CleanedDataset {
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn report(&self) -> &CleanReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Observed discount price range, floored at both ends.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut prices = self.products.iter().map(|p| p.discount_price);
        let first = prices.next()?;
        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some((min.floor(), max.floor()))
    }

    /// Distinct brands in first-appearance order.
    pub fn brands(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .filter_map(|p| p.brand.as_deref())
            .filter(|b| seen.insert(*b))
            .map(str::to_owned)
            .collect()
    }

    pub fn brand_count(&self) -> usize {
        self.products
            .iter()
            .filter_map(|p| p.brand.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Turns raw records into a [`CleanedDataset`].
pub struct DataCleaner {
    options: CleaningOptions,
}

impl DataCleaner {
    pub fn new(options: CleaningOptions) -> Self {
        Self { options }
    }

    /// Clean every record. Field failures drop or degrade the row, never the pass.
    pub fn clean(&self, source: &Path, records: &[RawRecord]) -> CleanedDataset {
        let mut report = CleanReport {
            rows_read: records.len(),
            ..CleanReport::default()
        };
        let mut products = Vec::with_capacity(records.len());

        for record in records {
            if let Some(product) = self.clean_record(record, &mut report) {
                products.push(product);
            }
        }

        report.rows_retained = products.len();
        info!(
            read = report.rows_read,
            retained = report.rows_retained,
            dropped = report.rows_dropped(),
            zero_price = report.zero_actual_price,
            bad_rating = report.invalid_rating,
            "Cleaned product snapshot"
        );

        CleanedDataset {
            source: source.to_path_buf(),
            products,
            report,
        }
    }

    fn clean_record(&self, record: &RawRecord, report: &mut CleanReport) -> Option<Product> {
        let row = record.row;

        // Zero prices are excluded before the percentage is derived
        let actual_price = match self.parse_price(record.actual_price.as_deref()) {
            Some(p) if p > 0.0 => p,
            Some(_) => {
                report.zero_actual_price += 1;
                debug!(row, "Dropping row with zero actual price");
                return None;
            }
            None => {
                report.invalid_actual_price += 1;
                debug!(row, value = ?record.actual_price, "Dropping row with invalid actual price");
                return None;
            }
        };

        let Some(discount_price) = self.parse_price(record.discount_price.as_deref()) else {
            report.invalid_discount_price += 1;
            debug!(row, value = ?record.discount_price, "Dropping row with invalid discount price");
            return None;
        };

        let Some(rating) = self.parse_rating(record.rating.as_deref()) else {
            report.invalid_rating += 1;
            debug!(row, value = ?record.rating, "Dropping row with invalid rating");
            return None;
        };

        let brand = record
            .brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_owned);
        if brand.is_none() {
            report.missing_brand += 1;
        }

        let no_of_ratings = self.parse_count(record.no_of_ratings.as_deref());
        if no_of_ratings.is_none() {
            report.missing_review_count += 1;
        }

        Some(Product {
            row,
            brand,
            actual_price,
            discount_price,
            discount_percentage: (actual_price - discount_price) / actual_price * 100.0,
            rating,
            no_of_ratings,
        })
    }

    /// Parse a currency string such as `"₹1,299"` into a non-negative amount.
    pub fn parse_price(&self, raw: Option<&str>) -> Option<f64> {
        let stripped = raw?
            .trim()
            .replace(self.options.currency_symbol.as_str(), "")
            .replace(self.options.thousands_separator, "");

        stripped
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn parse_rating(&self, raw: Option<&str>) -> Option<f64> {
        raw?.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && (0.0..=self.options.rating_max).contains(v))
    }

    pub fn parse_count(&self, raw: Option<&str>) -> Option<u64> {
        let cleaned = raw?.trim().replace(self.options.thousands_separator, "");
        if let Ok(count) = cleaned.parse::<u64>() {
            return Some(count);
        }

        // Exports sometimes write counts as floats ("12.0")
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
            .map(|v| v as u64)
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(CleaningOptions::default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(
        row: usize,
        brand: &str,
        actual: &str,
        discount: &str,
        rating: &str,
        reviews: &str,
    ) -> RawRecord {
        let field = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawRecord {
            row,
            brand: field(brand),
            actual_price: field(actual),
            discount_price: field(discount),
            rating: field(rating),
            no_of_ratings: field(reviews),
        }
    }

    fn clean(records: &[RawRecord]) -> CleanedDataset {
        DataCleaner::default().clean(Path::new("test.csv"), records)
    }

    #[test]
    fn test_clean_reference_row() {
        let ds = clean(&[raw(0, "Acme", "₹1,000", "₹800", "4.2", "1,234")]);

        assert_eq!(ds.len(), 1);
        let p = &ds.products()[0];
        assert_eq!(p.brand.as_deref(), Some("Acme"));
        assert_eq!(p.actual_price, 1000.0);
        assert_eq!(p.discount_price, 800.0);
        assert!((p.discount_percentage - 20.0).abs() < 1e-9);
        assert_eq!(p.rating, 4.2);
        assert_eq!(p.no_of_ratings, Some(1234));
    }

    #[test]
    fn test_zero_actual_price_is_excluded() {
        let ds = clean(&[
            raw(0, "Acme", "₹0", "₹0", "4.0", "10"),
            raw(1, "Acme", "₹100", "₹50", "4.0", "10"),
        ]);

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.products()[0].row, 1);
        assert_eq!(ds.report().zero_actual_price, 1);
        assert!(ds.products().iter().all(|p| p.discount_percentage.is_finite()));
    }

    #[test]
    fn test_unparseable_rating_is_excluded() {
        let ds = clean(&[
            raw(0, "Acme", "₹100", "₹90", "N/A", "3"),
            raw(1, "Acme", "₹100", "₹90", "7.5", "3"),
            raw(2, "Acme", "₹100", "₹90", "NaN", "3"),
        ]);

        assert!(ds.is_empty());
        assert_eq!(ds.report().invalid_rating, 3);
        assert_eq!(ds.report().rows_dropped(), 3);
    }

    #[test]
    fn test_invalid_prices_are_excluded() {
        let ds = clean(&[
            raw(0, "Acme", "free", "₹10", "4.0", "1"),
            raw(1, "Acme", "₹100", "", "4.0", "1"),
            raw(2, "Acme", "₹100", "₹-5", "4.0", "1"),
        ]);

        let report = ds.report();
        assert!(ds.is_empty());
        assert_eq!(report.invalid_actual_price, 1);
        assert_eq!(report.invalid_discount_price, 2);
    }

    #[test]
    fn test_missing_brand_keeps_row() {
        let ds = clean(&[
            raw(0, "  ", "₹100", "₹10", "4.0", "1"),
            raw(1, "", "₹200", "₹150", "3.0", "1"),
            raw(2, "Acme", "₹100", "₹90", "4.0", "1"),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.report().missing_brand, 2);
        assert_eq!(ds.products()[0].brand, None);
        assert!((ds.products()[0].discount_percentage - 90.0).abs() < 1e-9);
        // Brandless rows never count as a brand
        assert_eq!(ds.brands(), vec!["Acme".to_string()]);
        assert_eq!(ds.brand_count(), 1);
    }

    #[test]
    fn test_missing_review_count_keeps_row() {
        let ds = clean(&[raw(0, "Acme", "₹100", "₹90", "3.5", "lots")]);

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.products()[0].no_of_ratings, None);
        assert_eq!(ds.report().missing_review_count, 1);
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let records = vec![
            raw(0, "Acme", "₹1,000", "₹800", "4.2", "5"),
            raw(1, "Brio", "₹0", "₹0", "4.2", "5"),
            raw(2, "Brio", "₹250", "₹200", "3.9", ""),
        ];

        assert_eq!(clean(&records), clean(&records));
    }

    #[test]
    fn test_cleaned_invariants_hold() {
        let ds = clean(&[
            raw(0, "Acme", "₹1,000", "₹800", "4.2", "5"),
            raw(1, "Brio", "₹250", "₹300", "0", "5"),
            raw(2, "Cora", "₹0", "₹0", "5", "5"),
            raw(3, "Cora", "₹99", "₹99", "5.0", "x"),
        ]);

        assert_eq!(ds.len(), 3);
        for p in ds.products() {
            assert!(p.actual_price > 0.0);
            assert!(p.discount_price >= 0.0);
            assert!((0.0..=5.0).contains(&p.rating));
            assert!(p.discount_percentage.is_finite());
        }
        // Discount above list price yields a negative percentage, not a drop
        assert!(ds.products()[1].discount_percentage < 0.0);
    }

    #[test]
    fn test_price_bounds_and_brands() {
        let ds = clean(&[
            raw(0, "Brio", "₹1,000", "₹799.9", "4.0", "1"),
            raw(1, "Acme", "₹100", "₹12.5", "4.0", "1"),
            raw(2, "Brio", "₹100", "₹50", "4.0", "1"),
        ]);

        assert_eq!(ds.price_bounds(), Some((12.0, 799.0)));
        assert_eq!(ds.brands(), vec!["Brio".to_string(), "Acme".to_string()]);
        assert_eq!(ds.brand_count(), 2);
        assert_eq!(clean(&[]).price_bounds(), None);
    }

    #[test]
    fn test_parse_helpers() {
        let cleaner = DataCleaner::default();
        assert_eq!(cleaner.parse_price(Some(" ₹1,299 ")), Some(1299.0));
        assert_eq!(cleaner.parse_price(Some("₹")), None);
        assert_eq!(cleaner.parse_price(Some("inf")), None);
        assert_eq!(cleaner.parse_price(None), None);
        assert_eq!(cleaner.parse_count(Some("12.0")), Some(12));
        assert_eq!(cleaner.parse_count(Some("12.5")), None);
        assert_eq!(cleaner.parse_count(Some("-3")), None);

        let dollars = DataCleaner::new(CleaningOptions {
            currency_symbol: "$".to_string(),
            ..CleaningOptions::default()
        });
        assert_eq!(dollars.parse_price(Some("$2,500.50")), Some(2500.5));
    }
}
