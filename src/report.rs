//! Text and JSON renderings of one dashboard run.

use crate::data::CleanReport;
use crate::stats::{DashboardSummary, DescriptiveStats, PriceRange};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Brands listed per aggregate series in the text report.
const MAX_ROWS: usize = 20;

/// Everything `--json` prints for one run.
#[derive(Debug, Serialize)]
pub struct DashboardReport<'a> {
    pub source: &'a Path,
    pub price_range: &'a PriceRange,
    pub cleaning: &'a CleanReport,
    pub summary: &'a DashboardSummary,
}

/// Plain-text report, written through [`fmt::Display`].
pub struct SummaryText<'a> {
    pub summary: &'a DashboardSummary,
    pub range: &'a PriceRange,
    pub clean: &'a CleanReport,
}

impl fmt::Display for SummaryText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            summary,
            range,
            clean,
        } = self;

        writeln!(f, "Overview")?;
        writeln!(
            f,
            "  Rows loaded: {} ({} dropped during cleaning)",
            clean.rows_read,
            clean.rows_dropped()
        )?;
        writeln!(f, "  Price range: {:.0} to {:.0}", range.min, range.max)?;
        writeln!(
            f,
            "  Products: {} ({} in price range)",
            summary.count_total, summary.price_matched
        )?;
        writeln!(
            f,
            "  Brands shown: {} of {}",
            summary.brands_shown, summary.brand_count
        )?;

        writeln!(f, "\nSummary statistics")?;
        write_stats(f, "Discount price", summary.price.as_ref())?;
        write_stats(f, "Rating", summary.rating.as_ref())?;
        write_stats(f, "Discount %", summary.discount.as_ref())?;
        match &summary.price_rating_correlation {
            Some(c) => writeln!(
                f,
                "  Price vs rating: r = {:.3}, p = {:.4}{}",
                c.r,
                c.p_value,
                if c.is_significant() { " (significant)" } else { "" }
            )?,
            None => writeln!(f, "  Price vs rating: not enough data")?,
        }

        writeln!(f, "\nAverage discount by brand")?;
        if summary.mean_discount_by_brand.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for m in summary.mean_discount_by_brand.iter().take(MAX_ROWS) {
            writeln!(f, "  {:<30} {:>6.1}%  ({} products)", m.brand, m.mean_discount, m.count)?;
        }

        writeln!(f, "\nProducts by brand")?;
        if summary.count_by_brand.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for c in summary.count_by_brand.iter().take(MAX_ROWS) {
            writeln!(f, "  {:<30} {:>6}", c.brand, c.count)?;
        }
        Ok(())
    }
}

pub fn format_summary(summary: &DashboardSummary, range: &PriceRange, clean: &CleanReport) -> String {
    SummaryText {
        summary,
        range,
        clean,
    }
    .to_string()
}

fn write_stats(f: &mut fmt::Formatter<'_>, label: &str, stats: Option<&DescriptiveStats>) -> fmt::Result {
    match stats {
        Some(s) => writeln!(
            f,
            "  {label:<15} mean {:.2}  median {:.2}  std {:.2}  min {:.2}  max {:.2}",
            s.mean, s.median, s.std, s.min, s.max
        ),
        None => writeln!(f, "  {label:<15} -"),
    }
}
