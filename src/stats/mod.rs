//! Stats module - Filtering, aggregation and descriptive statistics

mod aggregator;
mod calculator;
mod filter;

pub use aggregator::{Aggregator, BrandCount, BrandMean, DashboardSummary};
pub use calculator::{Correlation, DescriptiveStats, HistogramBin, StatsCalculator};
pub use filter::{
    apply_filters, top_brands, BrandScope, FilterError, FilterParams, FilterProfile,
    FilteredView, PriceRange, DEFAULT_TOP_N,
};
