//! Dashboard configuration: JSON file defaults overlaid with CLI flags.

use crate::charts::ChartOptions;
use crate::data::{CleanedDataset, CleaningOptions};
use crate::stats::{BrandScope, FilterError, FilterParams, FilterProfile, PriceRange, DEFAULT_TOP_N};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ── CLI ────────────────────────────────────────────────────────────────────────

/// Explore a retail product snapshot: price, discount, brand and rating
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pricelens", version)]
pub struct Cli {
    /// Product snapshot CSV (overrides `data_path` from the config file)
    pub data: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Filter profile
    #[arg(long, value_enum)]
    pub profile: Option<FilterProfile>,

    /// Number of most frequent brands for the top-brands profile
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Lowest discount price to include
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Highest discount price to include
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Brand to include (repeatable); implies the brand-selection profile
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Directory for rendered charts
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Histogram bins for the price distribution
    #[arg(long)]
    pub bins: Option<usize>,

    /// Chart width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Chart height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Also render rating against number of reviews
    #[arg(long)]
    pub review_chart: bool,

    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Open the chart directory when done
    #[arg(long)]
    pub open: bool,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Overlay every flag that was given on top of `config`.
    pub fn apply_to(&self, config: &mut DashboardConfig) {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        if !self.brands.is_empty() {
            config.brands = self.brands.clone();
            config.profile = FilterProfile::BrandSelection;
        }
        // An explicit profile beats the one implied by --brand
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if self.min_price.is_some() {
            config.price_min = self.min_price;
        }
        if self.max_price.is_some() {
            config.price_max = self.max_price;
        }
        if let Some(dir) = &self.out_dir {
            config.charts.output_dir = dir.clone();
        }
        if let Some(bins) = self.bins {
            config.charts.histogram_bins = bins;
        }
        if let Some(width) = self.width {
            config.charts.width = width;
        }
        if let Some(height) = self.height {
            config.charts.height = height;
        }
        if self.review_chart {
            config.charts.review_volume = true;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

// ── DashboardConfig ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub profile: FilterProfile,
    pub top_n: usize,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Brand allow-list for the brand-selection profile; empty means every brand
    pub brands: Vec<String>,
    pub cleaning: CleaningOptions,
    pub charts: ChartOptions,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/amazon_sales_cleaned.csv"),
            profile: FilterProfile::default(),
            top_n: DEFAULT_TOP_N,
            price_min: None,
            price_max: None,
            brands: Vec::new(),
            cleaning: CleaningOptions::default(),
            charts: ChartOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the config file (if any), then the CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        cli.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.charts.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1".into()));
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            return Err(ConfigError::Invalid("chart size must be non-zero".into()));
        }
        if !(self.cleaning.rating_max > 0.0) {
            return Err(ConfigError::Invalid("rating_max must be positive".into()));
        }
        if self.cleaning.currency_symbol.is_empty() {
            return Err(ConfigError::Invalid("currency_symbol must not be empty".into()));
        }
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                return Err(ConfigError::Invalid(format!(
                    "price_min ({min}) is above price_max ({max})"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the profile and bounds against a loaded dataset.
    pub fn filter_params(&self, dataset: &CleanedDataset) -> Result<FilterParams, FilterError> {
        let full = PriceRange::full(dataset);
        let price_range = PriceRange::new(
            self.price_min.unwrap_or(full.min),
            self.price_max.unwrap_or(full.max),
        )?;

        let brands = match self.profile {
            FilterProfile::TopBrands => BrandScope::TopN(self.top_n),
            FilterProfile::BrandSelection if self.brands.is_empty() => BrandScope::All,
            FilterProfile::BrandSelection => {
                BrandScope::Selected(self.brands.iter().cloned().collect())
            }
        };

        Ok(FilterParams {
            price_range,
            brands,
        })
    }
}
