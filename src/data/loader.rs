//! CSV Data Loader Module
//! Reads the product snapshot into raw, untyped records using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Columns every product snapshot must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "brand",
    "actual_price",
    "discount_price",
    "rating",
    "no_of_ratings",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// One source row, every field kept as the text found in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub row: usize,
    pub brand: Option<String>,
    pub actual_price: Option<String>,
    pub discount_price: Option<String>,
    pub rating: Option<String>,
    pub no_of_ratings: Option<String>,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and return its rows as raw records.
    pub fn load_raw(file_path: &Path) -> Result<Vec<RawRecord>, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        // Schema length 0 keeps every column as String; coercion is the cleaner's job
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "Loaded product snapshot"
        );

        Self::records_from_frame(&df)
    }

    /// Convert a loaded DataFrame into raw records, in row order.
    pub fn records_from_frame(df: &DataFrame) -> Result<Vec<RawRecord>, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|required| !names.iter().any(|n| n == *required))
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let brand = Self::text_column(df, "brand")?;
        let actual_price = Self::text_column(df, "actual_price")?;
        let discount_price = Self::text_column(df, "discount_price")?;
        let rating = Self::text_column(df, "rating")?;
        let no_of_ratings = Self::text_column(df, "no_of_ratings")?;

        let records = (0..df.height())
            .map(|row| RawRecord {
                row,
                brand: brand[row].clone(),
                actual_price: actual_price[row].clone(),
                discount_price: discount_price[row].clone(),
                rating: rating[row].clone(),
                no_of_ratings: no_of_ratings[row].clone(),
            })
            .collect();

        Ok(records)
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::String)?;
        let values = column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect();
        Ok(values)
    }
}
