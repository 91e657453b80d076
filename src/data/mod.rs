//! Data module - CSV loading, cleaning and caching

mod cleaner;
mod loader;
mod store;

pub use cleaner::{CleanReport, CleanedDataset, CleaningOptions, DataCleaner, Product};
pub use loader::{DataLoader, LoaderError, RawRecord, REQUIRED_COLUMNS};
pub use store::{DatasetStore, StoreError};

#[cfg(test)]
pub(crate) use cleaner::tests::raw;
