//! Pricelens - Retail Product CSV Analysis & Static Chart Dashboard
//!
//! Loads a product snapshot, cleans its currency and rating fields, filters by
//! price range and brand scope, and summarises the result per brand.

pub mod bootstrap;
pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;
