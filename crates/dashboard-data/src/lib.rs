//! Data layer for the cricket dashboard.
//!
//! Loads the four source tables once into an immutable [`reader::Dataset`],
//! aggregates match rows into counts, rankings and year buckets, and names the
//! dashboard's KPIs and chart series.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use dashboard_core as core;
