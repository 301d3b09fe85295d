//! NFL ingestion pipeline.
//!
//! Pulls scoreboard, schedule, record, box score, depth chart, athlete and
//! odds data from the ESPN JSON APIs, normalizes it, and upserts it into
//! SQLite. A small axum surface refreshes on request and serves the stored
//! views.

pub mod client;
pub mod config;
pub mod error;
pub mod espn;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{IngestError, Refresh};
pub use ingest::{BatchReport, Ingestor};
pub use store::Store;
