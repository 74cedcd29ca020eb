//! `ontheway` - zone-wise summary of on-the-way vehicle arrivals
//!
//! This library provides the core functionality for the arrival dashboard:
//! fetching vehicle-arrival records from the arrivals database, classifying
//! them into geographic zones via a data-driven ruleset, filtering by zone
//! and departure date, and aggregating per-zone counts for rendering.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod arrival;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod storage;
pub mod summary;
pub mod zone;

pub use arrival::{ArrivalRecord, UNCLASSIFIED};
pub use config::Config;
pub use error::{Error, Result};
pub use filter::Selection;
pub use logging::init_logging;
pub use storage::Database;
pub use summary::{summarize, ZoneCount, ZoneSummary};
pub use zone::ZoneMap;
