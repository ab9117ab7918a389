//! Glacimatch core - station and glacier models, format readers, CRS
//! transforms, and the nearest-glacier match pipeline.
//!
//! The CLI crate is a thin adapter over [`processing::run_match`].

pub mod config;
pub mod error;
pub mod formats;
pub mod geo;
pub mod models;
pub mod processing;

pub use error::{GlacimatchError, Result};
