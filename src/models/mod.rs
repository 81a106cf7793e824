// src/models/mod.rs

//! Domain models for the stock monitor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod product;

// Re-export all public types
pub use config::{
    Config, LoggingConfig, MarkerConfig, MonitorConfig, ProductSpec, StorageConfig,
};
pub use product::{Availability, Observation, ProductState, StatusChange};
