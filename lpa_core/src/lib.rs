#![forbid(unsafe_code)]

//! Core conversion and risk classification for Lp(a) measurements.
//!
//! This crate provides:
//! - Domain types (kits, input units, risk categories, results)
//! - The built-in kit registry
//! - Conversion model (kit units <-> IFCC-harmonized nmol/L, legacy estimate)
//! - Risk classification and harmonized-vs-legacy comparison
//! - Batch CSV assessment and TOML configuration

pub mod types;
pub mod error;
pub mod registry;
pub mod conversion;
pub mod risk;
pub mod assessment;
pub mod batch;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use registry::{build_default_registry, get_default_registry, KitRegistry};
pub use conversion::{ensure_non_negative, ConversionModel};
pub use risk::RiskClassifier;
pub use assessment::{assess, Assessment, LegacyComparison};
pub use batch::{assess_csv, BatchSummary};
pub use config::Config;
