//! Core domain types for Lp(a) conversion.
//!
//! This module defines the fundamental types used throughout the system:
//! - Assay kits and the unit they report in
//! - Risk categories and the bands that partition the nmol/L scale
//! - Conversion, classification and comparison results

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Kit Types
// ============================================================================

/// Unit an assay kit reports its raw measurement in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InputUnit {
    /// Mass concentration
    #[serde(rename = "mg/dL")]
    MassMgDl,
    /// Molar concentration
    #[serde(rename = "nmol/L")]
    MolarNmolL,
}

impl InputUnit {
    /// Get the unit label
    pub fn label(self) -> &'static str {
        match self {
            InputUnit::MassMgDl => "mg/dL",
            InputUnit::MolarNmolL => "nmol/L",
        }
    }

    /// Whether the kit already reports on a molar scale
    pub fn is_molar(self) -> bool {
        matches!(self, InputUnit::MolarNmolL)
    }
}

impl fmt::Display for InputUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Regression coefficients for one assay kit
///
/// The harmonized value is `slope * raw + intercept`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KitProfile {
    pub name: String,
    pub slope: f64,
    pub intercept: f64,
    pub input_unit: InputUnit,
}

impl KitProfile {
    pub fn new(name: impl Into<String>, slope: f64, intercept: f64, input_unit: InputUnit) -> Self {
        Self {
            name: name.into(),
            slope,
            intercept,
            input_unit,
        }
    }
}

// ============================================================================
// Risk Types
// ============================================================================

/// Clinical risk category for a harmonized Lp(a) value, in increasing severity
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskCategory {
    /// All categories, lowest first
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Low,
        RiskCategory::Moderate,
        RiskCategory::High,
        RiskCategory::VeryHigh,
    ];

    /// Position in the ordered band table (0-3)
    pub fn index(self) -> usize {
        match self {
            RiskCategory::Low => 0,
            RiskCategory::Moderate => 1,
            RiskCategory::High => 2,
            RiskCategory::VeryHigh => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::VeryHigh => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One band of the risk partition: `[lower_bound, next band's lower_bound)`
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RiskBand {
    pub lower_bound: f64,
    pub category: RiskCategory,
}

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of a forward or inverse conversion
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConversionResult {
    /// IFCC-harmonized value in nmol/L
    pub harmonized: f64,
    /// Value in the kit's own reporting unit
    pub original: f64,
    pub kit: KitProfile,
}

/// Classification of a single harmonized value
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RiskAssessment {
    pub band_index: usize,
    pub category: RiskCategory,
    pub label: &'static str,
}

impl From<RiskCategory> for RiskAssessment {
    fn from(category: RiskCategory) -> Self {
        RiskAssessment {
            band_index: category.index(),
            category,
            label: category.label(),
        }
    }
}

/// Side-by-side classification of two values for the same sample
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Comparison {
    pub primary: RiskAssessment,
    pub secondary: RiskAssessment,
    /// Secondary method lands in a lower band than the primary
    pub is_underestimated: bool,
}
