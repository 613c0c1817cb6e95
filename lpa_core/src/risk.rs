//! Risk classification of harmonized Lp(a) values.
//!
//! Bands are lower-inclusive and upper-exclusive; the last band is unbounded.
//! Anything below the first bound (negative values from the unclamped
//! conversion, or NaN) falls into the lowest band.

use crate::{Comparison, Error, Result, RiskAssessment, RiskBand, RiskCategory};

/// Default lower bounds in nmol/L for Low, Moderate, High, Very High
pub const DEFAULT_BOUNDS: [f64; 4] = [0.0, 75.0, 125.0, 175.0];

/// Maps harmonized nmol/L values onto the four risk bands
#[derive(Clone, Debug, PartialEq)]
pub struct RiskClassifier {
    bands: [RiskBand; 4],
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::from_bounds_unchecked(DEFAULT_BOUNDS)
    }
}

impl RiskClassifier {
    /// Classifier with custom lower bounds
    ///
    /// The first bound must be 0 and bounds must be finite and strictly increasing.
    pub fn with_bounds(bounds: [f64; 4]) -> Result<Self> {
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidThresholds(format!(
                "bounds must be finite: {:?}",
                bounds
            )));
        }
        if bounds[0] != 0.0 {
            return Err(Error::InvalidThresholds(format!(
                "first bound must be 0, got {}",
                bounds[0]
            )));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidThresholds(format!(
                "bounds must be strictly increasing: {:?}",
                bounds
            )));
        }
        Ok(Self::from_bounds_unchecked(bounds))
    }

    fn from_bounds_unchecked(bounds: [f64; 4]) -> Self {
        let bands = RiskCategory::ALL.map(|category| RiskBand {
            lower_bound: bounds[category.index()],
            category,
        });
        Self { bands }
    }

    pub fn bands(&self) -> &[RiskBand] {
        &self.bands
    }

    /// Category for a single harmonized value
    pub fn category(&self, value: f64) -> RiskCategory {
        self.bands
            .iter()
            .rev()
            .find(|band| value >= band.lower_bound)
            .map(|band| band.category)
            .unwrap_or(RiskCategory::Low)
    }

    pub fn classify(&self, value: f64) -> RiskAssessment {
        let category = self.category(value);
        tracing::debug!("{:.2} nmol/L classified as {}", value, category);
        RiskAssessment::from(category)
    }

    /// Classify two values for the same sample and flag when the secondary
    /// one lands in a lower band
    pub fn compare(&self, primary: f64, secondary: f64) -> Comparison {
        let primary = self.classify(primary);
        let secondary = self.classify(secondary);
        let is_underestimated = secondary.band_index < primary.band_index;

        if is_underestimated {
            tracing::debug!(
                "Secondary value under-classified: {} vs {}",
                secondary.label,
                primary.label
            );
        }

        Comparison {
            primary,
            secondary,
            is_underestimated,
        }
    }
}
