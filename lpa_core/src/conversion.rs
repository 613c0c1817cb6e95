//! Conversion between kit-reported units and IFCC-harmonized nmol/L.
//!
//! Each kit is an affine model `harmonized = slope * raw + intercept`.
//! Results are never clamped: small mass inputs on kits with a negative
//! intercept produce negative harmonized values, and the inverse accepts
//! them so that a round trip returns the original input.

use crate::registry::{get_default_registry, KitRegistry};
use crate::{ConversionResult, Error, KitProfile, Result};

/// Historical mg/dL -> nmol/L multiplier used before harmonization
pub const DEFAULT_LEGACY_MULTIPLIER: f64 = 2.2;

/// Rule-of-thumb nmol/L per mg/dL for a kit-agnostic reverse estimate
pub const DEFAULT_GENERIC_MASS_FACTOR: f64 = 2.4;

/// Reject negative or non-finite user input
///
/// Front ends call this before handing a measurement to the model; the model
/// itself does not clamp.
pub fn ensure_non_negative(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidInput(format!("{} is not a finite number", value)));
    }
    if value < 0.0 {
        return Err(Error::InvalidInput(format!(
            "{} is negative; concentrations must be >= 0",
            value
        )));
    }
    Ok(value)
}

fn ensure_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!("{} is not a finite number", value)))
    }
}

/// Per-kit conversion model plus the legacy and generic heuristics
#[derive(Clone, Debug)]
pub struct ConversionModel {
    registry: KitRegistry,
    legacy_multiplier: f64,
    generic_mass_factor: f64,
}

impl Default for ConversionModel {
    fn default() -> Self {
        Self::new(get_default_registry().clone())
    }
}

impl ConversionModel {
    pub fn new(registry: KitRegistry) -> Self {
        Self {
            registry,
            legacy_multiplier: DEFAULT_LEGACY_MULTIPLIER,
            generic_mass_factor: DEFAULT_GENERIC_MASS_FACTOR,
        }
    }

    pub fn with_legacy_multiplier(mut self, multiplier: f64) -> Self {
        self.legacy_multiplier = multiplier;
        self
    }

    pub fn with_generic_mass_factor(mut self, factor: f64) -> Self {
        self.generic_mass_factor = factor;
        self
    }

    pub fn registry(&self) -> &KitRegistry {
        &self.registry
    }

    pub fn legacy_multiplier(&self) -> f64 {
        self.legacy_multiplier
    }

    pub fn generic_mass_factor(&self) -> f64 {
        self.generic_mass_factor
    }

    /// Kit names in registry order (for populating a selector)
    pub fn list_kits(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn kit(&self, name: &str) -> Result<&KitProfile> {
        self.registry.get(name)
    }

    /// Kit units -> harmonized nmol/L
    pub fn convert_to_harmonized(&self, kit_name: &str, value: f64) -> Result<f64> {
        Ok(self.forward(kit_name, value)?.harmonized)
    }

    /// Harmonized nmol/L -> kit units
    pub fn convert_from_harmonized(&self, kit_name: &str, harmonized: f64) -> Result<f64> {
        Ok(self.inverse(kit_name, harmonized)?.original)
    }

    /// Forward conversion with the kit attached
    pub fn forward(&self, kit_name: &str, value: f64) -> Result<ConversionResult> {
        let kit = self.registry.get(kit_name)?;
        let value = ensure_finite(value)?;
        let harmonized = kit.slope * value + kit.intercept;

        tracing::debug!(
            "{}: {} {} -> {:.2} nmol/L",
            kit.name,
            value,
            kit.input_unit,
            harmonized
        );

        Ok(ConversionResult {
            harmonized,
            original: value,
            kit: kit.clone(),
        })
    }

    /// Inverse conversion with the kit attached
    pub fn inverse(&self, kit_name: &str, harmonized: f64) -> Result<ConversionResult> {
        let kit = self.registry.get(kit_name)?;
        let harmonized = ensure_finite(harmonized)?;
        inverse_for(kit, harmonized)
    }

    /// What every registered kit would have reported for this harmonized value
    ///
    /// Kits whose model cannot be inverted are left out of the listing.
    pub fn estimate_all_kits(&self, harmonized: f64) -> Result<Vec<ConversionResult>> {
        let harmonized = ensure_finite(harmonized)?;
        let mut results = Vec::with_capacity(self.registry.len());

        for kit in self.registry.iter() {
            match inverse_for(kit, harmonized) {
                Ok(result) => results.push(result),
                Err(e) => tracing::warn!("Skipping kit {}: {}", kit.name, e),
            }
        }

        Ok(results)
    }

    /// Legacy fixed-multiplier estimate, independent of kit
    pub fn legacy_estimate(&self, value: f64) -> f64 {
        value * self.legacy_multiplier
    }

    /// Legacy estimate for a kit's raw value
    ///
    /// `None` for kits reporting in nmol/L: the mass multiplier has no meaning there.
    pub fn legacy_estimate_for_kit(&self, kit_name: &str, value: f64) -> Result<Option<f64>> {
        let kit = self.registry.get(kit_name)?;
        if kit.input_unit.is_molar() {
            tracing::debug!("{} reports in nmol/L; no legacy estimate", kit.name);
            return Ok(None);
        }
        Ok(Some(self.legacy_estimate(value)))
    }

    /// Approximate mg/dL for a harmonized value without reference to any kit
    pub fn generic_mass_estimate(&self, harmonized: f64) -> Result<f64> {
        if self.generic_mass_factor == 0.0 {
            return Err(Error::DegenerateModel("generic mass factor".into()));
        }
        Ok(harmonized / self.generic_mass_factor)
    }
}

fn inverse_for(kit: &KitProfile, harmonized: f64) -> Result<ConversionResult> {
    if kit.slope == 0.0 {
        return Err(Error::DegenerateModel(kit.name.clone()));
    }
    let original = (harmonized - kit.intercept) / kit.slope;

    tracing::debug!(
        "{}: {:.2} nmol/L -> {} {}",
        kit.name,
        harmonized,
        original,
        kit.input_unit
    );

    Ok(ConversionResult {
        harmonized,
        original,
        kit: kit.clone(),
    })
}
