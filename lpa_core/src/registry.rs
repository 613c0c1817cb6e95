//! Kit registry: the fixed table of per-kit regression coefficients.
//!
//! Coefficients are from Miida et al. (2025), J Atheroscler Thromb 32:580-595.
//! Roche reports in nmol/L and is registered as the identity model.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;

/// Cached default registry - built once and reused across all operations
static DEFAULT_REGISTRY: Lazy<KitRegistry> = Lazy::new(build_default_registry);

/// Get a reference to the cached default registry
pub fn get_default_registry() -> &'static KitRegistry {
    &DEFAULT_REGISTRY
}

/// Ordered, immutable set of kit profiles keyed by name
#[derive(Clone, Debug, PartialEq)]
pub struct KitRegistry {
    kits: Vec<KitProfile>,
}

/// Builds the registry of built-in kits
///
/// **Note**: prefer `get_default_registry()` for lookups; this is the starting
/// point for configured registries.
pub fn build_default_registry() -> KitRegistry {
    KitRegistry::new(vec![
        KitProfile::new("Sekisui", 3.77, -2.39, InputUnit::MassMgDl),
        KitProfile::new("Denka-1", 2.04, -2.77, InputUnit::MassMgDl),
        KitProfile::new("Denka-2", 2.08, -2.73, InputUnit::MassMgDl),
        KitProfile::new("Shino-test", 2.48, -5.01, InputUnit::MassMgDl),
        KitProfile::new("Nittobo", 2.40, -8.64, InputUnit::MassMgDl),
        KitProfile::new("Roche", 1.0, 0.0, InputUnit::MolarNmolL),
    ])
}

impl KitRegistry {
    /// Wrap a list of kits as-is. Call `validate()` before trusting it.
    pub fn new(kits: Vec<KitProfile>) -> Self {
        Self { kits }
    }

    /// Look up a kit by exact name
    pub fn get(&self, name: &str) -> Result<&KitProfile> {
        self.kits
            .iter()
            .find(|k| k.name == name)
            .ok_or_else(|| Error::UnknownKit(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kits.iter().any(|k| k.name == name)
    }

    /// Kit names in registry order
    pub fn names(&self) -> Vec<&str> {
        self.kits.iter().map(|k| k.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KitProfile> {
        self.kits.iter()
    }

    pub fn len(&self) -> usize {
        self.kits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kits.is_empty()
    }

    /// Replace the kit with the same name, or append a new one
    pub fn with_override(mut self, kit: KitProfile) -> Self {
        match self.kits.iter_mut().find(|k| k.name == kit.name) {
            Some(existing) => {
                tracing::info!("Overriding coefficients for kit {}", kit.name);
                *existing = kit;
            }
            None => {
                tracing::info!("Registering additional kit {}", kit.name);
                self.kits.push(kit);
            }
        }
        self
    }

    /// Validate the registry for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.kits.is_empty() {
            errors.push("Registry has no kits".to_string());
        }

        for (i, kit) in self.kits.iter().enumerate() {
            if kit.name.trim().is_empty() {
                errors.push(format!("Kit at position {} has empty name", i));
            }
            if self.kits[..i].iter().any(|k| k.name == kit.name) {
                errors.push(format!("Duplicate kit name '{}'", kit.name));
            }
            if !kit.slope.is_finite() || !kit.intercept.is_finite() {
                errors.push(format!("Kit '{}' has non-finite coefficients", kit.name));
            }
            if kit.slope == 0.0 {
                errors.push(format!("Kit '{}' has zero slope", kit.name));
            }
        }

        errors
    }

    /// `validate()` folded into a single error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::RegistryValidation(errors.join("; ")))
        }
    }
}
