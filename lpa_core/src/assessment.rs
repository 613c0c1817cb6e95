//! One complete request: convert, classify, and compare against the legacy method.

use crate::{
    Comparison, ConversionModel, ConversionResult, Result, RiskAssessment, RiskClassifier,
};
use serde::Serialize;

/// Legacy fixed-multiplier estimate and how its band compares to the harmonized one
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct LegacyComparison {
    /// Legacy estimate in nmol/L
    pub estimate: f64,
    /// Primary is the harmonized value, secondary the legacy estimate
    pub comparison: Comparison,
}

/// Full result for a kit reading
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Assessment {
    pub conversion: ConversionResult,
    pub risk: RiskAssessment,
    /// Absent for kits reporting in nmol/L
    pub legacy: Option<LegacyComparison>,
}

impl Assessment {
    pub fn is_underestimated(&self) -> bool {
        self.legacy
            .as_ref()
            .is_some_and(|l| l.comparison.is_underestimated)
    }
}

/// Convert a kit reading, classify it, and compare with the legacy estimate
pub fn assess(
    model: &ConversionModel,
    classifier: &RiskClassifier,
    kit_name: &str,
    value: f64,
) -> Result<Assessment> {
    let conversion = model.forward(kit_name, value)?;
    let risk = classifier.classify(conversion.harmonized);

    let legacy = model
        .legacy_estimate_for_kit(kit_name, value)?
        .map(|estimate| LegacyComparison {
            estimate,
            comparison: classifier.compare(conversion.harmonized, estimate),
        });

    if let Some(ref l) = legacy {
        if l.comparison.is_underestimated {
            tracing::info!(
                "{} {}: legacy estimate {:.2} nmol/L under-classifies ({} vs {})",
                kit_name,
                value,
                l.estimate,
                l.comparison.secondary.label,
                risk.label
            );
        }
    }

    Ok(Assessment {
        conversion,
        risk,
        legacy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, RiskCategory};

    #[test]
    fn test_sekisui_30_underestimated_by_legacy() {
        let model = ConversionModel::default();
        let classifier = RiskClassifier::default();

        let assessment = assess(&model, &classifier, "Sekisui", 30.0).unwrap();

        assert!((assessment.conversion.harmonized - 110.71).abs() < 1e-9);
        assert_eq!(assessment.risk.band_index, 1);

        let legacy = assessment.legacy.as_ref().unwrap();
        assert!((legacy.estimate - 66.0).abs() < 1e-9);
        assert_eq!(legacy.comparison.secondary.band_index, 0);
        assert!(legacy.comparison.is_underestimated);
        assert!(assessment.is_underestimated());
    }

    #[test]
    fn test_roche_has_no_legacy_path() {
        let model = ConversionModel::default();
        let classifier = RiskClassifier::default();

        let assessment = assess(&model, &classifier, "Roche", 150.0).unwrap();

        assert_eq!(assessment.conversion.harmonized, 150.0);
        assert_eq!(assessment.risk.category, RiskCategory::High);
        assert!(assessment.legacy.is_none());
        assert!(!assessment.is_underestimated());
    }

    #[test]
    fn test_nittobo_zero_is_low() {
        let model = ConversionModel::default();
        let classifier = RiskClassifier::default();

        let assessment = assess(&model, &classifier, "Nittobo", 0.0).unwrap();

        assert!((assessment.conversion.harmonized + 8.64).abs() < 1e-9);
        assert_eq!(assessment.risk.band_index, 0);
    }

    #[test]
    fn test_unknown_kit() {
        let result = assess(
            &ConversionModel::default(),
            &RiskClassifier::default(),
            "Unknown",
            10.0,
        );
        assert!(matches!(result, Err(Error::UnknownKit(_))));
    }

    #[test]
    fn test_serializes_to_json() {
        let assessment = assess(
            &ConversionModel::default(),
            &RiskClassifier::default(),
            "Denka-1",
            40.0,
        )
        .unwrap();
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["conversion"]["kit"]["name"], "Denka-1");
        assert_eq!(json["conversion"]["kit"]["input_unit"], "mg/dL");
        assert_eq!(json["risk"]["category"], "moderate");
        assert_eq!(json["legacy"]["comparison"]["is_underestimated"], false);
    }
}
