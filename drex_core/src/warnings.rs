//! # Design Warnings
//!
//! Non-fatal findings attached to a [`CalculationResult`](crate::calculations::CalculationResult).
//! A warning never stops the calculation; the numbers are still produced so the
//! designer can see how far off the system is.

use serde::{Deserialize, Serialize};

/// A non-fatal design finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum DesignWarning {
    /// A dryer connector loses more than the connector limit
    ExcessiveConnectorLoss {
        dryer_index: usize,
        label: String,
        loss_inwc: f64,
        limit_inwc: f64,
    },

    /// The manifold loses more than its target at the chosen diameter
    ExcessiveManifoldLoss {
        diameter_in: u32,
        loss_inwc: f64,
        target_inwc: f64,
        /// True when the diameter came from the optimizer (no candidate met the target)
        optimized: bool,
    },

    /// No catalog fan covers the required airflow and static pressure
    NoFanFound {
        total_cfm: f64,
        total_static_inwc: f64,
    },

    /// Elevation lookup failed; the default elevation was used
    ElevationLookupFailed {
        zip_code: String,
        reason: String,
        fallback_elevation_ft: f64,
    },
}

impl DesignWarning {
    /// Short code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DesignWarning::ExcessiveConnectorLoss { .. } => "EXCESSIVE_CONNECTOR_LOSS",
            DesignWarning::ExcessiveManifoldLoss { .. } => "EXCESSIVE_MANIFOLD_LOSS",
            DesignWarning::NoFanFound { .. } => "NO_FAN_FOUND",
            DesignWarning::ElevationLookupFailed { .. } => "ELEVATION_LOOKUP_FAILED",
        }
    }

    /// One-line description for reports and the CLI
    pub fn message(&self) -> String {
        match self {
            DesignWarning::ExcessiveConnectorLoss { label, loss_inwc, limit_inwc, .. } => format!(
                "{}: connector loss {:.3} in. WC exceeds the {:.2} in. WC limit; increase the connector diameter or remove fittings",
                label, loss_inwc, limit_inwc
            ),
            DesignWarning::ExcessiveManifoldLoss { diameter_in, loss_inwc, target_inwc, optimized } => {
                if *optimized {
                    format!(
                        "No standard manifold size meets the {:.2} in. WC target; largest size {}\" loses {:.3} in. WC",
                        target_inwc, diameter_in, loss_inwc
                    )
                } else {
                    format!(
                        "Manifold {}\" loses {:.3} in. WC, above the {:.2} in. WC target",
                        diameter_in, loss_inwc, target_inwc
                    )
                }
            }
            DesignWarning::NoFanFound { total_cfm, total_static_inwc } => format!(
                "No DEF fan covers {:.0} CFM at {:.3} in. WC; split the system or contact the factory",
                total_cfm, total_static_inwc
            ),
            DesignWarning::ElevationLookupFailed { zip_code, reason, fallback_elevation_ft } => format!(
                "Elevation lookup for {} failed ({}); using {:.0} ft",
                zip_code, reason, fallback_elevation_ft
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let w = DesignWarning::NoFanFound { total_cfm: 9000.0, total_static_inwc: 1.2 };
        assert_eq!(w.code(), "NO_FAN_FOUND");
        assert!(w.message().contains("9000 CFM"));
    }

    #[test]
    fn test_manifold_message_depends_on_mode() {
        let manual = DesignWarning::ExcessiveManifoldLoss {
            diameter_in: 16,
            loss_inwc: 1.4,
            target_inwc: 1.0,
            optimized: false,
        };
        assert!(manual.message().starts_with("Manifold 16\""));

        let auto = DesignWarning::ExcessiveManifoldLoss {
            diameter_in: 36,
            loss_inwc: 1.4,
            target_inwc: 1.0,
            optimized: true,
        };
        assert!(auto.message().starts_with("No standard manifold size"));
    }

    #[test]
    fn test_serialization_is_tagged() {
        let w = DesignWarning::ElevationLookupFailed {
            zip_code: "80202".to_string(),
            reason: "timeout".to_string(),
            fallback_elevation_ft: 0.0,
        };
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.starts_with(r#"{"type":"ElevationLookupFailed","details":{"#));
        let back: DesignWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
