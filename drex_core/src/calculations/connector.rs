//! # Dryer Connector Evaluation
//!
//! Each dryer is joined to the manifold by its own connector duct. Connectors
//! are parallel branches: each is evaluated on its own flow, and any connector
//! losing more than the connector limit (0.25 in. WC by default) is flagged.
//!
//! ## Example
//!
//! ```rust
//! use drex_core::calculations::connector::{evaluate_connectors, Dryer};
//! use drex_core::catalog::{FittingCount, FittingType};
//!
//! let dryer = Dryer::new(300.0, 12, 10.0)
//!     .with_fittings(vec![FittingCount::one(FittingType::Elbow90Standard)]);
//! let results = evaluate_connectors(&[dryer], 0.075, 0.25).unwrap();
//! assert!(!results[0].exceeds_limit);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::pressure_loss::segment_loss;
use crate::catalog::duct_sizes::{describe_sizes, is_connector_size, CONNECTOR_DIAMETERS_IN};
use crate::catalog::FittingCount;
use crate::errors::{CalcError, CalcResult};

/// One clothes dryer and its connector duct.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Dryer 1",
///   "flow_cfm": 300.0,
///   "diameter_in": 8,
///   "length_ft": 10.0,
///   "fittings": [{ "fitting": "elbow90_standard", "count": 2 }],
///   "lint_k": 0.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dryer {
    /// Optional user label; reports fall back to "Dryer N"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Exhaust airflow (CFM)
    pub flow_cfm: f64,

    /// Connector diameter (nominal inches, 3 to 12)
    pub diameter_in: u32,

    /// Connector straight length (ft)
    pub length_ft: f64,

    /// Fittings in the connector
    #[serde(default)]
    pub fittings: Vec<FittingCount>,

    /// Lint collector K-value, added to the connector's fitting sum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lint_k: Option<f64>,
}

impl Dryer {
    pub fn new(flow_cfm: f64, diameter_in: u32, length_ft: f64) -> Self {
        Dryer {
            label: None,
            flow_cfm,
            diameter_in,
            length_ft,
            fittings: Vec::new(),
            lint_k: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_fittings(mut self, fittings: Vec<FittingCount>) -> Self {
        self.fittings = fittings;
        self
    }

    pub fn with_lint_k(mut self, k: f64) -> Self {
        self.lint_k = Some(k);
        self
    }

    /// Label for reports: the user label, or "Dryer {index + 1}"
    pub fn display_label(&self, index: usize) -> String {
        match &self.label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => format!("Dryer {}", index + 1),
        }
    }

    /// Validate this dryer; `index` is used in the field path of the error.
    pub fn validate(&self, index: usize) -> CalcResult<()> {
        let field = |name: &str| format!("dryers[{}].{}", index, name);

        if !self.flow_cfm.is_finite() || self.flow_cfm <= 0.0 {
            return Err(CalcError::invalid_input(
                field("flow_cfm"),
                self.flow_cfm.to_string(),
                "Flow rate must be a positive number",
            ));
        }
        if !is_connector_size(self.diameter_in) {
            return Err(CalcError::invalid_input(
                field("diameter_in"),
                self.diameter_in.to_string(),
                format!("Connector diameter must be one of {} in", describe_sizes(&CONNECTOR_DIAMETERS_IN)),
            ));
        }
        if !self.length_ft.is_finite() || self.length_ft < 0.0 {
            return Err(CalcError::invalid_input(
                field("length_ft"),
                self.length_ft.to_string(),
                "Length must be zero or more",
            ));
        }
        if let Some(k) = self.lint_k {
            if !k.is_finite() || k < 0.0 {
                return Err(CalcError::invalid_input(
                    field("lint_k"),
                    k.to_string(),
                    "Lint collector K cannot be negative",
                ));
            }
        }
        Ok(())
    }
}

/// Result for one dryer connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorResult {
    /// Position in the dryer list (0-based)
    pub index: usize,
    pub label: String,
    pub flow_cfm: f64,
    pub diameter_in: u32,
    pub length_ft: f64,
    /// Fitting list as text, e.g. "2x 90° Elbow (std), Exit"
    pub fittings: String,
    pub velocity_fpm: f64,
    pub total_k: f64,
    /// Static pressure loss (in. WC)
    pub loss_inwc: f64,
    /// loss_inwc > connector limit
    pub exceeds_limit: bool,
}

/// Evaluate every dryer connector independently.
///
/// # Arguments
///
/// * `dryers` - Dryer list, in input order
/// * `air_density` - lb/ft³
/// * `limit_inwc` - Connector loss limit; a connector is flagged when its
///   loss is strictly greater
pub fn evaluate_connectors(dryers: &[Dryer], air_density: f64, limit_inwc: f64) -> CalcResult<Vec<ConnectorResult>> {
    dryers
        .iter()
        .enumerate()
        .map(|(index, dryer)| {
            let segment = segment_loss(
                dryer.length_ft,
                f64::from(dryer.diameter_in),
                dryer.flow_cfm,
                &dryer.fittings,
                dryer.lint_k.unwrap_or(0.0),
                air_density,
            )?;

            Ok(ConnectorResult {
                index,
                label: dryer.display_label(index),
                flow_cfm: dryer.flow_cfm,
                diameter_in: dryer.diameter_in,
                length_ft: dryer.length_ft,
                fittings: crate::catalog::fittings_summary(&dryer.fittings),
                velocity_fpm: segment.velocity_fpm,
                total_k: segment.total_k,
                loss_inwc: segment.loss_inwc,
                exceeds_limit: segment.loss_inwc > limit_inwc,
            })
        })
        .collect()
}

/// Largest connector loss (the limiting branch); 0 for an empty list.
pub fn worst_connector_loss(connectors: &[ConnectorResult]) -> f64 {
    connectors.iter().map(|c| c.loss_inwc).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FittingType;

    #[test]
    fn test_default_label() {
        let d = Dryer::new(300.0, 8, 10.0);
        assert_eq!(d.display_label(2), "Dryer 3");
        assert_eq!(d.clone().with_label("  ").display_label(0), "Dryer 1");
        assert_eq!(d.with_label("Stack A").display_label(0), "Stack A");
    }

    #[test]
    fn test_validation() {
        assert!(Dryer::new(300.0, 8, 0.0).validate(0).is_ok());

        let err = Dryer::new(0.0, 8, 10.0).validate(4).unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "dryers[4].flow_cfm"),
            other => panic!("unexpected {other:?}"),
        }

        assert!(Dryer::new(300.0, 14, 10.0).validate(0).is_err());
        assert!(Dryer::new(300.0, 8, -2.0).validate(0).is_err());
        assert!(Dryer::new(300.0, 8, 10.0).with_lint_k(-0.1).validate(0).is_err());
    }

    #[test]
    fn test_flags_only_above_limit() {
        let small = Dryer::new(600.0, 4, 25.0)
            .with_fittings(vec![FittingCount::new(FittingType::Elbow90Standard, 3)]);
        let large = Dryer::new(300.0, 12, 10.0)
            .with_fittings(vec![FittingCount::one(FittingType::Elbow90Standard)]);

        let results = evaluate_connectors(&[small, large], 0.075, 0.25).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].exceeds_limit);
        assert!(!results[1].exceeds_limit);
        assert_eq!(results[1].index, 1);
        assert_eq!(results[1].fittings, "90° Elbow (std)");
    }

    #[test]
    fn test_limit_equal_passes() {
        let d = Dryer::new(300.0, 12, 10.0);
        let loss = evaluate_connectors(&[d.clone()], 0.075, 1.0).unwrap()[0].loss_inwc;
        let at_limit = evaluate_connectors(&[d], 0.075, loss).unwrap();
        assert!(!at_limit[0].exceeds_limit);
    }

    #[test]
    fn test_lint_k_increases_loss() {
        let d = Dryer::new(300.0, 6, 10.0);
        let plain = evaluate_connectors(&[d.clone()], 0.075, 0.25).unwrap();
        let lint = evaluate_connectors(&[d.with_lint_k(1.0)], 0.075, 0.25).unwrap();
        assert!(lint[0].loss_inwc > plain[0].loss_inwc);
        assert!((lint[0].total_k - plain[0].total_k - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_worst_connector() {
        let dryers = vec![Dryer::new(200.0, 8, 10.0), Dryer::new(400.0, 8, 10.0)];
        let results = evaluate_connectors(&dryers, 0.075, 0.25).unwrap();
        assert_eq!(worst_connector_loss(&results), results[1].loss_inwc);
        assert_eq!(worst_connector_loss(&[]), 0.0);
    }

    #[test]
    fn test_json_defaults() {
        let d: Dryer = serde_json::from_str(r#"{"flow_cfm": 300, "diameter_in": 8, "length_ft": 10}"#).unwrap();
        assert!(d.fittings.is_empty());
        assert_eq!(d.lint_k, None);
        assert_eq!(d.label, None);
    }
}
