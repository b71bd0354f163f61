//! # Manifold Sizing
//!
//! The manifold is the common trunk carrying the combined flow of every
//! dryer. Its diameter is either fixed by the designer or chosen by a
//! bounded search over the standard sizes: the smallest diameter whose loss
//! does not exceed the manifold target wins. When no size qualifies, the
//! largest candidate is used and the result is flagged.
//!
//! ## Example
//!
//! ```rust
//! use drex_core::calculations::manifold::optimize_manifold;
//! use drex_core::catalog::MANIFOLD_DIAMETERS_IN;
//!
//! let sizing = optimize_manifold(4500.0, 150.0, &[], 0.0, &MANIFOLD_DIAMETERS_IN, 1.0, 0.075).unwrap();
//! assert!(sizing.meets_target);
//! assert!(sizing.segment.loss_inwc <= 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::pressure_loss::{segment_loss, SegmentLoss};
use crate::catalog::duct_sizes::{describe_sizes, is_manifold_size, MANIFOLD_DIAMETERS_IN};
use crate::catalog::{fittings_summary, FittingCount};
use crate::errors::{CalcError, CalcResult};

/// How the manifold diameter is chosen.
///
/// JSON: `"optimize"` or `{ "manual": 16 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifoldDiameter {
    /// Search the candidate sizes for the smallest acceptable one
    #[default]
    Optimize,
    /// Use this nominal diameter (inches)
    Manual(u32),
}

/// Common manifold (trunk) duct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifoldSpec {
    /// Total straight length (ft)
    pub length_ft: f64,

    /// Fittings along the manifold
    #[serde(default)]
    pub fittings: Vec<FittingCount>,

    /// Extra K for inline equipment (lint collector, damper)
    #[serde(default)]
    pub additional_k: f64,

    #[serde(default)]
    pub diameter: ManifoldDiameter,
}

impl ManifoldSpec {
    pub fn new(length_ft: f64) -> Self {
        ManifoldSpec {
            length_ft,
            fittings: Vec::new(),
            additional_k: 0.0,
            diameter: ManifoldDiameter::Optimize,
        }
    }

    pub fn with_fittings(mut self, fittings: Vec<FittingCount>) -> Self {
        self.fittings = fittings;
        self
    }

    pub fn with_diameter(mut self, diameter: ManifoldDiameter) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn with_additional_k(mut self, k: f64) -> Self {
        self.additional_k = k;
        self
    }

    /// Validate manifold parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.length_ft.is_finite() || self.length_ft < 0.0 {
            return Err(CalcError::invalid_input(
                "manifold.length_ft",
                self.length_ft.to_string(),
                "Length must be zero or more",
            ));
        }
        if !self.additional_k.is_finite() || self.additional_k < 0.0 {
            return Err(CalcError::invalid_input(
                "manifold.additional_k",
                self.additional_k.to_string(),
                "Additional K cannot be negative",
            ));
        }
        if let ManifoldDiameter::Manual(d) = self.diameter {
            if !is_manifold_size(d) {
                return Err(CalcError::invalid_input(
                    "manifold.diameter",
                    d.to_string(),
                    format!("Manifold diameter must be one of {} in", describe_sizes(&MANIFOLD_DIAMETERS_IN)),
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of the diameter search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifoldSizing {
    pub diameter_in: u32,
    pub segment: SegmentLoss,
    /// False when no candidate met the target and the largest was used
    pub meets_target: bool,
}

/// Smallest candidate diameter whose loss is at or below `target_inwc`.
///
/// Candidates are searched in ascending order regardless of input order.
/// When none qualifies, the largest candidate is returned with
/// `meets_target = false`.
///
/// # Errors
///
/// `InvalidInput` for an empty candidate list; `InvalidGeometry` from the
/// loss equation.
pub fn optimize_manifold(
    total_cfm: f64,
    length_ft: f64,
    fittings: &[FittingCount],
    additional_k: f64,
    candidate_diameters: &[u32],
    target_inwc: f64,
    air_density: f64,
) -> CalcResult<ManifoldSizing> {
    let mut candidates = candidate_diameters.to_vec();
    candidates.sort_unstable();
    candidates.dedup();

    let mut largest = None;
    for &diameter_in in &candidates {
        let segment = segment_loss(length_ft, f64::from(diameter_in), total_cfm, fittings, additional_k, air_density)?;
        if segment.loss_inwc <= target_inwc {
            return Ok(ManifoldSizing { diameter_in, segment, meets_target: true });
        }
        largest = Some(ManifoldSizing { diameter_in, segment, meets_target: false });
    }

    largest.ok_or_else(|| {
        CalcError::invalid_input("manifold_candidates", "[]", "At least one candidate diameter is required")
    })
}

/// Result for the manifold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifoldResult {
    pub diameter_in: u32,
    /// True when the diameter came from the optimizer
    pub optimized: bool,
    pub length_ft: f64,
    pub fittings: String,
    pub additional_k: f64,
    /// Combined flow of all dryers (CFM)
    pub flow_cfm: f64,
    pub velocity_fpm: f64,
    pub total_k: f64,
    pub loss_inwc: f64,
    /// loss_inwc > target
    pub exceeds_target: bool,
}

/// Size the manifold in either mode.
pub fn size_manifold(
    spec: &ManifoldSpec,
    total_cfm: f64,
    candidates: &[u32],
    target_inwc: f64,
    air_density: f64,
) -> CalcResult<ManifoldResult> {
    let (diameter_in, segment, optimized) = match spec.diameter {
        ManifoldDiameter::Optimize => {
            let sizing = optimize_manifold(
                total_cfm,
                spec.length_ft,
                &spec.fittings,
                spec.additional_k,
                candidates,
                target_inwc,
                air_density,
            )?;
            (sizing.diameter_in, sizing.segment, true)
        }
        ManifoldDiameter::Manual(d) => {
            let segment = segment_loss(spec.length_ft, f64::from(d), total_cfm, &spec.fittings, spec.additional_k, air_density)?;
            (d, segment, false)
        }
    };

    Ok(ManifoldResult {
        diameter_in,
        optimized,
        length_ft: spec.length_ft,
        fittings: fittings_summary(&spec.fittings),
        additional_k: spec.additional_k,
        flow_cfm: total_cfm,
        velocity_fpm: segment.velocity_fpm,
        total_k: segment.total_k,
        loss_inwc: segment.loss_inwc,
        exceeds_target: segment.loss_inwc > target_inwc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::pressure_loss::compute_pressure_loss;
    use crate::catalog::FittingType;

    fn manifold_fittings() -> Vec<FittingCount> {
        vec![
            FittingCount::new(FittingType::Elbow90Standard, 2),
            FittingCount::one(FittingType::Exit),
        ]
    }

    #[test]
    fn test_picks_smallest_passing() {
        let f = manifold_fittings();
        let sizing = optimize_manifold(4500.0, 150.0, &f, 0.0, &MANIFOLD_DIAMETERS_IN, 1.0, 0.075).unwrap();
        assert!(sizing.meets_target);
        assert!(sizing.segment.loss_inwc <= 1.0);

        // next size down must fail
        let smaller = sizing.diameter_in - 2;
        let loss = compute_pressure_loss(150.0, f64::from(smaller), 4500.0, &f, 0.075).unwrap();
        assert!(loss > 1.0, "{}\" should fail, loss {}", smaller, loss);
    }

    #[test]
    fn test_candidate_order_irrelevant() {
        let f = manifold_fittings();
        let reversed: Vec<u32> = MANIFOLD_DIAMETERS_IN.iter().rev().copied().collect();
        let a = optimize_manifold(2000.0, 60.0, &f, 0.0, &MANIFOLD_DIAMETERS_IN, 1.0, 0.075).unwrap();
        let b = optimize_manifold(2000.0, 60.0, &f, 0.0, &reversed, 1.0, 0.075).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_none_qualifies_returns_largest() {
        let sizing = optimize_manifold(20000.0, 500.0, &[], 0.0, &[6, 8, 10], 1.0, 0.075).unwrap();
        assert_eq!(sizing.diameter_in, 10);
        assert!(!sizing.meets_target);
        assert!(sizing.segment.loss_inwc > 1.0);
    }

    #[test]
    fn test_empty_candidates() {
        let err = optimize_manifold(1000.0, 10.0, &[], 0.0, &[], 1.0, 0.075).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_manual_mode_no_search() {
        let spec = ManifoldSpec::new(100.0)
            .with_fittings(manifold_fittings())
            .with_diameter(ManifoldDiameter::Manual(36));
        let r = size_manifold(&spec, 1000.0, &MANIFOLD_DIAMETERS_IN, 1.0, 0.075).unwrap();
        assert_eq!(r.diameter_in, 36);
        assert!(!r.optimized);
        assert!(!r.exceeds_target);
    }

    #[test]
    fn test_manual_mode_flags_excess() {
        let spec = ManifoldSpec::new(150.0).with_diameter(ManifoldDiameter::Manual(12));
        let r = size_manifold(&spec, 2000.0, &MANIFOLD_DIAMETERS_IN, 1.0, 0.075).unwrap();
        assert!(r.exceeds_target);
        assert!(r.loss_inwc > 1.0);
    }

    #[test]
    fn test_validate() {
        assert!(ManifoldSpec::new(0.0).validate().is_ok());
        assert!(ManifoldSpec::new(-1.0).validate().is_err());
        assert!(ManifoldSpec::new(10.0).with_additional_k(-0.5).validate().is_err());
        assert!(ManifoldSpec::new(10.0).with_diameter(ManifoldDiameter::Manual(15)).validate().is_err());
        assert!(ManifoldSpec::new(10.0).with_diameter(ManifoldDiameter::Manual(16)).validate().is_ok());
    }

    #[test]
    fn test_diameter_json() {
        assert_eq!(serde_json::to_string(&ManifoldDiameter::Optimize).unwrap(), r#""optimize""#);
        assert_eq!(serde_json::to_string(&ManifoldDiameter::Manual(16)).unwrap(), r#"{"manual":16}"#);
        let spec: ManifoldSpec = serde_json::from_str(r#"{"length_ft": 40}"#).unwrap();
        assert_eq!(spec.diameter, ManifoldDiameter::Optimize);
        assert_eq!(spec.additional_k, 0.0);
    }
}
