//! # Duct Segment Pressure Loss
//!
//! Static pressure drop of one constant-diameter duct segment: a dryer
//! connector or the common manifold.
//!
//! ```text
//! D_ft   = D_in / 12
//! A      = π D_ft² / 4
//! V      = Q / A
//! ΣK     = 0.3 · L / D_ft + Σ(K_fitting · n) + K_add
//! ΔP     = ΣK · ρ · (V / 1096.2)²
//! ```
//!
//! ## Example
//!
//! ```rust
//! use drex_core::calculations::pressure_loss::compute_pressure_loss;
//! use drex_core::catalog::{FittingCount, FittingType};
//!
//! let fittings = [FittingCount::one(FittingType::Elbow90Standard)];
//! let loss = compute_pressure_loss(10.0, 12.0, 300.0, &fittings, 0.075).unwrap();
//! assert!(loss < 0.25);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{fittings_k_sum, FittingCount};
use crate::equations::duct::{duct_velocity_fpm, pressure_loss_inwc, straight_duct_k};
use crate::errors::{CalcError, CalcResult};

/// Loss breakdown for one duct segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLoss {
    /// Mean velocity (FPM)
    pub velocity_fpm: f64,
    /// Straight-duct friction coefficient 0.3·L/D
    pub friction_k: f64,
    /// Fittings plus any additional K
    pub fittings_k: f64,
    /// friction_k + fittings_k
    pub total_k: f64,
    /// Static pressure loss (in. WC)
    pub loss_inwc: f64,
}

fn check_finite(parameter: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_geometry(parameter, value, "Value must be a finite number"));
    }
    Ok(())
}

/// Full loss breakdown of a segment, with an extra K (lint collector,
/// dryer transition, etc.) folded into the fitting sum.
///
/// # Errors
///
/// `InvalidGeometry` when the diameter or flow is not positive, the length
/// is negative, the additional K is negative, the density is not positive,
/// or any value is non-finite.
pub fn segment_loss(
    length_ft: f64,
    diameter_in: f64,
    flow_cfm: f64,
    fittings: &[FittingCount],
    additional_k: f64,
    air_density: f64,
) -> CalcResult<SegmentLoss> {
    check_finite("length_ft", length_ft)?;
    check_finite("diameter_in", diameter_in)?;
    check_finite("flow_cfm", flow_cfm)?;
    check_finite("additional_k", additional_k)?;
    check_finite("air_density", air_density)?;

    if diameter_in <= 0.0 {
        return Err(CalcError::invalid_geometry("diameter_in", diameter_in, "Diameter must be positive"));
    }
    if flow_cfm <= 0.0 {
        return Err(CalcError::invalid_geometry("flow_cfm", flow_cfm, "Flow must be positive"));
    }
    if length_ft < 0.0 {
        return Err(CalcError::invalid_geometry("length_ft", length_ft, "Length cannot be negative"));
    }
    if additional_k < 0.0 {
        return Err(CalcError::invalid_geometry("additional_k", additional_k, "K cannot be negative"));
    }
    if air_density <= 0.0 {
        return Err(CalcError::invalid_geometry("air_density", air_density, "Air density must be positive"));
    }

    let velocity_fpm = duct_velocity_fpm(flow_cfm, diameter_in);
    let friction_k = straight_duct_k(length_ft, diameter_in);
    let fittings_k = fittings_k_sum(fittings) + additional_k;
    let total_k = friction_k + fittings_k;

    Ok(SegmentLoss {
        velocity_fpm,
        friction_k,
        fittings_k,
        total_k,
        loss_inwc: pressure_loss_inwc(total_k, air_density, velocity_fpm),
    })
}

/// Static pressure loss (in. WC) of a duct segment.
///
/// # Arguments
///
/// * `length_ft` - Straight length, ≥ 0
/// * `diameter_in` - Nominal diameter, > 0
/// * `flow_cfm` - Airflow through the segment, > 0
/// * `fittings` - Fittings in the segment
/// * `air_density` - lb/ft³ (0.075 for standard air)
pub fn compute_pressure_loss(
    length_ft: f64,
    diameter_in: f64,
    flow_cfm: f64,
    fittings: &[FittingCount],
    air_density: f64,
) -> CalcResult<f64> {
    segment_loss(length_ft, diameter_in, flow_cfm, fittings, 0.0, air_density).map(|s| s.loss_inwc)
}
