//! # Round Duct Airflow Formulas
//!
//! Fundamental equations for exhaust airflow in round duct, in US customary
//! duct-design units.
//!
//! ## Notation
//!
//! - `Q` = Volumetric flow (CFM)
//! - `D` = Duct diameter (in, converted to ft where noted)
//! - `A` = Cross-sectional area (ft²)
//! - `V` = Mean velocity (FPM)
//! - `L` = Straight duct length (ft)
//! - `K` = Dimensionless loss coefficient
//! - `ρ` = Air density (lb/ft³)
//! - `ΔP` = Static pressure loss (in. WC)
//!
//! ## References
//!
//! - ASHRAE Handbook - Fundamentals, Ch. 21 (Duct Design)
//! - U.S. Standard Atmosphere, 1976 (pressure ratio vs altitude)

use crate::units::{Cfm, Feet, Inches, SqFt};

/// Standard air density at sea level and 70°F (lb/ft³)
pub const STANDARD_AIR_DENSITY: f64 = 0.075;

/// Velocity pressure constant: V_p = ρ (V / 1096.2)² gives in. WC for V in FPM
pub const VELOCITY_PRESSURE_CONSTANT: f64 = 1096.2;

/// Straight-duct friction coefficient applied to L/D (D in feet)
pub const DUCT_FRICTION_COEFFICIENT: f64 = 0.3;

/// Standard air temperature in degrees Rankine (70°F)
pub const STANDARD_TEMPERATURE_R: f64 = 530.0;

/// Offset from °F to °R
pub const RANKINE_OFFSET: f64 = 460.0;

/// Cross-sectional area of a round duct.
///
/// # Formula
/// A = π (D/12)² / 4
#[inline]
pub fn duct_area_sqft(diameter_in: f64) -> f64 {
    SqFt::circle(Feet::from(Inches(diameter_in))).0
}

/// Mean air velocity in a round duct.
///
/// # Formula
/// V = Q / A
#[inline]
pub fn duct_velocity_fpm(flow_cfm: f64, diameter_in: f64) -> f64 {
    (Cfm(flow_cfm) / SqFt(duct_area_sqft(diameter_in))).0
}

/// Equivalent K of a straight run.
///
/// # Formula
/// K_f = 0.3 · L / D  (D in feet)
#[inline]
pub fn straight_duct_k(length_ft: f64, diameter_in: f64) -> f64 {
    let diameter_ft = Feet::from(Inches(diameter_in)).0;
    DUCT_FRICTION_COEFFICIENT * (length_ft / diameter_ft)
}

/// Velocity pressure.
///
/// # Formula
/// V_p = ρ (V / 1096.2)²
#[inline]
pub fn velocity_pressure_inwc(velocity_fpm: f64, air_density: f64) -> f64 {
    let ratio = velocity_fpm / VELOCITY_PRESSURE_CONSTANT;
    air_density * ratio * ratio
}

/// Static pressure loss of a segment with total loss coefficient `total_k`.
///
/// # Formula
/// ΔP = ΣK · ρ · (V / 1096.2)²
#[inline]
pub fn pressure_loss_inwc(total_k: f64, air_density: f64, velocity_fpm: f64) -> f64 {
    total_k * velocity_pressure_inwc(velocity_fpm, air_density)
}

/// Pressure ratio of the standard atmosphere at an elevation.
///
/// # Formula
/// P/P₀ = (1 − 6.8754×10⁻⁶ · h)^5.2559  (h in ft)
#[inline]
pub fn altitude_pressure_ratio(elevation_ft: f64) -> f64 {
    (1.0 - 6.8754e-6 * elevation_ft).powf(5.2559)
}

/// Air density corrected for site elevation and exhaust temperature.
///
/// # Formula
/// ρ = ρ₀ · (P/P₀) · 530 / (460 + T)
///
/// # Arguments
/// * `base_density` - Density at sea level and 70°F (lb/ft³)
/// * `elevation_ft` - Site elevation
/// * `temperature_f` - Exhaust air temperature; `None` keeps 70°F
pub fn corrected_air_density(base_density: f64, elevation_ft: f64, temperature_f: Option<f64>) -> f64 {
    let temperature_ratio = match temperature_f {
        Some(t) => STANDARD_TEMPERATURE_R / (RANKINE_OFFSET + t),
        None => 1.0,
    };
    base_density * altitude_pressure_ratio(elevation_ft) * temperature_ratio
}

/// Coefficient of the parabolic system curve through an operating point.
///
/// # Formula
/// SP = k · Q²  →  k = SP / Q²
#[inline]
pub fn system_curve_coefficient(static_inwc: f64, flow_cfm: f64) -> f64 {
    if flow_cfm > 0.0 {
        static_inwc / (flow_cfm * flow_cfm)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_area_of_12_inch_duct() {
        assert!((duct_area_sqft(12.0) - std::f64::consts::FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_velocity() {
        // 300 CFM in 12" duct: 300 / 0.7854 = 381.97 FPM
        let v = duct_velocity_fpm(300.0, 12.0);
        assert!((v - 381.9719).abs() < 1e-3);
    }

    #[test]
    fn test_straight_duct_k() {
        // 10 ft of 12" duct: 0.3 * 10 / 1 = 3.0
        assert!((straight_duct_k(10.0, 12.0) - 3.0).abs() < EPS);
        // 150 ft of 24" duct: 0.3 * 150 / 2 = 22.5
        assert!((straight_duct_k(150.0, 24.0) - 22.5).abs() < EPS);
    }

    #[test]
    fn test_velocity_pressure_at_1096_fpm() {
        // V = 1096.2 FPM gives exactly ρ
        assert!((velocity_pressure_inwc(1096.2, 0.075) - 0.075).abs() < EPS);
    }

    #[test]
    fn test_pressure_loss_scales_with_k() {
        let one = pressure_loss_inwc(1.0, 0.075, 2000.0);
        let three = pressure_loss_inwc(3.0, 0.075, 2000.0);
        assert!((three - 3.0 * one).abs() < EPS);
    }

    #[test]
    fn test_density_sea_level_standard() {
        assert_eq!(corrected_air_density(0.075, 0.0, None), 0.075);
    }

    #[test]
    fn test_density_at_altitude() {
        // Denver, ~5280 ft: ratio ≈ 0.8325
        let rho = corrected_air_density(0.075, 5280.0, None);
        assert!((rho / 0.075 - 0.8325).abs() < 0.001);
    }

    #[test]
    fn test_density_hot_exhaust() {
        // 120°F exhaust: 0.075 * 530 / 580 = 0.06853
        let rho = corrected_air_density(0.075, 0.0, Some(120.0));
        assert!((rho - 0.068534).abs() < 1e-5);
    }

    #[test]
    fn test_system_curve_coefficient() {
        let k = system_curve_coefficient(1.0, 1000.0);
        assert!((k - 1e-6).abs() < 1e-15);
        assert_eq!(system_curve_coefficient(1.0, 0.0), 0.0);
    }
}
