//! # Unit Types
//!
//! Type-safe wrappers for the duct-design units used by the sizing engine.
//! They are plain `f64` newtypes that serialize as bare numbers.
//!
//! ## US Customary Units (Primary)
//!
//! Duct design in the US is done in:
//! - Length: feet (ft) for runs, inches (in) for duct diameters
//! - Airflow: cubic feet per minute (CFM)
//! - Velocity: feet per minute (FPM)
//! - Static pressure: inches of water column (in. WC), kept as plain `f64`
//!
//! Elevation services report meters, hence [`Meters`].
//!
//! ## Example
//!
//! ```rust
//! use drex_core::units::{Feet, Inches, Meters};
//!
//! let diameter = Inches(12.0);
//! let diameter_ft: Feet = diameter.into();
//! assert_eq!(diameter_ft.0, 1.0);
//!
//! let elevation: Feet = Meters(100.0).into();
//! assert!((elevation.0 - 328.084).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Feet per meter (exact to the precision elevation services use)
pub const FEET_PER_METER: f64 = 3.28084;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 * FEET_PER_METER)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

impl SqFt {
    /// Cross-sectional area of a round duct
    pub fn circle(diameter: Feet) -> Self {
        SqFt(std::f64::consts::PI * diameter.0 * diameter.0 / 4.0)
    }
}

// ============================================================================
// Airflow Units
// ============================================================================

/// Volumetric airflow in cubic feet per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cfm(pub f64);

/// Air velocity in feet per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fpm(pub f64);

impl Div<SqFt> for Cfm {
    type Output = Fpm;
    fn div(self, rhs: SqFt) -> Fpm {
        Fpm(self.0 / rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(Inches);
impl_arithmetic!(Meters);
impl_arithmetic!(SqFt);
impl_arithmetic!(Cfm);
impl_arithmetic!(Fpm);
