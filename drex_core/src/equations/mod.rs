//! # Duct Design Equations
//!
//! All airflow and pressure-loss formulas used by the sizing engine live
//! here, so they can be checked against the handbook in one place.
//!
//! ## Modules
//!
//! - [`duct`] - Round duct area, velocity, loss coefficients, velocity pressure, air density
//! - [`registry`] - Equation metadata and tracking for PDF appendix generation
//!
//! ## Conventions
//!
//! - **Diameters**: nominal inches at the API, converted to feet inside formulas
//! - **Lengths**: feet
//! - **Pressures**: inches of water column, positive for a loss
//! - **Density**: lb/ft^3, 0.075 at sea level and 70°F
//!
//! ## References
//!
//! - ASHRAE Handbook - Fundamentals, Ch. 21 (Duct Design)
//! - U.S. Standard Atmosphere, 1976
//! - International Mechanical Code, Section 504 (Clothes Dryer Exhaust)

pub mod duct;
pub mod registry;

pub use duct::{
    altitude_pressure_ratio,
    corrected_air_density,
    duct_area_sqft,
    duct_velocity_fpm,
    pressure_loss_inwc,
    straight_duct_k,
    system_curve_coefficient,
    velocity_pressure_inwc,
    DUCT_FRICTION_COEFFICIENT,
    STANDARD_AIR_DENSITY,
    VELOCITY_PRESSURE_CONSTANT,
};

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
    generate_static_equations_appendix_typst,
    system_calculation_equations,
};
