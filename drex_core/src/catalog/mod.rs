//! # Static Catalogs
//!
//! Read-only tables shared by every calculation:
//!
//! - [`fittings`] - Fitting types and their loss coefficients
//! - [`duct_sizes`] - Supported connector and manifold diameters
//! - [`fans`] - DEF fan series ratings and curves
//!
//! All data is `const`/`static`; nothing here is mutated at runtime.

pub mod duct_sizes;
pub mod fans;
pub mod fittings;

pub use duct_sizes::{is_connector_size, is_manifold_size, CONNECTOR_DIAMETERS_IN, MANIFOLD_DIAMETERS_IN};
pub use fans::{find_fan, CurvePoint, FanModel, DEF_FANS};
pub use fittings::{fittings_k_sum, fittings_summary, FittingCount, FittingType};
