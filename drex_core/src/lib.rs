//! # drex_core - Dryer Exhaust Sizing Engine
//!
//! `drex_core` sizes commercial clothes-dryer exhaust systems: per-dryer
//! connector losses, the common manifold diameter, total static pressure and
//! the DEF series exhaust fan that covers the duty. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `calculate` is a pure function of the project and the
//!   injected elevation provider
//! - **JSON-First**: All input and result types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, design problems as warnings
//! - **Traceable**: Every formula applied is recorded for the report appendix
//!
//! ## Quick Start
//!
//! ```rust
//! use drex_core::calculations::{calculate, Dryer, ManifoldSpec};
//! use drex_core::elevation::FixedElevation;
//! use drex_core::project::Project;
//!
//! let mut project = Project::new("Laundromat", "80202", "Owner");
//! project.add_dryer(Dryer::new(300.0, 8, 10.0), 4);
//! project.manifold = ManifoldSpec::new(60.0);
//!
//! let result = calculate(&project, &FixedElevation::feet(5280.0)).unwrap();
//! println!("{} in. manifold, {:.2} in. WC", result.manifold.diameter_in, result.total_static_inwc);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("total_static_inwc"));
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, metadata, and design settings
//! - [`calculations`] - Pressure loss, connectors, manifold, fan selection, system pipeline
//! - [`catalog`] - Fittings, duct sizes and the DEF fan catalog
//! - [`equations`] - Duct formulas and the equation registry
//! - [`elevation`] - Zip code to elevation provider seam
//! - [`pdf`], [`csi_spec`], [`outline`] - Report generation
//! - [`branding`] - Company identity for reports
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`], [`warnings`] - Structured errors and design warnings

pub mod branding;
pub mod calculations;
pub mod catalog;
pub mod csi_spec;
pub mod elevation;
pub mod equations;
pub mod errors;
pub mod outline;
pub mod pdf;
pub mod project;
pub mod units;
pub mod warnings;

// Re-export commonly used types at crate root for convenience
pub use branding::Branding;
pub use calculations::{calculate, CalculationResult, Dryer, ManifoldSpec};
pub use elevation::{ElevationError, ElevationProvider, FixedElevation, NoElevation, SiteLocation};
pub use errors::{CalcError, CalcResult};
pub use project::{DesignSettings, Project, ProjectMetadata};
pub use warnings::DesignWarning;
