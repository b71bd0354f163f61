//! # Sizing Calculations
//!
//! Each stage of the exhaust sizing pipeline follows the pattern:
//!
//! - input types (JSON-serializable, with `validate()`)
//! - result types (JSON-serializable)
//! - pure functions from one to the other returning `CalcResult`
//!
//! ## Stages
//!
//! - [`pressure_loss`] - Static pressure loss of one duct segment
//! - [`connector`] - Per-dryer connector losses and the connector limit
//! - [`manifold`] - Manifold diameter search or manual sizing
//! - [`fan_selection`] - Fan catalog scan, operating point, system curve
//! - [`system`] - The whole pipeline for a [`Project`](crate::project::Project)

pub mod connector;
pub mod fan_selection;
pub mod manifold;
pub mod pressure_loss;
pub mod system;

pub use connector::{evaluate_connectors, ConnectorResult, Dryer};
pub use fan_selection::{select_fan, FanSelection, SystemCurvePoint};
pub use manifold::{optimize_manifold, ManifoldDiameter, ManifoldResult, ManifoldSpec};
pub use pressure_loss::{compute_pressure_loss, SegmentLoss};
pub use system::{calculate, CalculationResult};
