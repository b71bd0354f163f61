//! # Fan Selection
//!
//! Picks the first catalog fan, in ascending capacity order, whose rated
//! airflow and static pressure both meet the system requirement. Because the
//! catalog is sorted, the first match is the smallest sufficient fan.
//!
//! The selected fan is then placed on its published curve: the airflow it
//! actually delivers at the required static pressure gives the design margin.
//!
//! ## Example
//!
//! ```rust
//! use drex_core::calculations::fan_selection::select_fan;
//! use drex_core::catalog::DEF_FANS;
//!
//! let fan = select_fan(1500.0, 1.2, &DEF_FANS).unwrap();
//! assert_eq!(fan.name, "DEF015");
//! assert!(select_fan(9000.0, 1.0, &DEF_FANS).is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::FanModel;
use crate::equations::duct::system_curve_coefficient;

/// First fan in `catalog` with `max_cfm >= total_cfm` and
/// `max_static_inwc >= total_static_inwc`.
pub fn select_fan(total_cfm: f64, total_static_inwc: f64, catalog: &[FanModel]) -> Option<&FanModel> {
    catalog.iter().find(|fan| fan.covers(total_cfm, total_static_inwc))
}

/// Selected fan with its operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanSelection {
    pub model: String,
    pub max_cfm: f64,
    pub max_static_inwc: f64,
    /// Airflow on the fan curve at the required static pressure
    pub available_cfm: Option<f64>,
    /// (available - required) / required × 100
    pub margin_percent: Option<f64>,
    /// Larger catalog models that also cover the duty
    pub alternatives: Vec<String>,
}

impl FanSelection {
    /// Build the selection record for `fan` at the given duty.
    pub fn at_duty(fan: &FanModel, total_cfm: f64, total_static_inwc: f64, catalog: &[FanModel]) -> Self {
        let available_cfm = fan.cfm_at_static(total_static_inwc);
        let margin_percent = available_cfm
            .filter(|_| total_cfm > 0.0)
            .map(|available| (available - total_cfm) / total_cfm * 100.0);

        let alternatives = catalog
            .iter()
            .filter(|f| f.name != fan.name && f.max_cfm > fan.max_cfm && f.covers(total_cfm, total_static_inwc))
            .map(|f| f.name.to_string())
            .collect();

        FanSelection {
            model: fan.name.to_string(),
            max_cfm: fan.max_cfm,
            max_static_inwc: fan.max_static_inwc,
            available_cfm,
            margin_percent,
            alternatives,
        }
    }

    /// Does the fan curve deliver the full required airflow?
    pub fn curve_meets_duty(&self, total_cfm: f64) -> bool {
        self.available_cfm.is_some_and(|available| available >= total_cfm)
    }
}

/// One row of the system-curve table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemCurvePoint {
    pub cfm: f64,
    /// k·Q² with k fixed by the manifold operating point
    pub system_static_inwc: f64,
    /// Fan static pressure at this airflow, when on the published curve
    pub fan_static_inwc: Option<f64>,
}

/// Number of rows in the tabulated system curve
pub const SYSTEM_CURVE_POINTS: usize = 12;

/// Tabulate the parabolic system curve `SP = k·Q²` through
/// (`total_cfm`, `manifold_loss_inwc`) from zero to 110% of the fan's free
/// delivery (or of `total_cfm` without a fan).
pub fn system_curve(
    total_cfm: f64,
    manifold_loss_inwc: f64,
    fan: Option<&FanModel>,
) -> Vec<SystemCurvePoint> {
    let k = system_curve_coefficient(manifold_loss_inwc, total_cfm);
    let span = fan.map(|f| f.max_cfm).unwrap_or(total_cfm) * 1.1;
    let step = span / (SYSTEM_CURVE_POINTS - 1) as f64;

    (0..SYSTEM_CURVE_POINTS)
        .map(|i| {
            let cfm = step * i as f64;
            SystemCurvePoint {
                cfm,
                system_static_inwc: k * cfm * cfm,
                fan_static_inwc: fan.and_then(|f| f.static_at_cfm(cfm)),
            }
        })
        .collect()
}
