//! # System Calculation
//!
//! Runs the full sizing pipeline for a validated [`Project`]:
//!
//! ```text
//! zip code → elevation → air density
//!          → connectors (per dryer)
//!          → manifold (optimized or manual)
//!          → SP = manifold loss + worst connector loss
//!          → fan selection + operating point
//! ```
//!
//! Only malformed input fails. Excessive losses, a missing fan or a failed
//! elevation lookup become [`DesignWarning`]s on the result.
//!
//! ## Example
//!
//! ```rust
//! use drex_core::calculations::{calculate, Dryer, ManifoldSpec};
//! use drex_core::elevation::FixedElevation;
//! use drex_core::project::Project;
//!
//! let mut project = Project::new("Laundromat", "80202", "Owner");
//! project.add_dryer(Dryer::new(300.0, 8, 10.0), 6);
//! project.manifold = ManifoldSpec::new(80.0);
//!
//! let result = calculate(&project, &FixedElevation::feet(0.0)).unwrap();
//! assert_eq!(result.total_cfm, 1800.0);
//! assert!(result.fan.is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::connector::{evaluate_connectors, worst_connector_loss, ConnectorResult};
use crate::calculations::fan_selection::{select_fan, system_curve, FanSelection, SystemCurvePoint};
use crate::calculations::manifold::{size_manifold, ManifoldResult};
use crate::catalog::DEF_FANS;
use crate::elevation::{ElevationError, ElevationProvider, SiteLocation};
use crate::equations::duct::corrected_air_density;
use crate::equations::registry::{Equation, EquationTracker};
use crate::errors::CalcResult;
use crate::project::{Project, ELEVATION_RANGE_FT};
use crate::warnings::DesignWarning;

/// Complete sizing result for one project.
///
/// Contains no timestamps, so identical inputs give equal results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Resolved site, when the lookup succeeded
    pub location: Option<SiteLocation>,

    /// Elevation used for air density (ft)
    pub elevation_ft: f64,

    /// Air density used for every loss (lb/ft³)
    pub air_density: f64,

    /// Combined dryer airflow (CFM)
    pub total_cfm: f64,

    pub connectors: Vec<ConnectorResult>,

    pub manifold: ManifoldResult,

    /// Largest single connector loss (in. WC)
    pub worst_connector_loss_inwc: f64,

    /// Manifold loss + worst connector loss (in. WC)
    pub total_static_inwc: f64,

    /// Selected fan, `None` when no catalog fan covers the duty
    pub fan: Option<FanSelection>,

    /// Tabulated system curve against the selected fan's curve
    pub system_curve: Vec<SystemCurvePoint>,

    pub warnings: Vec<DesignWarning>,

    /// Equations applied, for the report appendix
    pub equations: EquationTracker,
}

impl CalculationResult {
    /// True when the design raised no warnings
    pub fn passes(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of connectors above the connector limit
    pub fn flagged_connectors(&self) -> usize {
        self.connectors.iter().filter(|c| c.exceeds_limit).count()
    }

    /// Connector with the largest loss
    pub fn worst_connector(&self) -> Option<&ConnectorResult> {
        self.connectors
            .iter()
            .max_by(|a, b| a.loss_inwc.total_cmp(&b.loss_inwc))
    }
}

/// Resolve the site elevation, falling back to the default on failure.
///
/// A disabled provider ([`ElevationError::Unavailable`]) falls back silently;
/// any other failure, or an elevation outside [`ELEVATION_RANGE_FT`], adds
/// an `ElevationLookupFailed` warning.
fn resolve_site(
    project: &Project,
    provider: &dyn ElevationProvider,
    warnings: &mut Vec<DesignWarning>,
) -> (Option<SiteLocation>, f64) {
    let fallback = project.settings.default_elevation_ft;
    match provider.lookup(&project.meta.zip_code) {
        Ok(location) if ELEVATION_RANGE_FT.contains(&location.elevation_ft) => {
            let elevation = location.elevation_ft;
            (Some(location), elevation)
        }
        Ok(location) => {
            warnings.push(DesignWarning::ElevationLookupFailed {
                zip_code: project.meta.zip_code.clone(),
                reason: format!(
                    "elevation {} ft outside {} to {} ft",
                    location.elevation_ft,
                    ELEVATION_RANGE_FT.start(),
                    ELEVATION_RANGE_FT.end()
                ),
                fallback_elevation_ft: fallback,
            });
            (None, fallback)
        }
        Err(ElevationError::Unavailable) => (None, fallback),
        Err(e) => {
            warnings.push(DesignWarning::ElevationLookupFailed {
                zip_code: project.meta.zip_code.clone(),
                reason: e.to_string(),
                fallback_elevation_ft: fallback,
            });
            (None, fallback)
        }
    }
}

/// Size the exhaust system for `project`.
///
/// # Errors
///
/// Returns the first validation error for malformed input. Nothing after
/// validation fails.
pub fn calculate(project: &Project, elevation: &dyn ElevationProvider) -> CalcResult<CalculationResult> {
    project.validate()?;

    let settings = &project.settings;
    let mut warnings = Vec::new();
    let mut equations = EquationTracker::new();

    let (location, elevation_ft) = resolve_site(project, elevation, &mut warnings);
    let air_density = corrected_air_density(settings.base_air_density, elevation_ft, settings.exhaust_temperature_f);
    equations.record(Equation::AirDensityCorrection, format!("{:.0} ft elevation", elevation_ft));

    // Connectors
    let connectors = evaluate_connectors(&project.dryers, air_density, settings.connector_limit_inwc)?;
    for c in &connectors {
        for eq in [
            Equation::DuctArea,
            Equation::DuctVelocity,
            Equation::StraightDuctLossCoefficient,
            Equation::FittingLossCoefficient,
            Equation::VelocityPressure,
            Equation::DuctPressureLoss,
            Equation::ConnectorLossLimit,
        ] {
            equations.record_for_member(eq, "Connector", c.label.clone());
        }
        if c.exceeds_limit {
            warnings.push(DesignWarning::ExcessiveConnectorLoss {
                dryer_index: c.index,
                label: c.label.clone(),
                loss_inwc: c.loss_inwc,
                limit_inwc: settings.connector_limit_inwc,
            });
        }
    }

    // Manifold
    let total_cfm = project.total_cfm();
    let manifold = size_manifold(
        &project.manifold,
        total_cfm,
        &settings.manifold_candidates,
        settings.manifold_target_inwc,
        air_density,
    )?;
    for eq in [Equation::DuctArea, Equation::DuctVelocity, Equation::StraightDuctLossCoefficient] {
        equations.record_for_member(eq, "Manifold", "Manifold");
    }
    equations.record_for_member(Equation::FittingLossCoefficient, "Manifold", "Manifold");
    equations.record_for_member(Equation::VelocityPressure, "Manifold", "Manifold");
    equations.record_for_member(Equation::DuctPressureLoss, "Manifold", "Manifold");
    if manifold.optimized {
        equations.record_for_member(Equation::ManifoldDiameterSelection, "Diameter search", "Manifold");
    }
    if manifold.exceeds_target {
        warnings.push(DesignWarning::ExcessiveManifoldLoss {
            diameter_in: manifold.diameter_in,
            loss_inwc: manifold.loss_inwc,
            target_inwc: settings.manifold_target_inwc,
            optimized: manifold.optimized,
        });
    }

    // Total static pressure: shared trunk plus the limiting branch
    let worst_connector_loss_inwc = worst_connector_loss(&connectors);
    let total_static_inwc = manifold.loss_inwc + worst_connector_loss_inwc;
    equations.record(Equation::SystemStaticPressure, "System");

    // Fan
    let selected = select_fan(total_cfm, total_static_inwc, &DEF_FANS);
    equations.record(Equation::FanSelectionRule, "System");
    let fan = match selected {
        Some(model) => {
            equations.record_for_member(Equation::FanOperatingPoint, "Operating point", model.name);
            Some(FanSelection::at_duty(model, total_cfm, total_static_inwc, &DEF_FANS))
        }
        None => {
            warnings.push(DesignWarning::NoFanFound { total_cfm, total_static_inwc });
            None
        }
    };

    let system_curve = system_curve(total_cfm, manifold.loss_inwc, selected);
    equations.record(Equation::SystemCurve, "System");

    Ok(CalculationResult {
        location,
        elevation_ft,
        air_density,
        total_cfm,
        connectors,
        manifold,
        worst_connector_loss_inwc,
        total_static_inwc,
        fan,
        system_curve,
        warnings,
        equations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::connector::Dryer;
    use crate::calculations::manifold::{ManifoldDiameter, ManifoldSpec};
    use crate::elevation::{FixedElevation, NoElevation};
    use crate::equations::duct::STANDARD_AIR_DENSITY;

    struct FailingLookup;

    impl ElevationProvider for FailingLookup {
        fn lookup(&self, _zip_code: &str) -> Result<SiteLocation, ElevationError> {
            Err(ElevationError::Request("timed out".to_string()))
        }
    }

    fn project(dryers: usize) -> Project {
        let mut p = Project::new("Test", "80202", "Customer");
        p.add_dryer(Dryer::new(300.0, 8, 10.0), dryers);
        p.manifold = ManifoldSpec::new(50.0);
        p
    }

    #[test]
    fn test_total_static_is_manifold_plus_worst() {
        let mut p = project(3);
        p.dryers[1].length_ft = 30.0;
        let r = calculate(&p, &NoElevation).unwrap();

        let worst = r.connectors.iter().map(|c| c.loss_inwc).fold(0.0, f64::max);
        assert_eq!(r.worst_connector_loss_inwc, worst);
        assert_eq!(r.worst_connector().unwrap().index, 1);
        assert!((r.total_static_inwc - (r.manifold.loss_inwc + worst)).abs() < 1e-12);

        let sum: f64 = r.connectors.iter().map(|c| c.loss_inwc).sum();
        assert!(r.total_static_inwc < r.manifold.loss_inwc + sum);
    }

    #[test]
    fn test_offline_uses_default_elevation_silently() {
        let mut p = project(2);
        p.settings.default_elevation_ft = 1000.0;
        let r = calculate(&p, &NoElevation).unwrap();
        assert_eq!(r.elevation_ft, 1000.0);
        assert!(r.location.is_none());
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn test_failed_lookup_warns() {
        let r = calculate(&project(2), &FailingLookup).unwrap();
        assert_eq!(r.elevation_ft, 0.0);
        assert_eq!(r.air_density, STANDARD_AIR_DENSITY);
        assert_eq!(r.warnings.len(), 1);
        assert_eq!(r.warnings[0].code(), "ELEVATION_LOOKUP_FAILED");
    }

    #[test]
    fn test_out_of_range_elevation_falls_back() {
        let mut p = project(2);
        p.settings.default_elevation_ft = 500.0;
        for feet in [200000.0, -5000.0, f64::NAN] {
            let r = calculate(&p, &FixedElevation::feet(feet)).unwrap();
            assert_eq!(r.elevation_ft, 500.0);
            assert!(r.location.is_none());
            assert!(r.air_density.is_finite());
            assert_eq!(r.warnings.len(), 1);
            match &r.warnings[0] {
                DesignWarning::ElevationLookupFailed { zip_code, fallback_elevation_ft, .. } => {
                    assert_eq!(zip_code, "80202");
                    assert_eq!(*fallback_elevation_ft, 500.0);
                }
                other => panic!("unexpected warning {:?}", other),
            }
        }
    }

    #[test]
    fn test_elevation_range_edges_accepted() {
        let p = project(1);
        let high = calculate(&p, &FixedElevation::feet(30000.0)).unwrap();
        assert_eq!(high.elevation_ft, 30000.0);
        assert!(high.warnings.iter().all(|w| w.code() != "ELEVATION_LOOKUP_FAILED"));
    }

    #[test]
    fn test_altitude_lowers_losses() {
        let p = project(4);
        let sea = calculate(&p, &FixedElevation::feet(0.0)).unwrap();
        let denver = calculate(&p, &FixedElevation::feet(5280.0)).unwrap();
        assert!(denver.air_density < sea.air_density);
        assert!(denver.connectors[0].loss_inwc < sea.connectors[0].loss_inwc);
        assert_eq!(denver.location.as_ref().unwrap().elevation_ft, 5280.0);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut p = project(1);
        p.dryers[0].flow_cfm = -10.0;
        let err = calculate(&p, &NoElevation).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_manual_manifold_recorded() {
        let mut p = project(2);
        p.manifold.diameter = ManifoldDiameter::Manual(10);
        let r = calculate(&p, &NoElevation).unwrap();
        assert_eq!(r.manifold.diameter_in, 10);
        assert!(!r.manifold.optimized);
        assert!(!r.equations.unique_equations().contains(&Equation::ManifoldDiameterSelection));
    }

    #[test]
    fn test_equations_tracked_per_dryer() {
        let r = calculate(&project(2), &NoElevation).unwrap();
        let by_eq = r.equations.by_equation();
        // two connectors + manifold
        assert_eq!(by_eq[&Equation::DuctPressureLoss].len(), 3);
        assert!(r.equations.unique_equations().contains(&Equation::FanOperatingPoint));
    }

    #[test]
    fn test_result_json() {
        let r = calculate(&project(2), &NoElevation).unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"total_static_inwc\""));
        assert!(json.contains("\"exceeds_limit\":false"));
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.connectors.len(), 2);
        assert_eq!(back.manifold.diameter_in, r.manifold.diameter_in);
        assert_eq!(back.fan.map(|f| f.model), r.fan.map(|f| f.model));
    }
}
