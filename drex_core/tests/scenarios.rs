//! End-to-end sizing scenarios through the public API.

use drex_core::calculations::{calculate, compute_pressure_loss, optimize_manifold, select_fan, Dryer, ManifoldDiameter, ManifoldSpec};
use drex_core::catalog::{FittingCount, FittingType, DEF_FANS, MANIFOLD_DIAMETERS_IN};
use drex_core::elevation::{FixedElevation, SiteLocation};
use drex_core::equations::STANDARD_AIR_DENSITY;
use drex_core::project::Project;
use drex_core::warnings::DesignWarning;

fn sea_level() -> FixedElevation {
    FixedElevation::feet(0.0)
}

fn bank(count: usize, cfm: f64, diameter_in: u32, manifold: ManifoldSpec) -> Project {
    let mut project = Project::new("Scenario", "10001", "Owner");
    project.add_dryer(Dryer::new(cfm, diameter_in, 10.0), count);
    project.manifold = manifold;
    project
}

#[test]
fn single_dryer_connector_within_limit() {
    let mut project = Project::new("Scenario A", "10001", "Owner");
    project.add_dryer(
        Dryer::new(300.0, 12, 10.0).with_fittings(vec![FittingCount::one(FittingType::Elbow90Standard)]),
        1,
    );
    project.manifold = ManifoldSpec::new(20.0);

    let result = calculate(&project, &sea_level()).unwrap();
    let connector = &result.connectors[0];
    assert!((connector.loss_inwc - 0.0319).abs() < 1e-3, "loss {}", connector.loss_inwc);
    assert!(connector.loss_inwc < 0.25);
    assert!(!connector.exceeds_limit);
    assert!(!result
        .warnings
        .iter()
        .any(|w| matches!(w, DesignWarning::ExcessiveConnectorLoss { .. })));
}

#[test]
fn fifteen_dryers_optimized_manifold() {
    let manifold = ManifoldSpec::new(150.0).with_fittings(vec![
        FittingCount::new(FittingType::Elbow90Standard, 2),
        FittingCount::one(FittingType::Exit),
    ]);
    let result = calculate(&bank(15, 300.0, 8, manifold), &sea_level()).unwrap();

    assert_eq!(result.total_cfm, 4500.0);
    assert!(result.manifold.optimized);
    assert_eq!(result.manifold.diameter_in, 32);
    assert!(result.manifold.loss_inwc <= 1.0);
    assert!(!result.manifold.exceeds_target);

    let fan = result.fan.as_ref().unwrap();
    let position = DEF_FANS.iter().position(|f| f.name == fan.model).unwrap();
    let def035 = DEF_FANS.iter().position(|f| f.name == "DEF035").unwrap();
    assert!(position >= def035);
    assert_eq!(fan.model, "DEF050");
}

#[test]
fn airflow_beyond_catalog_has_no_fan() {
    let result = calculate(&bank(12, 600.0, 12, ManifoldSpec::new(40.0)), &sea_level()).unwrap();

    assert_eq!(result.total_cfm, 7200.0);
    assert!(result.fan.is_none());
    assert!(result.warnings.iter().any(|w| matches!(
        w,
        DesignWarning::NoFanFound { total_cfm, .. } if *total_cfm == 7200.0
    )));
    assert!(result.system_curve.iter().all(|p| p.fan_static_inwc.is_none()));
}

#[test]
fn manual_diameter_over_target_still_reports_loss() {
    let manifold = ManifoldSpec::new(100.0)
        .with_fittings(vec![FittingCount::one(FittingType::Exit)])
        .with_diameter(ManifoldDiameter::Manual(20));
    let result = calculate(&bank(8, 300.0, 8, manifold), &sea_level()).unwrap();

    assert_eq!(result.manifold.diameter_in, 20);
    assert!(!result.manifold.optimized);
    assert!((result.manifold.loss_inwc - 1.435).abs() < 0.01, "loss {}", result.manifold.loss_inwc);
    assert!(result.manifold.exceeds_target);
    assert!(result.warnings.iter().any(|w| matches!(
        w,
        DesignWarning::ExcessiveManifoldLoss { diameter_in: 20, optimized: false, .. }
    )));
    assert!(result.total_static_inwc > result.manifold.loss_inwc);
}

#[test]
fn identical_inputs_give_equal_results() {
    let project = bank(6, 300.0, 8, ManifoldSpec::new(80.0));
    let provider = FixedElevation(SiteLocation::new("Denver", "CO", 5280.0));

    let first = calculate(&project, &provider).unwrap();
    let second = calculate(&project, &provider).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn altitude_lowers_losses() {
    let project = bank(6, 300.0, 8, ManifoldSpec::new(80.0));
    let low = calculate(&project, &sea_level()).unwrap();
    let high = calculate(&project, &FixedElevation::feet(5000.0)).unwrap();

    assert!(high.air_density < low.air_density);
    assert!(high.worst_connector_loss_inwc < low.worst_connector_loss_inwc);
}

#[test]
fn pressure_loss_is_monotonic() {
    let fittings = [FittingCount::one(FittingType::Elbow90Standard)];
    let loss = |length: f64, diameter: f64, flow: f64| {
        compute_pressure_loss(length, diameter, flow, &fittings, STANDARD_AIR_DENSITY).unwrap()
    };

    let mut previous = 0.0;
    for length in [0.0, 5.0, 10.0, 25.0, 50.0, 100.0] {
        let l = loss(length, 8.0, 300.0);
        assert!(l > previous || (length == 0.0 && l > 0.0));
        previous = l;
    }

    let mut previous = 0.0;
    for flow in [100.0, 200.0, 400.0, 800.0] {
        let l = loss(10.0, 8.0, flow);
        assert!(l > previous);
        previous = l;
    }

    let mut previous = f64::INFINITY;
    for diameter in [4.0, 6.0, 8.0, 10.0, 12.0] {
        let l = loss(10.0, diameter, 300.0);
        assert!(l < previous);
        previous = l;
    }
}

#[test]
fn optimizer_picks_smallest_passing_candidate() {
    let fittings = [FittingCount::one(FittingType::Exit)];
    let sizing = optimize_manifold(3000.0, 60.0, &fittings, 0.0, &MANIFOLD_DIAMETERS_IN, 1.0, STANDARD_AIR_DENSITY).unwrap();
    assert!(sizing.meets_target);
    assert!(sizing.segment.loss_inwc <= 1.0);

    let smaller: Vec<u32> = MANIFOLD_DIAMETERS_IN.iter().copied().filter(|&d| d < sizing.diameter_in).collect();
    for d in smaller {
        let l = compute_pressure_loss(60.0, d as f64, 3000.0, &fittings, STANDARD_AIR_DENSITY).unwrap();
        assert!(l > 1.0, "{} in. also passes", d);
    }
}

#[test]
fn fan_selection_is_first_covering_entry() {
    for cfm in [200.0, 900.0, 1500.0, 2400.0, 4000.0, 5800.0, 7000.0] {
        for sp in [0.5, 1.0, 1.5, 1.9, 2.5] {
            let expected = DEF_FANS.iter().find(|f| f.max_cfm >= cfm && f.max_static_inwc >= sp);
            let selected = select_fan(cfm, sp, &DEF_FANS);
            assert_eq!(selected.map(|f| f.name), expected.map(|f| f.name), "{} CFM at {}", cfm, sp);
            assert_eq!(selected.is_none(), !DEF_FANS.iter().any(|f| f.covers(cfm, sp)));
        }
    }
}

#[test]
fn over_limit_connector_is_warned_by_index() {
    let mut project = Project::new("Mixed bank", "10001", "Owner");
    project.add_dryer(Dryer::new(300.0, 8, 10.0), 2);
    project.add_dryer(Dryer::new(600.0, 4, 25.0).with_label("Washer-dryer combo"), 1);
    project.manifold = ManifoldSpec::new(40.0);

    let result = calculate(&project, &sea_level()).unwrap();
    assert_eq!(result.flagged_connectors(), 1);
    assert!(result.connectors[2].exceeds_limit);
    assert!(result.connectors[2].loss_inwc > 0.25);

    let flagged: Vec<_> = result
        .warnings
        .iter()
        .filter_map(|w| match w {
            DesignWarning::ExcessiveConnectorLoss { dryer_index, label, limit_inwc, .. } => {
                Some((*dryer_index, label.clone(), *limit_inwc))
            }
            _ => None,
        })
        .collect();
    assert_eq!(flagged, vec![(2, "Washer-dryer combo".to_string(), 0.25)]);
    assert_eq!(result.worst_connector().unwrap().index, 2);
    assert!(!result.passes());
}

#[test]
fn optimizer_without_passing_size_uses_largest_and_warns() {
    let manifold = ManifoldSpec::new(500.0);
    let result = calculate(&bank(20, 1000.0, 12, manifold), &sea_level()).unwrap();

    assert_eq!(result.total_cfm, 20000.0);
    assert!(result.manifold.optimized);
    assert_eq!(result.manifold.diameter_in, 36);
    assert!(result.manifold.exceeds_target);
    assert!(result.manifold.loss_inwc > 1.0);
    assert!(result.warnings.iter().any(|w| matches!(
        w,
        DesignWarning::ExcessiveManifoldLoss { diameter_in: 36, optimized: true, loss_inwc, .. } if *loss_inwc > 1.0
    )));
}
