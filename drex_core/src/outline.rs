//! # Presentation Outline
//!
//! Plain-text outline of a sized project, one slide per `# ` heading, for
//! pasting into a slide tool. Mirrors the proposal PDF at a glance level.

use chrono::NaiveDate;

use crate::branding::Branding;
use crate::calculations::CalculationResult;
use crate::project::Project;

/// Render the outline for a project and its result.
pub fn presentation_outline(project: &Project, result: &CalculationResult, branding: &Branding, date: NaiveDate) -> String {
    let mut slides: Vec<String> = Vec::new();

    slides.push(format!(
        "# Commercial Dryer Exhaust System Proposal\n\n- Project: {}\n- Prepared for: {}\n- Prepared by: {}\n- Date: {}",
        project.meta.name,
        if project.meta.prepared_for.is_empty() { "-" } else { &project.meta.prepared_for },
        branding.full_name(),
        date.format("%B %d, %Y")
    ));

    let site = match &result.location {
        Some(loc) => format!("{} ({})", loc.place(), project.meta.zip_code),
        None => format!("Zip {}", project.meta.zip_code),
    };
    slides.push(format!(
        "# Project Overview\n\n- Site: {}\n- Elevation: {:.0} ft\n- Air density: {:.4} lb/ft³\n- Dryers: {}\n- Total airflow: {:.0} CFM",
        site,
        result.elevation_ft,
        result.air_density,
        result.connectors.len(),
        result.total_cfm
    ));

    let mut design = format!(
        "# System Design\n\n- Manifold: {} in. diameter, {:.0} ft ({})\n- Manifold loss: {:.3} in. WC\n- Worst connector loss: {:.3} in. WC\n- Total static pressure: {:.3} in. WC",
        result.manifold.diameter_in,
        result.manifold.length_ft,
        if result.manifold.optimized { "optimized" } else { "specified" },
        result.manifold.loss_inwc,
        result.worst_connector_loss_inwc,
        result.total_static_inwc
    );
    if let Some(worst) = result.worst_connector() {
        design.push_str(&format!("\n- Worst connector: {} ({} in.)", worst.label, worst.diameter_in));
    }
    slides.push(design);

    let fan = match &result.fan {
        Some(fan) => {
            let mut s = format!(
                "# Recommended Fan\n\n- {} {} ({:.0} CFM max, {:.1} in. WC max)\n- Controller: {} constant pressure",
                branding.fan_series, fan.model, fan.max_cfm, fan.max_static_inwc, branding.controller_model
            );
            if let (Some(available), Some(margin)) = (fan.available_cfm, fan.margin_percent) {
                s.push_str(&format!(
                    "\n- Delivers {:.0} CFM at {:.2} in. WC ({:+.0}% margin)",
                    available, result.total_static_inwc, margin
                ));
            }
            if !fan.alternatives.is_empty() {
                s.push_str(&format!("\n- Alternatives: {}", fan.alternatives.join(", ")));
            }
            s
        }
        None => format!(
            "# Recommended Fan\n\n- No standard {} fan covers {:.0} CFM at {:.2} in. WC\n- Contact engineering for a custom selection",
            branding.fan_series, result.total_cfm, result.total_static_inwc
        ),
    };
    slides.push(fan);

    if !result.warnings.is_empty() {
        let items: Vec<String> = result.warnings.iter().map(|w| format!("- {}", w.message())).collect();
        slides.push(format!("# Design Notes\n\n{}", items.join("\n")));
    }

    slides.push(format!(
        "# Next Steps\n\n- Review the proposal and CSI specification\n- Confirm dryer models and duct routing on site\n- Proposal valid for {} days\n- {} | {} | {}",
        branding.proposal_valid_days, branding.website, branding.email, branding.phone
    ));

    let mut out = slides.join("\n\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{calculate, Dryer, ManifoldSpec};
    use crate::elevation::{FixedElevation, SiteLocation};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    #[test]
    fn test_outline_with_fan() {
        let mut project = Project::new("Campus Laundry", "80202", "Facilities");
        project.add_dryer(Dryer::new(300.0, 8, 10.0), 4);
        project.manifold = ManifoldSpec::new(50.0);
        let provider = FixedElevation(SiteLocation::new("Denver", "CO", 5280.0));
        let result = calculate(&project, &provider).unwrap();

        let text = presentation_outline(&project, &result, &Branding::default(), date());
        assert!(text.starts_with("# Commercial Dryer Exhaust System Proposal"));
        assert!(text.contains("- Site: Denver, CO (80202)"));
        assert!(text.contains("- Elevation: 5280 ft"));
        assert!(text.contains("- Total airflow: 1200 CFM"));
        assert!(text.contains("DEF Series DEF"));
        assert!(text.contains("- Date: March 04, 2025"));
        assert!(!text.contains("# Design Notes"));
    }

    #[test]
    fn test_outline_without_fan() {
        let mut project = Project::new("Big Laundry", "10001", "");
        project.add_dryer(Dryer::new(600.0, 12, 10.0), 12);
        project.manifold = ManifoldSpec::new(40.0);
        let result = calculate(&project, &FixedElevation::feet(0.0)).unwrap();
        assert!(result.fan.is_none());

        let text = presentation_outline(&project, &result, &Branding::default(), date());
        assert!(text.contains("- Prepared for: -"));
        assert!(text.contains("No standard DEF Series fan covers 7200 CFM"));
        assert!(text.contains("# Design Notes"));
        assert_eq!(text.matches("\n# ").count() + 1, 6);
    }
}
