//! # Equation Registry
//!
//! Central registry of the duct-design equations used by the sizing engine.
//! Each equation has metadata including references, formulas, and variable
//! definitions.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Full metadata for PDF generation and audit trails
//! - Serialization support for JSON export
//!
//! ## Usage
//!
//! ```rust
//! use drex_core::equations::registry::{Equation, EquationUsage};
//!
//! // Track equation usage during calculation
//! let usage = EquationUsage::new(Equation::DuctPressureLoss, "Dryer 1 connector");
//!
//! // Get metadata for PDF appendix
//! let meta = Equation::DuctPressureLoss.metadata();
//! println!("Formula: {}", meta.formula_typst);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Reference to a design handbook, code or data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// ASHRAE Handbook - Fundamentals
    Ashrae {
        year: u16,
        chapter: u8,
    },
    /// International Mechanical Code
    Imc {
        year: u16,
        section: &'static str,
    },
    /// U.S. Standard Atmosphere
    StandardAtmosphere {
        year: u16,
    },
    /// Manufacturer's published performance data
    ManufacturerData {
        product: &'static str,
    },
    /// Engineering procedure used by this program (no external reference)
    DesignProcedure,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Ashrae { year, chapter } => {
                format!("ASHRAE Handbook - Fundamentals {}, Ch. {}", year, chapter)
            }
            CodeReference::Imc { year, section } => {
                format!("IMC {} Section {}", year, section)
            }
            CodeReference::StandardAtmosphere { year } => {
                format!("U.S. Standard Atmosphere, {}", year)
            }
            CodeReference::ManufacturerData { product } => {
                format!("{} published performance data", product)
            }
            CodeReference::DesignProcedure => "Design Procedure".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::Ashrae { .. } => "ASHRAE",
            CodeReference::Imc { .. } => "IMC",
            CodeReference::StandardAtmosphere { .. } => "Std. Atmosphere",
            CodeReference::ManufacturerData { .. } => "Mfr. Data",
            CodeReference::DesignProcedure => "Procedure",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the PDF appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Air properties (density corrections)
    AirProperties,
    /// Duct geometry and velocity
    Airflow,
    /// Friction and fitting loss coefficients
    LossCoefficients,
    /// Static pressure loss
    PressureLoss,
    /// System-level sizing rules (static pressure, manifold diameter)
    SystemSizing,
    /// Fan selection and operating point
    FanSelection,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::AirProperties => "Air Properties",
            EquationCategory::Airflow => "Airflow",
            EquationCategory::LossCoefficients => "Loss Coefficients",
            EquationCategory::PressureLoss => "Pressure Loss",
            EquationCategory::SystemSizing => "System Sizing",
            EquationCategory::FanSelection => "Fan Selection",
        }
    }

    /// Sort order for PDF appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::AirProperties => 1,
            EquationCategory::Airflow => 2,
            EquationCategory::LossCoefficients => 3,
            EquationCategory::PressureLoss => 4,
            EquationCategory::SystemSizing => 5,
            EquationCategory::FanSelection => 6,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "V", "D", "rho")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "FPM", "in", "lb/ft^3")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for a duct-design equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name (e.g., "Duct Pressure Loss")
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    /// Code/standard reference
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping in appendix
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation (for linking)
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All duct-design equations used in Drex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// ρ = ρ₀ (P/P₀) 530/(460+T)
    AirDensityCorrection,
    /// A = π D² / 4
    DuctArea,
    /// V = Q / A
    DuctVelocity,
    /// K_f = 0.3 L / D
    StraightDuctLossCoefficient,
    /// ΣK over fittings and lint collectors
    FittingLossCoefficient,
    /// V_p = ρ (V/1096.2)²
    VelocityPressure,
    /// ΔP = (K_f + ΣK) V_p
    DuctPressureLoss,
    /// Connector warning: ΔP > 0.25 in. WC
    ConnectorLossLimit,
    /// Smallest manifold diameter with ΔP ≤ target
    ManifoldDiameterSelection,
    /// SP = ΔP_manifold + max ΔP_connector
    SystemStaticPressure,
    /// First catalog fan covering CFM and SP
    FanSelectionRule,
    /// Q_available by interpolation of the fan curve
    FanOperatingPoint,
    /// SP = k Q²
    SystemCurve,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::AirDensityCorrection => EquationMetadata {
                name: "Air Density Correction",
                description: "Exhaust air density adjusted for site elevation and exhaust temperature",
                formula_typst: r#"$rho = rho_0 (1 - 6.8754 times 10^(-6) h)^(5.2559) dot 530 / (460 + T)$"#,
                formula_plain: "rho = rho0 * (1 - 6.8754e-6 * h)^5.2559 * 530 / (460 + T)",
                reference: CodeReference::StandardAtmosphere { year: 1976 },
                variables: vec![
                    Variable::new("rho", "Corrected air density", "lb/ft^3"),
                    Variable::new("rho_0", "Standard air density (0.075)", "lb/ft^3"),
                    Variable::new("h", "Site elevation", "ft"),
                    Variable::new("T", "Exhaust air temperature (70 if not given)", "°F"),
                ],
                assumptions: vec!["Ideal gas", "Standard lapse rate", "Dry air"],
                category: EquationCategory::AirProperties,
                source_module: "equations/duct.rs",
                source_function: "corrected_air_density",
            },

            Equation::DuctArea => EquationMetadata {
                name: "Round Duct Area",
                description: "Cross-sectional area of a round duct from its nominal diameter",
                formula_typst: r#"$A = pi (D / 12)^2 / 4$"#,
                formula_plain: "A = pi * (D/12)^2 / 4",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("A", "Cross-sectional area", "ft^2"),
                    Variable::new("D", "Nominal duct diameter", "in"),
                ],
                assumptions: vec!["Nominal diameter equals inside diameter"],
                category: EquationCategory::Airflow,
                source_module: "equations/duct.rs",
                source_function: "duct_area_sqft",
            },

            Equation::DuctVelocity => EquationMetadata {
                name: "Mean Duct Velocity",
                description: "Mean air velocity from volumetric flow and area",
                formula_typst: r#"$V = Q / A$"#,
                formula_plain: "V = Q / A",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("V", "Mean velocity", "FPM"),
                    Variable::new("Q", "Airflow", "CFM"),
                    Variable::new("A", "Cross-sectional area", "ft^2"),
                ],
                assumptions: vec!["Incompressible flow", "Uniform velocity profile"],
                category: EquationCategory::Airflow,
                source_module: "equations/duct.rs",
                source_function: "duct_velocity_fpm",
            },

            Equation::StraightDuctLossCoefficient => EquationMetadata {
                name: "Straight Duct Loss Coefficient",
                description: "Friction loss of a straight run expressed as an equivalent K",
                formula_typst: r#"$K_f = 0.3 dot L / D_"ft"$"#,
                formula_plain: "K_f = 0.3 * L / D_ft",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("K_f", "Friction loss coefficient", "-"),
                    Variable::new("L", "Straight duct length", "ft"),
                    Variable::new("D_\"ft\"", "Duct diameter", "ft"),
                ],
                assumptions: vec!["Galvanized steel duct", "Fully turbulent flow"],
                category: EquationCategory::LossCoefficients,
                source_module: "equations/duct.rs",
                source_function: "straight_duct_k",
            },

            Equation::FittingLossCoefficient => EquationMetadata {
                name: "Fitting Loss Coefficient Sum",
                description: "Sum of fitting K-values times occurrence count, plus any lint collector or additional K",
                formula_typst: r#"$Sigma K = sum_i n_i K_i + K_"add"$"#,
                formula_plain: "SUM(K) = SUM(n_i * K_i) + K_add",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("n_i", "Count of fitting type i", "-"),
                    Variable::new("K_i", "Loss coefficient of fitting type i", "-"),
                    Variable::new("K_\"add\"", "Lint collector / additional coefficient", "-"),
                ],
                assumptions: vec!["Fitting losses are independent (no interaction)"],
                category: EquationCategory::LossCoefficients,
                source_module: "catalog/fittings.rs",
                source_function: "fittings_k_sum",
            },

            Equation::VelocityPressure => EquationMetadata {
                name: "Velocity Pressure",
                description: "Velocity pressure of the airstream",
                formula_typst: r#"$V_p = rho (V / 1096.2)^2$"#,
                formula_plain: "Vp = rho * (V / 1096.2)^2",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("V_p", "Velocity pressure", "in. WC"),
                    Variable::new("rho", "Air density", "lb/ft^3"),
                    Variable::new("V", "Mean velocity", "FPM"),
                ],
                assumptions: vec!["US customary units"],
                category: EquationCategory::PressureLoss,
                source_module: "equations/duct.rs",
                source_function: "velocity_pressure_inwc",
            },

            Equation::DuctPressureLoss => EquationMetadata {
                name: "Duct Pressure Loss",
                description: "Static pressure loss of a duct segment including friction and fittings",
                formula_typst: r#"$Delta P = (0.3 L / D_"ft" + Sigma K) rho (V / 1096.2)^2$"#,
                formula_plain: "dP = (0.3 * L / D_ft + SUM(K)) * rho * (V / 1096.2)^2",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("Delta P", "Static pressure loss", "in. WC"),
                    Variable::new("L", "Segment length", "ft"),
                    Variable::new("D_\"ft\"", "Segment diameter", "ft"),
                    Variable::new("Sigma K", "Fitting loss coefficients", "-"),
                ],
                assumptions: vec!["Constant diameter segment", "Constant flow along segment"],
                category: EquationCategory::PressureLoss,
                source_module: "calculations/pressure_loss.rs",
                source_function: "compute_pressure_loss",
            },

            Equation::ConnectorLossLimit => EquationMetadata {
                name: "Dryer Connector Loss Limit",
                description: "A connector whose loss exceeds 0.25 in. WC is flagged",
                formula_typst: r#"$Delta P_"conn" <= 0.25 "in. WC"$"#,
                formula_plain: "dP_conn <= 0.25 in. WC",
                reference: CodeReference::Imc { year: 2021, section: "504.8" },
                variables: vec![Variable::new("Delta P_\"conn\"", "Connector pressure loss", "in. WC")],
                assumptions: vec!["Exactly 0.25 in. WC passes"],
                category: EquationCategory::SystemSizing,
                source_module: "calculations/connector.rs",
                source_function: "evaluate_connectors",
            },

            Equation::ManifoldDiameterSelection => EquationMetadata {
                name: "Manifold Diameter Selection",
                description: "Smallest standard manifold diameter whose pressure loss does not exceed the target",
                formula_typst: r#"$D = min { D_i : Delta P(D_i) <= Delta P_"max" }$"#,
                formula_plain: "D = min { D_i : dP(D_i) <= dP_max }",
                reference: CodeReference::DesignProcedure,
                variables: vec![
                    Variable::new("D_i", "Candidate diameter (6 to 36 in, step 2)", "in"),
                    Variable::new("Delta P_\"max\"", "Manifold loss target (1.0)", "in. WC"),
                ],
                assumptions: vec!["Largest candidate is used, flagged, when none qualifies"],
                category: EquationCategory::SystemSizing,
                source_module: "calculations/manifold.rs",
                source_function: "optimize_manifold",
            },

            Equation::SystemStaticPressure => EquationMetadata {
                name: "Total System Static Pressure",
                description: "Manifold loss plus the largest connector loss; parallel branches converge at the manifold",
                formula_typst: r#"$S P = Delta P_"manifold" + max_j Delta P_"conn,j"$"#,
                formula_plain: "SP = dP_manifold + max(dP_conn_j)",
                reference: CodeReference::DesignProcedure,
                variables: vec![
                    Variable::new("S P", "Required fan static pressure", "in. WC"),
                    Variable::new("Delta P_\"manifold\"", "Manifold pressure loss", "in. WC"),
                    Variable::new("Delta P_\"conn,j\"", "Connector j pressure loss", "in. WC"),
                ],
                assumptions: vec!["Connectors act as parallel branches", "Limiting branch governs"],
                category: EquationCategory::SystemSizing,
                source_module: "calculations/system.rs",
                source_function: "calculate",
            },

            Equation::FanSelectionRule => EquationMetadata {
                name: "Fan Selection",
                description: "First catalog fan, in ascending capacity order, rated for both the airflow and the static pressure",
                formula_typst: r#"$Q_"max" >= Q "and" S P_"max" >= S P$"#,
                formula_plain: "Q_max >= Q and SP_max >= SP",
                reference: CodeReference::ManufacturerData { product: "DEF series" },
                variables: vec![
                    Variable::new("Q_\"max\"", "Fan free-delivery airflow", "CFM"),
                    Variable::new("S P_\"max\"", "Fan maximum static pressure", "in. WC"),
                ],
                assumptions: vec!["Catalog pre-sorted by capacity", "Greedy first match"],
                category: EquationCategory::FanSelection,
                source_module: "calculations/fan_selection.rs",
                source_function: "select_fan",
            },

            Equation::FanOperatingPoint => EquationMetadata {
                name: "Fan Operating Point",
                description: "Airflow available at the required static pressure, interpolated on the published fan curve",
                formula_typst: r#"$Q_"avail" = Q_a + (S P - S P_a) (Q_b - Q_a) / (S P_b - S P_a)$"#,
                formula_plain: "Q_avail = Q_a + (SP - SP_a) * (Q_b - Q_a) / (SP_b - SP_a)",
                reference: CodeReference::ManufacturerData { product: "DEF series" },
                variables: vec![
                    Variable::new("Q_\"avail\"", "Available airflow", "CFM"),
                    Variable::new("S P_a, S P_b", "Bracketing curve pressures", "in. WC"),
                    Variable::new("Q_a, Q_b", "Bracketing curve airflows", "CFM"),
                ],
                assumptions: vec!["Linear between published points"],
                category: EquationCategory::FanSelection,
                source_module: "catalog/fans.rs",
                source_function: "cfm_at_static",
            },

            Equation::SystemCurve => EquationMetadata {
                name: "System Curve",
                description: "Parabolic system resistance curve through the manifold operating point",
                formula_typst: r#"$S P = k Q^2, quad k = Delta P_"manifold" / Q^2$"#,
                formula_plain: "SP = k * Q^2, k = dP_manifold / Q^2",
                reference: CodeReference::Ashrae { year: 2021, chapter: 21 },
                variables: vec![
                    Variable::new("k", "System resistance coefficient", "in. WC/CFM^2"),
                    Variable::new("Q", "Airflow", "CFM"),
                ],
                assumptions: vec!["Fully turbulent flow (loss proportional to Q^2)"],
                category: EquationCategory::FanSelection,
                source_module: "equations/duct.rs",
                source_function: "system_curve_coefficient",
            },
        }
    }

    /// Get all equations in a specific category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in sort order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            AirProperties,
            Airflow,
            LossCoefficients,
            PressureLoss,
            SystemSizing,
            FanSelection,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::AirDensityCorrection,
    Equation::DuctArea,
    Equation::DuctVelocity,
    Equation::StraightDuctLossCoefficient,
    Equation::FittingLossCoefficient,
    Equation::VelocityPressure,
    Equation::DuctPressureLoss,
    Equation::ConnectorLossLimit,
    Equation::ManifoldDiameterSelection,
    Equation::SystemStaticPressure,
    Equation::FanSelectionRule,
    Equation::FanOperatingPoint,
    Equation::SystemCurve,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Context describing where/why it was used (e.g., "Connector loss")
    pub context: String,
    /// Optional: the duct segment this equation was applied to
    pub member_label: Option<String>,
}

impl EquationUsage {
    /// Create a new equation usage record
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            member_label: None,
        }
    }

    /// Create usage record with a segment label
    pub fn for_member(equation: Equation, context: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            member_label: Some(label.into()),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Record equation usage for a specific duct segment
    pub fn record_for_member(&mut self, equation: Equation, context: impl Into<String>, label: impl Into<String>) {
        self.usages.push(EquationUsage::for_member(equation, context, label));
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by equation for appendix generation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category for appendix
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Merge another tracker into this one
    pub fn merge(&mut self, other: EquationTracker) {
        self.usages.extend(other.usages);
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "List of Equations" appendix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drex_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record_for_member(Equation::DuctPressureLoss, "Connector loss", "Dryer 1");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Duct Pressure Loss"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)

#text(size: 10pt)[
  This appendix lists the duct design equations used in this sizing report.
  Each equation includes its formula, reference, and the duct segments to which it was applied.
]

#v(16pt)
"##);

        let by_category = self.by_category();

        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this project.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", meta.reference.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("*Variables:*\n");
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  align: (left, left, left),\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            var.description,
                            escape_typst_markup(var.units)
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let mut labels: Vec<&str> = usages
                        .iter()
                        .filter_map(|u| u.member_label.as_deref())
                        .collect();
                    labels.sort();
                    labels.dedup();

                    if !labels.is_empty() {
                        let labels: Vec<String> = labels.iter().map(|l| crate::pdf::escape_typst(l)).collect();
                        output.push_str(&format!("*Applied to:* {}\n\n", labels.join(", ")));
                    }
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#v(8pt)\n");
                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n");
                output.push_str("#v(8pt)\n\n");
            }
        }

        output
    }
}

/// Appendix listing a fixed set of equations without per-segment usage,
/// for reports that only carry a reference section.
pub fn generate_static_equations_appendix_typst(equations: &[Equation]) -> String {
    let mut tracker = EquationTracker::new();
    for &eq in equations {
        tracker.record(eq, "Reference");
    }
    tracker.generate_appendix_typst()
}

/// Get the equations applied by a full system calculation.
pub fn system_calculation_equations() -> Vec<Equation> {
    vec![
        Equation::AirDensityCorrection,
        Equation::DuctArea,
        Equation::DuctVelocity,
        Equation::StraightDuctLossCoefficient,
        Equation::FittingLossCoefficient,
        Equation::VelocityPressure,
        Equation::DuctPressureLoss,
        Equation::ConnectorLossLimit,
        Equation::ManifoldDiameterSelection,
        Equation::SystemStaticPressure,
        Equation::FanSelectionRule,
        Equation::FanOperatingPoint,
    ]
}

/// Escape special characters for Typst math mode
fn escape_typst_math(s: &str) -> String {
    s.replace('\\', "\\\\")
}

/// Units like "lb/ft^3" contain characters Typst markup treats specially
fn escape_typst_markup(s: &str) -> String {
    s.replace('^', "\\^").replace('*', "\\*")
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate a complete EQUATIONS.md file for documentation.
///
/// # Example
///
/// ```rust
/// use drex_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Drex Equations Reference"));
/// assert!(markdown.contains("Pressure Loss"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(r#"# Drex Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists all formulas used in Drex dryer exhaust sizing.
Each equation includes its formula, reference, source location, and assumptions.

## Units

| Quantity | Unit |
|----------|------|
| Airflow | CFM |
| Velocity | FPM |
| Duct diameter | in |
| Duct length | ft |
| Static pressure | in. WC |
| Air density | lb/ft^3 |

---

"#);

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 13);

        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(!meta.formula_typst.is_empty(), "Equation {:?} has no formula", eq);
            assert!(!meta.variables.is_empty(), "Equation {:?} has no variables", eq);
            assert!(!meta.source_module.is_empty(), "Equation {:?} missing source_module", eq);
        }

        let loss = Equation::DuctPressureLoss.metadata();
        assert!(loss.formula_plain.contains("1096.2"), "Pressure loss formula wrong");
        assert!(loss.formula_plain.contains("0.3 * L / D_ft"), "Friction term wrong");
    }

    #[test]
    fn test_code_reference_citation() {
        let ashrae = CodeReference::Ashrae { year: 2021, chapter: 21 };
        assert_eq!(ashrae.citation(), "ASHRAE Handbook - Fundamentals 2021, Ch. 21");

        let imc = CodeReference::Imc { year: 2021, section: "504.8" };
        assert_eq!(imc.citation(), "IMC 2021 Section 504.8");
        assert_eq!(imc.short_form(), "IMC");
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::DuctPressureLoss, "Dryer 1");
        tracker.record(Equation::DuctVelocity, "Dryer 1");
        tracker.record(Equation::DuctPressureLoss, "Manifold");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations(), vec![Equation::DuctPressureLoss, Equation::DuctVelocity]);
    }

    #[test]
    fn test_by_category() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::DuctPressureLoss, "test");
        tracker.record(Equation::DuctVelocity, "test");
        tracker.record(Equation::FanSelectionRule, "test");

        let by_cat = tracker.by_category();
        let categories: Vec<_> = by_cat.iter().map(|(cat, _)| *cat).collect();
        assert_eq!(
            categories,
            vec![
                EquationCategory::Airflow,
                EquationCategory::PressureLoss,
                EquationCategory::FanSelection,
            ]
        );
    }

    #[test]
    fn test_categories_sorted() {
        let cats = Equation::all_categories();
        let orders: Vec<u8> = cats.iter().map(|c| c.sort_order()).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted, "Categories should be sorted by sort_order");
    }

    #[test]
    fn test_every_category_used() {
        for cat in Equation::all_categories() {
            assert!(!Equation::in_category(cat).is_empty(), "{:?} is empty", cat);
        }
    }

    #[test]
    fn test_generate_appendix_typst() {
        let mut tracker = EquationTracker::new();
        tracker.record_for_member(Equation::DuctPressureLoss, "Connector loss", "Dryer 2");
        tracker.record_for_member(Equation::DuctPressureLoss, "Connector loss", "Dryer 1");
        tracker.record_for_member(Equation::ManifoldDiameterSelection, "Sizing", "Manifold");

        let typst = tracker.generate_appendix_typst();

        assert!(typst.contains("Appendix: List of Equations"));
        assert!(typst.contains("Duct Pressure Loss"));
        assert!(typst.contains("Manifold Diameter Selection"));
        assert!(typst.contains("ASHRAE"));
        assert!(typst.contains("*Applied to:* Dryer 1, Dryer 2"));
        assert!(typst.contains("lb/ft\\^3"));
    }

    #[test]
    fn test_generate_appendix_empty_tracker() {
        let tracker = EquationTracker::new();
        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("No equations recorded"));
    }

    #[test]
    fn test_system_calculation_equations() {
        let equations = system_calculation_equations();
        assert!(equations.contains(&Equation::DuctPressureLoss));
        assert!(equations.contains(&Equation::SystemStaticPressure));
        assert!(equations.contains(&Equation::FanSelectionRule));
    }

    #[test]
    fn test_static_appendix() {
        let typst = generate_static_equations_appendix_typst(&system_calculation_equations());
        assert!(typst.contains("Air Density Correction"));
        assert!(typst.contains("Fan Operating Point"));
        assert!(!typst.contains("*Applied to:*"));
    }

    #[test]
    fn test_generate_equations_markdown() {
        let markdown = generate_equations_markdown();

        assert!(markdown.contains("# Drex Equations Reference"));
        assert!(markdown.contains("Auto-generated from source code"));
        assert!(markdown.contains("## Air Properties"));
        assert!(markdown.contains("## Fan Selection"));
        assert!(markdown.contains("### Duct Pressure Loss"));
        assert!(markdown.contains("`V = Q / A`"));
        assert!(markdown.contains("IMC 2021 Section 504.8"));
        assert!(markdown.contains("**Total Equations:** 13"));
        assert!(markdown.contains("**Categories:** 6"));
    }
}
