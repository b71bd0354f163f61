//! Duct Fitting Loss Coefficients
//!
//! Dynamic loss coefficients (K-values) for the fittings found in dryer
//! exhaust runs. Values follow ASHRAE Fundamentals duct fitting data for
//! round galvanized duct.
//!
//! A fitting list is an ordered sequence of [`FittingCount`] entries; its
//! contribution to a segment's total K is `sum(K * count)`.

use serde::{Deserialize, Serialize};

/// Fitting type with a fixed loss coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FittingType {
    /// 90° elbow, smooth radius (R/D ≈ 1.5)
    Elbow90Smooth,
    /// 90° elbow, standard (pleated or 3-gore)
    Elbow90Standard,
    /// 45° elbow
    Elbow45,
    /// 30° elbow
    Elbow30,
    /// Lateral tee, flow turning into the branch
    LateralTeeBranch,
    /// Lateral tee, flow passing straight through the main
    LateralTeeStraight,
    /// Duct entry (flush)
    Entry,
    /// Duct exit / termination
    Exit,
}

impl FittingType {
    /// All fitting types in display order
    pub const ALL: [FittingType; 8] = [
        FittingType::Elbow90Smooth,
        FittingType::Elbow90Standard,
        FittingType::Elbow45,
        FittingType::Elbow30,
        FittingType::LateralTeeBranch,
        FittingType::LateralTeeStraight,
        FittingType::Entry,
        FittingType::Exit,
    ];

    /// Dimensionless loss coefficient K
    pub fn k_value(&self) -> f64 {
        match self {
            FittingType::Elbow90Smooth => 0.30,
            FittingType::Elbow90Standard => 0.50,
            FittingType::Elbow45 => 0.25,
            FittingType::Elbow30 => 0.15,
            FittingType::LateralTeeBranch => 0.75,
            FittingType::LateralTeeStraight => 0.20,
            FittingType::Entry => 0.50,
            FittingType::Exit => 1.00,
        }
    }

    /// Get display name (e.g., "90° Elbow (std)")
    pub fn display_name(&self) -> &'static str {
        match self {
            FittingType::Elbow90Smooth => "90° Elbow (smooth)",
            FittingType::Elbow90Standard => "90° Elbow (std)",
            FittingType::Elbow45 => "45° Elbow",
            FittingType::Elbow30 => "30° Elbow",
            FittingType::LateralTeeBranch => "Lateral Tee (branch)",
            FittingType::LateralTeeStraight => "Lateral Tee (straight)",
            FittingType::Entry => "Entry",
            FittingType::Exit => "Exit",
        }
    }
}

/// A fitting type together with how many times it occurs in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittingCount {
    pub fitting: FittingType,
    pub count: u32,
}

impl FittingCount {
    pub fn new(fitting: FittingType, count: u32) -> Self {
        FittingCount { fitting, count }
    }

    /// Single occurrence of a fitting
    pub fn one(fitting: FittingType) -> Self {
        FittingCount::new(fitting, 1)
    }

    /// K contribution of this entry (K * count)
    pub fn k_contribution(&self) -> f64 {
        self.fitting.k_value() * f64::from(self.count)
    }
}

/// Sum of fitting K-values, summed in list order.
pub fn fittings_k_sum(fittings: &[FittingCount]) -> f64 {
    fittings.iter().map(FittingCount::k_contribution).sum()
}

/// Human-readable fitting list, e.g. "2x 90° Elbow (std), Entry, Exit".
///
/// Entries with a zero count are skipped; an empty list reads "None".
pub fn fittings_summary(fittings: &[FittingCount]) -> String {
    let parts: Vec<String> = fittings
        .iter()
        .filter(|f| f.count > 0)
        .map(|f| {
            if f.count == 1 {
                f.fitting.display_name().to_string()
            } else {
                format!("{}x {}", f.count, f.fitting.display_name())
            }
        })
        .collect();

    if parts.is_empty() {
        "None".to_string()
    } else {
        parts.join(", ")
    }
}
