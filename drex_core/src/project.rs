//! # Project Data Structures
//!
//! The `Project` struct is the complete input for one sizing run: who the
//! proposal is for, where the building is, the dryers, and the manifold.
//! It is read from a JSON document and validated once at the boundary.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (name, zip code, contact, timestamps)
//! ├── settings: DesignSettings (limits, air density, manifold sizes)
//! ├── dryers: Vec<Dryer> (1 to 20, in input order)
//! └── manifold: ManifoldSpec
//! ```
//!
//! ## Example
//!
//! ```rust
//! use drex_core::project::Project;
//! use drex_core::calculations::Dryer;
//!
//! let mut project = Project::new("Laundry Room Retrofit", "80202", "ACME Property Management");
//! project.add_dryer(Dryer::new(300.0, 8, 10.0), 4);
//! assert_eq!(project.dryers.len(), 4);
//! assert!(project.validate().is_ok());
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::connector::Dryer;
use crate::calculations::manifold::ManifoldSpec;
use crate::catalog::duct_sizes::{describe_sizes, is_manifold_size, MANIFOLD_DIAMETERS_IN};
use crate::elevation::is_valid_zip;
use crate::equations::duct::{RANKINE_OFFSET, STANDARD_AIR_DENSITY};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for project documents
pub const SCHEMA_VERSION: &str = "1.0";

/// Most dryers one manifold may serve
pub const MAX_DRYERS: usize = 20;

/// Site elevations the density model accepts (ft).
///
/// 6.8754e-6 * h reaches 1 near 145,000 ft; keep well inside the model.
pub const ELEVATION_RANGE_FT: std::ops::RangeInclusive<f64> = -1500.0..=30000.0;

/// Root project container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: DesignSettings,

    /// Dryers in input order
    pub dryers: Vec<Dryer>,

    pub manifold: ManifoldSpec,
}

impl Project {
    /// Create a project with no dryers and a zero-length, optimized manifold.
    ///
    /// # Arguments
    ///
    /// * `name` - Project name for the proposal
    /// * `zip_code` - 5-digit site zip code
    /// * `prepared_for` - Customer or contact name
    pub fn new(name: impl Into<String>, zip_code: impl Into<String>, prepared_for: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                zip_code: zip_code.into(),
                prepared_for: prepared_for.into(),
                email: String::new(),
                created: now,
                modified: now,
            },
            settings: DesignSettings::default(),
            dryers: Vec::new(),
            manifold: ManifoldSpec::new(0.0),
        }
    }

    /// Append `copies` copies of `dryer`, stopping at [`MAX_DRYERS`].
    ///
    /// Returns how many were actually added.
    pub fn add_dryer(&mut self, dryer: Dryer, copies: usize) -> usize {
        let room = MAX_DRYERS.saturating_sub(self.dryers.len());
        let added = copies.min(room);
        self.dryers.extend(std::iter::repeat(dryer).take(added));
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Remove the dryer at `index`, if it exists.
    pub fn remove_dryer(&mut self, index: usize) -> Option<Dryer> {
        if index < self.dryers.len() {
            self.touch();
            Some(self.dryers.remove(index))
        } else {
            None
        }
    }

    /// Remove every dryer.
    pub fn clear_dryers(&mut self) {
        self.dryers.clear();
        self.touch();
    }

    /// Combined dryer airflow (CFM)
    pub fn total_cfm(&self) -> f64 {
        self.dryers.iter().map(|d| d.flow_cfm).sum()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Validate the whole project. Run once before calculating.
    pub fn validate(&self) -> CalcResult<()> {
        if self.meta.name.trim().is_empty() {
            return Err(CalcError::missing_field("meta.name"));
        }
        if !is_valid_zip(&self.meta.zip_code) {
            return Err(CalcError::invalid_input(
                "meta.zip_code",
                self.meta.zip_code.clone(),
                "Zip code must be exactly 5 digits",
            ));
        }
        if self.dryers.is_empty() || self.dryers.len() > MAX_DRYERS {
            return Err(CalcError::invalid_input(
                "dryers",
                self.dryers.len().to_string(),
                format!("A manifold serves between 1 and {} dryers", MAX_DRYERS),
            ));
        }
        for (index, dryer) in self.dryers.iter().enumerate() {
            dryer.validate(index)?;
        }
        self.manifold.validate()?;
        self.settings.validate()
    }
}

/// Project metadata shown on every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    /// Project name
    pub name: String,

    /// Site zip code (5 digits)
    pub zip_code: String,

    /// Customer or contact the proposal is prepared for
    #[serde(default)]
    pub prepared_for: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Design limits and air properties.
///
/// Every field has a default, so `"settings"` may be omitted from the
/// project document or given only partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Connector loss above this is flagged (in. WC)
    pub connector_limit_inwc: f64,

    /// Manifold loss target for the optimizer (in. WC)
    pub manifold_target_inwc: f64,

    /// Air density at sea level before corrections (lb/ft³)
    pub base_air_density: f64,

    /// Exhaust air temperature (°F); `None` designs at standard 70°F air
    pub exhaust_temperature_f: Option<f64>,

    /// Elevation used when the lookup is skipped or fails (ft)
    pub default_elevation_ft: f64,

    /// Diameters the manifold optimizer may choose from (in)
    pub manifold_candidates: Vec<u32>,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            connector_limit_inwc: 0.25,
            manifold_target_inwc: 1.0,
            base_air_density: STANDARD_AIR_DENSITY,
            exhaust_temperature_f: None,
            default_elevation_ft: 0.0,
            manifold_candidates: MANIFOLD_DIAMETERS_IN.to_vec(),
        }
    }
}

impl DesignSettings {
    /// Validate design limits.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("settings.connector_limit_inwc", self.connector_limit_inwc),
            ("settings.manifold_target_inwc", self.manifold_target_inwc),
            ("settings.base_air_density", self.base_air_density),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
            }
        }

        if let Some(t) = self.exhaust_temperature_f {
            if !t.is_finite() || t <= -RANKINE_OFFSET {
                return Err(CalcError::invalid_input(
                    "settings.exhaust_temperature_f",
                    t.to_string(),
                    "Temperature must be above absolute zero",
                ));
            }
        }

        if !ELEVATION_RANGE_FT.contains(&self.default_elevation_ft) {
            return Err(CalcError::invalid_input(
                "settings.default_elevation_ft",
                self.default_elevation_ft.to_string(),
                "Elevation must be between -1500 and 30000 ft",
            ));
        }

        if self.manifold_candidates.is_empty() {
            return Err(CalcError::invalid_input(
                "settings.manifold_candidates",
                "[]",
                "At least one candidate diameter is required",
            ));
        }
        if let Some(bad) = self.manifold_candidates.iter().find(|d| !is_manifold_size(**d)) {
            return Err(CalcError::invalid_input(
                "settings.manifold_candidates",
                bad.to_string(),
                format!("Manifold diameter must be one of {} in", describe_sizes(&MANIFOLD_DIAMETERS_IN)),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::manifold::ManifoldDiameter;

    fn sample() -> Project {
        let mut project = Project::new("Test Laundry", "80202", "Jane Customer");
        project.add_dryer(Dryer::new(300.0, 8, 10.0), 2);
        project.manifold = ManifoldSpec::new(40.0);
        project
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("Test Laundry", "80202", "Jane Customer");
        assert_eq!(project.meta.name, "Test Laundry");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert!(project.dryers.is_empty());
        assert_eq!(project.settings, DesignSettings::default());
    }

    #[test]
    fn test_add_dryer_capped() {
        let mut project = sample();
        let added = project.add_dryer(Dryer::new(250.0, 6, 5.0), 30);
        assert_eq!(added, MAX_DRYERS - 2);
        assert_eq!(project.dryers.len(), MAX_DRYERS);
        assert_eq!(project.add_dryer(Dryer::new(250.0, 6, 5.0), 1), 0);
    }

    #[test]
    fn test_remove_dryer() {
        let mut project = sample();
        project.add_dryer(Dryer::new(450.0, 10, 5.0), 1);
        let removed = project.remove_dryer(2).unwrap();
        assert_eq!(removed.flow_cfm, 450.0);
        assert!(project.remove_dryer(5).is_none());
        assert_eq!(project.dryers.len(), 2);
    }

    #[test]
    fn test_total_cfm() {
        assert_eq!(sample().total_cfm(), 600.0);
    }

    #[test]
    fn test_validate_boundary() {
        assert!(sample().validate().is_ok());

        let mut p = sample();
        p.meta.zip_code = "8020".to_string();
        assert_eq!(p.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let mut p = sample();
        p.meta.name = "  ".to_string();
        assert_eq!(p.validate().unwrap_err().error_code(), "MISSING_FIELD");

        let mut p = sample();
        p.clear_dryers();
        assert!(p.validate().is_err());

        let mut p = sample();
        p.dryers.extend(std::iter::repeat(Dryer::new(100.0, 4, 1.0)).take(MAX_DRYERS));
        assert!(p.validate().is_err());

        let mut p = sample();
        p.manifold.diameter = ManifoldDiameter::Manual(7);
        assert!(p.validate().is_err());

        let mut p = sample();
        p.settings.manifold_target_inwc = 0.0;
        assert!(p.validate().is_err());

        let mut p = sample();
        p.settings.manifold_candidates = vec![6, 9];
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "meta": { "name": "Hotel", "zip_code": "10001" },
            "dryers": [{ "flow_cfm": 300, "diameter_in": 8, "length_ft": 10 }],
            "manifold": { "length_ft": 60, "diameter": { "manual": 16 } }
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.settings, DesignSettings::default());
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.manifold.diameter, ManifoldDiameter::Manual(16));
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_partial_settings() {
        let settings: DesignSettings = serde_json::from_str(r#"{"exhaust_temperature_f": 120}"#).unwrap();
        assert_eq!(settings.exhaust_temperature_f, Some(120.0));
        assert_eq!(settings.connector_limit_inwc, 0.25);
    }
}
