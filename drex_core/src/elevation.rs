//! # Site Elevation
//!
//! Air density depends on site elevation, which is looked up from the project
//! zip code. The lookup is an injected [`ElevationProvider`] so calculations
//! stay deterministic under test: the HTTP implementation lives in the CLI,
//! while [`FixedElevation`] and [`NoElevation`] ship here.
//!
//! A failed lookup is never fatal; the calculation falls back to the default
//! elevation and records a warning.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location resolved from a zip code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    /// Ground elevation (ft, rounded)
    pub elevation_ft: f64,
}

impl SiteLocation {
    pub fn new(city: impl Into<String>, state: impl Into<String>, elevation_ft: f64) -> Self {
        SiteLocation {
            city: city.into(),
            state: state.into(),
            elevation_ft,
        }
    }

    /// "Denver, CO", or an empty string when the place is unknown
    pub fn place(&self) -> String {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Why an elevation lookup failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElevationError {
    #[error("'{0}' is not a 5-digit zip code")]
    InvalidZip(String),

    #[error("zip code {0} not found")]
    NotFound(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    BadResponse(String),

    #[error("elevation lookup disabled")]
    Unavailable,
}

/// Resolves a zip code to a site location.
pub trait ElevationProvider {
    fn lookup(&self, zip_code: &str) -> Result<SiteLocation, ElevationError>;
}

/// Returns the same location for every zip code.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedElevation(pub SiteLocation);

impl FixedElevation {
    pub fn feet(elevation_ft: f64) -> Self {
        FixedElevation(SiteLocation::new("", "", elevation_ft))
    }
}

impl ElevationProvider for FixedElevation {
    fn lookup(&self, zip_code: &str) -> Result<SiteLocation, ElevationError> {
        if !is_valid_zip(zip_code) {
            return Err(ElevationError::InvalidZip(zip_code.to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Offline provider; every lookup fails with [`ElevationError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElevation;

impl ElevationProvider for NoElevation {
    fn lookup(&self, _zip_code: &str) -> Result<SiteLocation, ElevationError> {
        Err(ElevationError::Unavailable)
    }
}

/// US zip code: exactly five ASCII digits.
pub fn is_valid_zip(zip_code: &str) -> bool {
    zip_code.len() == 5 && zip_code.bytes().all(|b| b.is_ascii_digit())
}
