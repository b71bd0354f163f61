//! # Report Branding
//!
//! Company identity printed on every generated document. A `Branding` value
//! is passed explicitly to each report generator; there is no global state.
//! Branding can be loaded from JSON so a dealer can rebrand reports without
//! touching the calculation.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Company identity and brand colors for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    /// Brand name shown in titles (e.g., "LF Systems")
    pub company: String,
    /// Parent company line, may be empty
    pub parent_company: String,
    pub website: String,
    pub email: String,
    pub phone: String,
    /// Exhaust fan product line printed with the model (e.g., "DEF Series")
    pub fan_series: String,
    /// Constant pressure controller model
    pub controller_model: String,
    pub warranty_months: u32,
    /// Days a proposal remains valid
    pub proposal_valid_days: u32,
    pub colors: BrandColors,
}

/// Brand palette as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub gray: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        BrandColors {
            primary: "#2a3853".to_string(),
            secondary: "#234699".to_string(),
            accent: "#b11f33".to_string(),
            gray: "#97999b".to_string(),
        }
    }
}

impl Default for Branding {
    fn default() -> Self {
        Branding {
            company: "LF Systems".to_string(),
            parent_company: "RM Manifold Group Inc.".to_string(),
            website: "www.lfsystems.net".to_string(),
            email: "info@lfsystems.net".to_string(),
            phone: "Contact your local representative".to_string(),
            fan_series: "DEF Series".to_string(),
            controller_model: "L150".to_string(),
            warranty_months: 24,
            proposal_valid_days: 30,
            colors: BrandColors::default(),
        }
    }
}

impl Branding {
    /// "LF Systems by RM Manifold Group Inc.", or just the company
    pub fn full_name(&self) -> String {
        if self.parent_company.is_empty() {
            self.company.clone()
        } else {
            format!("{} by {}", self.company, self.parent_company)
        }
    }

    /// Check that every color is a `#rrggbb` hex string.
    pub fn validate(&self) -> CalcResult<()> {
        if self.company.trim().is_empty() {
            return Err(CalcError::missing_field("branding.company"));
        }
        let colors = [
            ("branding.colors.primary", &self.colors.primary),
            ("branding.colors.secondary", &self.colors.secondary),
            ("branding.colors.accent", &self.colors.accent),
            ("branding.colors.gray", &self.colors.gray),
        ];
        for (field, value) in colors {
            if !is_hex_color(value) {
                return Err(CalcError::invalid_input(field, value.clone(), "Color must be #rrggbb"));
            }
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Convert `#rrggbb` to RTF color-table components (0-255).
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    if !is_hex_color(hex) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(1)?, channel(3)?, channel(5)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        let b = Branding::default();
        assert!(b.validate().is_ok());
        assert_eq!(b.full_name(), "LF Systems by RM Manifold Group Inc.");
    }

    #[test]
    fn test_bad_color() {
        let mut b = Branding::default();
        b.colors.accent = "red".to_string();
        assert_eq!(b.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#2a3853"), Some((0x2a, 0x38, 0x53)));
        assert_eq!(hex_to_rgb("#GG0000"), None);
        assert_eq!(hex_to_rgb("2a3853"), None);
    }

    #[test]
    fn test_partial_json() {
        let b: Branding = serde_json::from_str(r#"{"company": "Acme Exhaust", "parent_company": ""}"#).unwrap();
        assert_eq!(b.full_name(), "Acme Exhaust");
        assert_eq!(b.colors, BrandColors::default());
        assert_eq!(b.warranty_months, 24);
    }
}
