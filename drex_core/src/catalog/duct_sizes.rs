//! Standard Round Duct Sizes
//!
//! Nominal diameters, in whole inches, that the engine accepts for dryer
//! connectors and for the common manifold.

/// Supported dryer connector diameters (dryer outlet sizes)
pub const CONNECTOR_DIAMETERS_IN: [u32; 10] = [3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// Supported manifold diameters, ascending. Also the default optimizer
/// candidate list.
pub const MANIFOLD_DIAMETERS_IN: [u32; 16] = [
    6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36,
];

/// Is `diameter_in` a supported connector size?
pub fn is_connector_size(diameter_in: u32) -> bool {
    CONNECTOR_DIAMETERS_IN.contains(&diameter_in)
}

/// Is `diameter_in` a supported manifold size?
pub fn is_manifold_size(diameter_in: u32) -> bool {
    MANIFOLD_DIAMETERS_IN.contains(&diameter_in)
}

/// Comma-separated list for error messages, e.g. "6, 8, 10"
pub fn describe_sizes(sizes: &[u32]) -> String {
    sizes
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
