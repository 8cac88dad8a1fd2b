use crate::error::ValidationError;

/// The design styles offered by the style picker.
pub const STYLE_CATALOG: [&str; 5] = [
    "Modern Minimalist",
    "Cozy Bohemian",
    "Industrial Chic",
    "Scandinavian",
    "Coastal Retreat",
];

/// Validates a style label against the catalog.
///
/// Matching ignores case and surrounding whitespace; the catalog spelling is
/// returned.
pub fn validate_style(label: &str) -> Result<&'static str, ValidationError> {
    let wanted = label.trim();
    STYLE_CATALOG
        .iter()
        .copied()
        .find(|style| style.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ValidationError::UnknownStyle(wanted.to_string()))
}
