//! Splits provider output into the units a platform format displays.

use crate::model::{GenerationResult, PlatformFormat, MAX_UNIT_CHARS};

pub fn normalize(raw: &str, format: PlatformFormat) -> GenerationResult {
    match format {
        PlatformFormat::Thread => GenerationResult {
            units: raw
                .split("\n\n")
                .map(str::trim)
                .filter(|unit| !unit.is_empty())
                .map(str::to_string)
                .collect(),
        },
        _ => GenerationResult {
            units: vec![raw.trim().to_string()],
        },
    }
}

/// Rebuild displayable units from a stored record's content.
pub fn units_from_content(content: &str, format: PlatformFormat) -> GenerationResult {
    normalize(content, format)
}

/// `len/280` annotation shown next to a thread unit. Not enforced.
pub fn length_label(unit: &str) -> String {
    format!("{}/{}", unit.chars().count(), MAX_UNIT_CHARS)
}

pub fn exceeds_cap(unit: &str) -> bool {
    unit.chars().count() > MAX_UNIT_CHARS
}
