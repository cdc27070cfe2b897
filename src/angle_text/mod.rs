//! Bearing and azimuth text.
//!
//! Angles are returned in the engine convention: radians counter-clockwise
//! from +X, normalized to `[0, 2π)`. Text is always surveying convention
//! (quadrant bearings, or azimuths clockwise from north).

mod format;
mod grammar;
mod lexer;

pub use format::AngleStyle;
pub use grammar::{Grammar, GRAMMARS};

use std::f64::consts::PI;

use crate::error::ParseError;
use crate::math::angle::{normalize_angle, north_to_east};

/// Result of reading one angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAngle {
    /// Engine azimuth in radians, already reversed if `reversed` is set.
    pub azimuth: f64,
    /// The text carried a leading `-` (reverse the direction).
    pub reversed: bool,
    /// Grammar that matched.
    pub grammar: Grammar,
}

/// Parses bearing or azimuth text.
///
/// Grammars are tried in [`GRAMMARS`] order and the first one whose shape
/// matches decides the result.
///
/// # Errors
///
/// Returns [`ParseError`] if the text is empty, matches no grammar, or
/// carries an out-of-range component.
pub fn parse_angle(text: &str) -> Result<ParsedAngle, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    let (reversed, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return Err(ParseError::Unrecognized(text.to_string()));
    }

    let upper = body.to_uppercase();
    let tokens = lexer::tokenize(&upper)?;
    for grammar in GRAMMARS {
        if let Some(north_deg) = grammar.try_match(&tokens)? {
            let mut azimuth = north_to_east(north_deg.to_radians());
            if reversed {
                azimuth = normalize_angle(azimuth + PI);
            }
            return Ok(ParsedAngle {
                azimuth,
                reversed,
                grammar,
            });
        }
    }
    Err(ParseError::Unrecognized(text.to_string()))
}

/// Formats an engine azimuth as surveying text.
#[must_use]
pub fn format_angle(azimuth: f64, style: AngleStyle) -> String {
    format::format_with(azimuth, style)
}
