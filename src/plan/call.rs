use std::f64::consts::PI;

use crate::angle_text::parse_angle;
use crate::error::ParseError;
use crate::math::angle::normalize_angle;

/// One bearing/distance call of a legal description.
#[derive(Debug, Clone, PartialEq)]
pub struct LegCall {
    /// Positive length in plan units.
    pub distance: f64,
    /// Engine azimuth in radians, `[0, 2π)`.
    pub azimuth: f64,
    /// Length must survive adjustment unchanged.
    pub locked: bool,
    /// Bearing text as entered, kept for display.
    pub text: Option<String>,
}

impl LegCall {
    /// Creates a free call. A negative distance reverses the direction.
    #[must_use]
    pub fn new(distance: f64, azimuth: f64) -> Self {
        let (distance, azimuth) = if distance < 0.0 {
            (-distance, azimuth + PI)
        } else {
            (distance, azimuth)
        };
        Self {
            distance,
            azimuth: normalize_angle(azimuth),
            locked: false,
            text: None,
        }
    }

    /// Parses a call from bearing text and distance text.
    ///
    /// A leading `-` on the bearing or a negative distance reverses the leg.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the bearing does not parse, the distance is
    /// not a finite non-zero number, or both reversal forms are present.
    pub fn parse(bearing: &str, distance: &str) -> Result<Self, ParseError> {
        let angle = parse_angle(bearing)?;
        let d: f64 = distance
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidDistance(distance.to_string()))?;
        if !d.is_finite() || d == 0.0 {
            return Err(ParseError::InvalidDistance(distance.to_string()));
        }
        if angle.reversed && d < 0.0 {
            return Err(ParseError::ConflictingReversal);
        }
        let mut call = Self::new(d, angle.azimuth);
        call.text = Some(bearing.trim().to_string());
        Ok(call)
    }

    /// Returns this call with its `locked` flag set.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}
