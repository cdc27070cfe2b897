use std::f64::consts::{FRAC_PI_2, TAU};

use super::Vector2;

/// Normalizes an angle in radians into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can return exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Converts a surveying azimuth (clockwise from north) to the engine's
/// convention (counter-clockwise from +X).
#[must_use]
pub fn north_to_east(az_north: f64) -> f64 {
    normalize_angle(FRAC_PI_2 - az_north)
}

/// Converts an engine azimuth (counter-clockwise from +X) to a surveying
/// azimuth (clockwise from north). The conversion is its own inverse.
#[must_use]
pub fn east_to_north(az_east: f64) -> f64 {
    normalize_angle(FRAC_PI_2 - az_east)
}

/// Signed smallest difference `a - b`, in `(-π, π]`.
#[must_use]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    if d > std::f64::consts::PI {
        d - TAU
    } else {
        d
    }
}

/// Unit vector pointing along an engine azimuth.
#[must_use]
pub fn direction(azimuth: f64) -> Vector2 {
    Vector2::new(azimuth.cos(), azimuth.sin())
}

/// Engine azimuth of a vector, normalized into `[0, 2π)`.
#[must_use]
pub fn azimuth_of(v: &Vector2) -> f64 {
    normalize_angle(v.y.atan2(v.x))
}

/// Rotates a vector counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate(v: &Vector2, angle: f64) -> Vector2 {
    let (s, c) = angle.sin_cos();
    Vector2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn normalize_wraps_negative() {
        assert!((normalize_angle(-FRAC_PI_2) - 1.5 * PI).abs() < TOL);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < TOL);
        assert!(normalize_angle(-1e-20) < TAU);
    }

    #[test]
    fn north_east_conversion() {
        // North is +Y (π/2), east is +X (0).
        assert!((north_to_east(0.0) - FRAC_PI_2).abs() < TOL);
        assert!(north_to_east(FRAC_PI_2).abs() < TOL);
        // South-west (225° from north) points to -X,-Y (225° from +X).
        let sw = north_to_east(225f64.to_radians());
        assert!((sw - 225f64.to_radians()).abs() < TOL);
    }

    #[test]
    fn conversion_is_involution() {
        for deg in [0.0, 13.5, 90.0, 181.25, 359.0] {
            let a = f64::to_radians(deg);
            assert!((east_to_north(north_to_east(a)) - a).abs() < 1e-12);
        }
    }

    #[test]
    fn angle_diff_takes_short_way() {
        let d = angle_diff(0.1, TAU - 0.1);
        assert!((d - 0.2).abs() < TOL);
        let d = angle_diff(TAU - 0.1, 0.1);
        assert!((d + 0.2).abs() < TOL);
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(&Vector2::new(1.0, 0.0), FRAC_PI_2);
        assert!(v.x.abs() < TOL);
        assert!((v.y - 1.0).abs() < TOL);
    }

    #[test]
    fn azimuth_of_direction_roundtrip() {
        let a = 4.0;
        assert!((azimuth_of(&direction(a)) - a).abs() < TOL);
    }
}
