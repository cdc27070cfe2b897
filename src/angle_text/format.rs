use crate::math::angle::east_to_north;

/// Output style for [`format_angle`](super::format_angle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleStyle {
    /// `N 45°30'15.00" E`, seconds to hundredths.
    #[default]
    Quadrant,
    /// `N45.3015E`, whole seconds.
    QuadrantCompact,
    /// `AZ 123°45'06.78"`, clockwise from north, seconds to hundredths.
    AzimuthDms,
    /// `123.751883`, decimal degrees clockwise from north.
    DecimalDegrees,
}

const HUNDREDTHS_PER_DEGREE: u64 = 360_000;
const SECONDS_PER_DEGREE: u64 = 3_600;

pub(super) fn format_with(azimuth: f64, style: AngleStyle) -> String {
    let north_deg = east_to_north(azimuth).to_degrees();
    match style {
        AngleStyle::Quadrant => {
            let (ns, angle, ew) = north_azimuth_to_quadrant(north_deg);
            let (d, m, s) = split_hundredths(to_units(angle, HUNDREDTHS_PER_DEGREE));
            format!("{ns} {d:02}°{m:02}'{s:05.2}\" {ew}")
        }
        AngleStyle::QuadrantCompact => {
            let (ns, angle, ew) = north_azimuth_to_quadrant(north_deg);
            let total = to_units(angle, SECONDS_PER_DEGREE);
            let d = total / 3600;
            let m = (total % 3600) / 60;
            let s = total % 60;
            format!("{ns}{d}.{m:02}{s:02}{ew}")
        }
        AngleStyle::AzimuthDms => {
            let total = to_units(north_deg, HUNDREDTHS_PER_DEGREE) % (360 * HUNDREDTHS_PER_DEGREE);
            let (d, m, s) = split_hundredths(total);
            format!("AZ {d:03}°{m:02}'{s:05.2}\"")
        }
        AngleStyle::DecimalDegrees => {
            let micro = to_units(north_deg, 1_000_000) % 360_000_000;
            #[allow(clippy::cast_precision_loss)]
            let deg = micro as f64 / 1e6;
            format!("{deg:.6}")
        }
    }
}

/// Reduces a north azimuth in degrees to a quadrant bearing `(N|S, θ, E|W)`.
fn north_azimuth_to_quadrant(north_deg: f64) -> (char, f64, char) {
    if north_deg <= 90.0 {
        ('N', north_deg, 'E')
    } else if north_deg <= 180.0 {
        ('S', 180.0 - north_deg, 'E')
    } else if north_deg <= 270.0 {
        ('S', north_deg - 180.0, 'W')
    } else {
        ('N', 360.0 - north_deg, 'W')
    }
}

/// Rounds non-negative degrees to integer units (`units_per_degree` per degree).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn to_units(degrees: f64, units_per_degree: u64) -> u64 {
    (degrees.max(0.0) * units_per_degree as f64).round() as u64
}

/// Splits hundredths of a second into whole degrees, whole minutes, and seconds.
#[allow(clippy::cast_precision_loss)]
fn split_hundredths(total: u64) -> (u64, u64, f64) {
    let d = total / HUNDREDTHS_PER_DEGREE;
    let rem = total % HUNDREDTHS_PER_DEGREE;
    let m = rem / 6_000;
    let s = (rem % 6_000) as f64 / 100.0;
    (d, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::angle::north_to_east;

    fn from_north(deg: f64) -> f64 {
        north_to_east(deg.to_radians())
    }

    #[test]
    fn quadrant_in_each_quarter() {
        let dms = 45.0 + 30.0 / 60.0 + 15.0 / 3600.0;
        assert_eq!(format_with(from_north(dms), AngleStyle::Quadrant), "N 45°30'15.00\" E");
        assert_eq!(format_with(from_north(180.0 - dms), AngleStyle::Quadrant), "S 45°30'15.00\" E");
        assert_eq!(format_with(from_north(180.0 + dms), AngleStyle::Quadrant), "S 45°30'15.00\" W");
        assert_eq!(format_with(from_north(360.0 - dms), AngleStyle::Quadrant), "N 45°30'15.00\" W");
    }

    #[test]
    fn rounding_carries_into_minutes() {
        // 10°59'59.999" rounds up to 11°00'00.00".
        let deg = 10.0 + 59.0 / 60.0 + 59.999 / 3600.0;
        assert_eq!(format_with(from_north(deg), AngleStyle::Quadrant), "N 11°00'00.00\" E");
    }

    #[test]
    fn compact_and_azimuth_styles() {
        let deg = 123.0 + 45.0 / 60.0 + 6.0 / 3600.0;
        let az = from_north(deg);
        assert_eq!(format_with(az, AngleStyle::QuadrantCompact), "S56.1454E");
        assert_eq!(format_with(az, AngleStyle::AzimuthDms), "AZ 123°45'06.00\"");
        assert_eq!(format_with(from_north(12.5), AngleStyle::DecimalDegrees), "12.500000");
    }

    #[test]
    fn azimuth_wraps_at_full_turn() {
        let az = from_north(360.0 - 1e-9);
        assert_eq!(format_with(az, AngleStyle::AzimuthDms), "AZ 000°00'00.00\"");
        assert_eq!(format_with(az, AngleStyle::DecimalDegrees), "0.000000");
    }
}
