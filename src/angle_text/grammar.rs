use super::lexer::{Mark, Number, Token};
use crate::error::ParseError;

/// Supported angle text grammars, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `N 45°30'15" E`, `S10D05'W`, `N 45 30 15 E`.
    QuadrantTokenized,
    /// `N45.3015E`: whole degrees with a 2- or 4-digit `MM[SS]` fraction.
    QuadrantCompact,
    /// `AZ 123°45'06"`, `123 45 06`.
    AzimuthDms,
    /// `AZ 123.4506` (packed DMS) or plain decimal degrees `123.7517`.
    AzimuthNumeric,
}

/// Matching order: first match wins.
pub const GRAMMARS: [Grammar; 4] = [
    Grammar::QuadrantTokenized,
    Grammar::QuadrantCompact,
    Grammar::AzimuthDms,
    Grammar::AzimuthNumeric,
];

impl Grammar {
    /// Attempts to read `tokens` as this grammar.
    ///
    /// Returns the surveying azimuth in degrees (clockwise from north), or
    /// `Ok(None)` if the text does not have this grammar's shape.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the shape matches but a component is out
    /// of range.
    pub(crate) fn try_match(self, tokens: &[Token]) -> Result<Option<f64>, ParseError> {
        match self {
            Self::QuadrantTokenized => {
                let Some((ns, body, ew)) = split_quadrant(tokens) else {
                    return Ok(None);
                };
                let Some(components) = dms_components(body) else {
                    return Ok(None);
                };
                if !is_tokenized(&components) {
                    return Ok(None);
                }
                let angle = resolve_dms(&components, 90.0)?;
                Ok(Some(quadrant_to_north_azimuth(ns, angle, ew)))
            }
            Self::QuadrantCompact => {
                let Some((ns, body, ew)) = split_quadrant(tokens) else {
                    return Ok(None);
                };
                let [Token::Number(n)] = body else {
                    return Ok(None);
                };
                let angle = unpack_dd_mmss(n, 90.0)?;
                Ok(Some(quadrant_to_north_azimuth(ns, angle, ew)))
            }
            Self::AzimuthDms => {
                let (_, body) = strip_azimuth_prefix(tokens);
                let Some(components) = dms_components(body) else {
                    return Ok(None);
                };
                if !is_tokenized(&components) {
                    return Ok(None);
                }
                resolve_dms(&components, 360.0).map(Some)
            }
            Self::AzimuthNumeric => {
                let (prefixed, body) = strip_azimuth_prefix(tokens);
                let [Token::Number(n)] = body else {
                    return Ok(None);
                };
                let packed = prefixed
                    && matches!(n.frac_digits.as_deref().map(str::len), Some(2 | 4));
                let degrees = if packed {
                    unpack_dd_mmss(n, 360.0)?
                } else {
                    check_range_inclusive("degrees", n.value, 360.0)?;
                    n.value
                };
                Ok(Some(degrees))
            }
        }
    }
}

struct Component<'a> {
    number: &'a Number,
    mark: Option<Mark>,
}

fn split_quadrant(tokens: &[Token]) -> Option<(char, &[Token], char)> {
    match tokens {
        [Token::Quadrant(ns @ ('N' | 'S')), body @ .., Token::Quadrant(ew @ ('E' | 'W'))] => {
            Some((*ns, body, *ew))
        }
        _ => None,
    }
}

fn strip_azimuth_prefix(tokens: &[Token]) -> (bool, &[Token]) {
    match tokens {
        [Token::Azimuth, rest @ ..] => (true, rest),
        _ => (false, tokens),
    }
}

/// Groups `number [mark]` pairs. Returns `None` for anything else.
fn dms_components(body: &[Token]) -> Option<Vec<Component<'_>>> {
    let mut components = Vec::new();
    let mut iter = body.iter().peekable();
    while let Some(token) = iter.next() {
        let Token::Number(number) = token else {
            return None;
        };
        let mark = match iter.peek() {
            Some(Token::Mark(m)) => {
                let m = *m;
                iter.next();
                Some(m)
            }
            _ => None,
        };
        components.push(Component { number, mark });
    }
    if components.is_empty() || components.len() > 3 {
        return None;
    }
    Some(components)
}

/// A DMS body is "tokenized" when it carries a unit mark or more than one number.
fn is_tokenized(components: &[Component<'_>]) -> bool {
    components.len() > 1 || components.iter().any(|c| c.mark.is_some())
}

/// Assigns components to degree/minute/second slots and sums them to degrees.
///
/// Marked components go to their slot; unmarked ones take the next free slot.
/// Slots must increase, and only the last component may carry a fraction.
fn resolve_dms(components: &[Component<'_>], max_degrees: f64) -> Result<f64, ParseError> {
    let mut slots = [0.0_f64; 3];
    let mut next_slot = 0;
    for (i, c) in components.iter().enumerate() {
        let slot = c.mark.map_or(next_slot, Mark::slot);
        if slot < next_slot || slot > 2 {
            return Err(ParseError::Unrecognized(describe(components)));
        }
        let is_last = i + 1 == components.len();
        if !is_last && c.number.frac_digits.is_some() {
            return Err(ParseError::Unrecognized(describe(components)));
        }
        slots[slot] = c.number.value;
        next_slot = slot + 1;
    }
    let [degrees, minutes, seconds] = slots;
    check_range("minutes", minutes, 60.0)?;
    check_range("seconds", seconds, 60.0)?;
    let total = degrees + minutes / 60.0 + seconds / 3600.0;
    check_range_inclusive("degrees", total, max_degrees)?;
    Ok(total)
}

/// Reads `DD.MM` or `DD.MMSS`; no fraction means whole degrees.
fn unpack_dd_mmss(n: &Number, max_degrees: f64) -> Result<f64, ParseError> {
    let degrees: f64 = if n.int_digits.is_empty() {
        0.0
    } else {
        n.int_digits
            .parse()
            .map_err(|_| ParseError::Unrecognized(n.int_digits.clone()))?
    };
    let (minutes, seconds) = match n.frac_digits.as_deref() {
        None => (0.0, 0.0),
        Some(frac) if frac.len() == 2 => (parse_digits(frac)?, 0.0),
        Some(frac) if frac.len() == 4 => (parse_digits(&frac[..2])?, parse_digits(&frac[2..])?),
        Some(frac) => {
            return Err(ParseError::InvalidCompactFraction(format!(
                "{}.{frac}",
                n.int_digits
            )))
        }
    };
    check_range("minutes", minutes, 60.0)?;
    check_range("seconds", seconds, 60.0)?;
    let total = degrees + minutes / 60.0 + seconds / 3600.0;
    check_range_inclusive("degrees", total, max_degrees)?;
    Ok(total)
}

fn parse_digits(digits: &str) -> Result<f64, ParseError> {
    digits
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| ParseError::Unrecognized(digits.to_string()))
}

fn check_range(field: &'static str, value: f64, max: f64) -> Result<(), ParseError> {
    if value >= max {
        return Err(ParseError::OutOfRange { field, value, max });
    }
    Ok(())
}

fn check_range_inclusive(field: &'static str, value: f64, max: f64) -> Result<(), ParseError> {
    if value > max {
        return Err(ParseError::OutOfRange { field, value, max });
    }
    Ok(())
}

/// `N θ E` → θ, `S θ E` → 180 − θ, `S θ W` → 180 + θ, `N θ W` → 360 − θ.
fn quadrant_to_north_azimuth(ns: char, angle: f64, ew: char) -> f64 {
    match (ns, ew) {
        ('N', 'E') => angle,
        ('S', 'E') => 180.0 - angle,
        ('S', _) => 180.0 + angle,
        _ => 360.0 - angle,
    }
}

fn describe(components: &[Component<'_>]) -> String {
    components
        .iter()
        .map(|c| c.number.value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::angle_text::lexer::tokenize;

    fn first_match(text: &str) -> (Grammar, f64) {
        let tokens = tokenize(text).unwrap();
        for g in GRAMMARS {
            if let Some(deg) = g.try_match(&tokens).unwrap() {
                return (g, deg);
            }
        }
        panic!("no grammar matched {text:?}");
    }

    #[test]
    fn quadrant_tokenized_variants() {
        let (g, deg) = first_match("N 45°30'00\" E");
        assert_eq!(g, Grammar::QuadrantTokenized);
        assert!((deg - 45.5).abs() < 1e-12);

        let (g, deg) = first_match("S 10 30 W");
        assert_eq!(g, Grammar::QuadrantTokenized);
        assert!((deg - 190.5).abs() < 1e-12);
    }

    #[test]
    fn quadrant_compact_variants() {
        let (g, deg) = first_match("N45.3015E");
        assert_eq!(g, Grammar::QuadrantCompact);
        assert!((deg - (45.0 + 30.0 / 60.0 + 15.0 / 3600.0)).abs() < 1e-12);

        let (_, deg) = first_match("S20.30E");
        assert!((deg - 159.5).abs() < 1e-12);

        let (_, deg) = first_match("N 12 W");
        assert!((deg - 348.0).abs() < 1e-12);
    }

    #[test]
    fn compact_rejects_three_digit_fraction() {
        let tokens = tokenize("N45.301E").unwrap();
        let err = Grammar::QuadrantCompact.try_match(&tokens).unwrap_err();
        assert!(matches!(err, ParseError::InvalidCompactFraction(_)));
    }

    #[test]
    fn azimuth_forms() {
        let (g, deg) = first_match("AZ 123°45'");
        assert_eq!(g, Grammar::AzimuthDms);
        assert!((deg - 123.75).abs() < 1e-12);

        let (g, deg) = first_match("AZ 123.4500");
        assert_eq!(g, Grammar::AzimuthNumeric);
        assert!((deg - 123.75).abs() < 1e-12);

        let (g, deg) = first_match("123.45");
        assert_eq!(g, Grammar::AzimuthNumeric);
        assert!((deg - 123.45).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_components() {
        let tokens = tokenize("N 95°00'00\" E").unwrap();
        assert!(matches!(
            Grammar::QuadrantTokenized.try_match(&tokens),
            Err(ParseError::OutOfRange { field: "degrees", .. })
        ));

        let tokens = tokenize("AZ 10°75'").unwrap();
        assert!(matches!(
            Grammar::AzimuthDms.try_match(&tokens),
            Err(ParseError::OutOfRange { field: "minutes", .. })
        ));
    }

    #[test]
    fn marks_must_increase() {
        let tokens = tokenize("10' 20°").unwrap();
        assert!(Grammar::AzimuthDms.try_match(&tokens).is_err());
    }
}
