use crate::error::ParseError;

/// Unit mark following a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Mark {
    Degree,
    Minute,
    Second,
}

impl Mark {
    /// Slot in a degrees/minutes/seconds triple.
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Degree => 0,
            Self::Minute => 1,
            Self::Second => 2,
        }
    }
}

/// Numeric literal, keeping the fractional digits for packed `DD.MMSS` forms.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Number {
    pub value: f64,
    pub int_digits: String,
    pub frac_digits: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// One of `N`, `S`, `E`, `W`.
    Quadrant(char),
    /// The `AZ` prefix.
    Azimuth,
    Number(Number),
    Mark(Mark),
}

/// Splits upper-cased angle text into tokens.
///
/// Whitespace only separates tokens. `''` directly after a minute mark is
/// read as a second mark.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let unrecognized = || ParseError::Unrecognized(text.to_string());
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut prev_was_minute_mark = false;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            prev_was_minute_mark = false;
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let int_digits: String = chars[start..i].iter().collect();
            let frac_digits = if i < chars.len() && chars[i] == '.' {
                i += 1;
                let frac_start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                Some(chars[frac_start..i].iter().collect::<String>())
            } else {
                None
            };
            if int_digits.is_empty() && frac_digits.as_deref().is_none_or(str::is_empty) {
                return Err(unrecognized());
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal.parse::<f64>().map_err(|_| unrecognized())?;
            tokens.push(Token::Number(Number {
                value,
                int_digits,
                frac_digits,
            }));
            prev_was_minute_mark = false;
            continue;
        }

        if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
            split_word(&chars[start..i], &mut tokens).ok_or_else(unrecognized)?;
            prev_was_minute_mark = false;
            continue;
        }

        let mark = match c {
            '°' | 'º' | '˚' => Mark::Degree,
            '\'' | '’' | '′' => Mark::Minute,
            '"' | '”' | '″' => Mark::Second,
            _ => return Err(unrecognized()),
        };
        if mark == Mark::Minute && prev_was_minute_mark && c == '\'' {
            tokens.pop();
            tokens.push(Token::Mark(Mark::Second));
            prev_was_minute_mark = false;
        } else {
            tokens.push(Token::Mark(mark));
            prev_was_minute_mark = mark == Mark::Minute;
        }
        i += 1;
    }

    Ok(tokens)
}

/// Reads a run of letters, which may hold several tokens written unspaced
/// (`DE` in `N45DE`). `DEG` and `AZ` are taken whole where they start.
fn split_word(letters: &[char], tokens: &mut Vec<Token>) -> Option<()> {
    let mut rest = letters;
    while let Some(&first) = rest.first() {
        let (token, used) = match rest {
            ['D', 'E', 'G', ..] => (Token::Mark(Mark::Degree), 3),
            ['A', 'Z', ..] => (Token::Azimuth, 2),
            ['D', ..] => (Token::Mark(Mark::Degree), 1),
            ['N' | 'S' | 'E' | 'W', ..] => (Token::Quadrant(first), 1),
            _ => return None,
        };
        tokens.push(token);
        rest = &rest[used..];
    }
    Some(())
}
