use std::fmt;

/// Result of a lenient base-10 integer parse.
///
/// A failed parse is kept as [`ParsedInt::NotANumber`] instead of being
/// replaced with a default, so callers can tell "absent" from "malformed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedInt {
    Value(i64),
    NotANumber,
}

impl ParsedInt {
    pub fn is_nan(self) -> bool {
        matches!(self, ParsedInt::NotANumber)
    }

    /// `0` and the sentinel are falsy, everything else is truthy.
    pub fn is_truthy(self) -> bool {
        matches!(self, ParsedInt::Value(v) if v != 0)
    }

    /// Grid span for layout. Anything that is not a positive count occupies one slot.
    pub fn span(self) -> usize {
        match self {
            ParsedInt::Value(v) if v >= 1 => usize::try_from(v).unwrap_or(usize::MAX),
            _ => 1,
        }
    }
}

impl From<i64> for ParsedInt {
    fn from(value: i64) -> Self {
        ParsedInt::Value(value)
    }
}

impl fmt::Display for ParsedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedInt::Value(v) => write!(f, "{v}"),
            ParsedInt::NotANumber => f.write_str("NaN"),
        }
    }
}

/// Parses the leading base-10 integer of `text`.
///
/// Leading whitespace (including a byte order mark) and a single sign are
/// accepted, then the longest run of ASCII digits. Whatever follows the
/// digits is ignored. Out-of-range values saturate.
pub fn parse_int(text: &str) -> ParsedInt {
    let rest = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);

    let mut seen = false;
    let mut value: i64 = 0;
    for digit in digits {
        seen = true;
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    if seen {
        ParsedInt::Value(value)
    } else {
        ParsedInt::NotANumber
    }
}
