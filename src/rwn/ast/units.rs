//! Work and rest quantities
//!
//! Durations are stored in seconds, distances in meters. Clock values are parsed through
//! tenths of a second so `1:45.5` is exactly `105.5`.

use serde::Serialize;
use std::fmt;

/// The amount of work in a segment; exactly one kind per unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WorkUnit {
    Distance { meters: f64 },
    Duration { seconds: f64 },
    Calories { count: u32 },
}

impl WorkUnit {
    pub fn kind_name(&self) -> &'static str {
        match self {
            WorkUnit::Distance { .. } => "distance",
            WorkUnit::Duration { .. } => "duration",
            WorkUnit::Calories { .. } => "calories",
        }
    }

    pub fn same_kind(&self, other: &WorkUnit) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// The magnitude in the unit's own dimension
    pub fn magnitude(&self) -> f64 {
        match self {
            WorkUnit::Distance { meters } => *meters,
            WorkUnit::Duration { seconds } => *seconds,
            WorkUnit::Calories { count } => f64::from(*count),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.magnitude() > 0.0
    }
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkUnit::Distance { meters } => write!(f, "{}m", meters),
            WorkUnit::Duration { seconds } => write!(f, "{}", format_clock(*seconds)),
            WorkUnit::Calories { count } => write!(f, "{}cal", count),
        }
    }
}

/// A rest quantity, same shapes as [`WorkUnit`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RestUnit(pub WorkUnit);

impl RestUnit {
    pub fn unit(&self) -> &WorkUnit {
        &self.0
    }
}

impl fmt::Display for RestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}r", self.0)
    }
}

/// Reasons a clock value is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// Not of the shape `M:SS`, `M:SS.s` or `H:MM:SS`
    Shape,
    /// Seconds (or minutes of an `H:MM:SS` value) of 60 or more
    FieldOutOfRange,
    /// More than one fractional digit
    Precision,
    /// Too large to be held exactly in tenths of a second
    Overflow,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::Shape => write!(f, "expected M:SS, M:SS.s or H:MM:SS"),
            ClockError::FieldOutOfRange => write!(f, "minutes and seconds must be below 60"),
            ClockError::Precision => write!(f, "only tenths of a second are supported"),
            ClockError::Overflow => write!(f, "value is too large"),
        }
    }
}

impl std::error::Error for ClockError {}

/// Parse a clock value into seconds.
///
/// Two fields are minutes and seconds (`75:00` is 75 minutes), three fields are hours, minutes
/// and seconds.
pub fn parse_clock(text: &str) -> Result<f64, ClockError> {
    // largest count of tenths an f64 holds exactly
    const MAX_TENTHS: u64 = 1 << 53;

    let (clock, fraction) = match text.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (text, None),
    };

    let tenths = match fraction {
        None => 0,
        Some(digits) if digits.len() == 1 => digits.parse::<u64>().map_err(|_| ClockError::Shape)?,
        Some(digits) if digits.is_empty() => return Err(ClockError::Shape),
        Some(_) => return Err(ClockError::Precision),
    };

    let fields = clock
        .split(':')
        .map(|field| {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                Err(ClockError::Shape)
            } else {
                // all digits, so only too many of them can fail
                field.parse::<u64>().map_err(|_| ClockError::Overflow)
            }
        })
        .collect::<Result<Vec<u64>, ClockError>>()?;

    let whole = match fields.as_slice() {
        [minutes, seconds] => {
            if *seconds >= 60 {
                return Err(ClockError::FieldOutOfRange);
            }
            minutes.checked_mul(60).and_then(|total| total.checked_add(*seconds))
        }
        [hours, minutes, seconds] => {
            if *minutes >= 60 || *seconds >= 60 {
                return Err(ClockError::FieldOutOfRange);
            }
            hours
                .checked_mul(3600)
                .and_then(|total| total.checked_add(minutes * 60 + seconds))
        }
        _ => return Err(ClockError::Shape),
    };

    let total = whole
        .and_then(|whole| whole.checked_mul(10))
        .and_then(|total| total.checked_add(tenths))
        .filter(|total| *total <= MAX_TENTHS)
        .ok_or(ClockError::Overflow)?;
    Ok(total as f64 / 10.0)
}

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour on. Tenths are shown only when non-zero.
pub fn format_clock(seconds: f64) -> String {
    let tenths = (seconds.max(0.0) * 10.0).round() as u64;
    let whole = tenths / 10;
    let fraction = tenths % 10;

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    let mut out = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    };
    if fraction > 0 {
        out.push_str(&format!(".{}", fraction));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_minutes_seconds() {
        assert_eq!(parse_clock("1:00"), Ok(60.0));
        assert_eq!(parse_clock("3:30"), Ok(210.0));
        assert_eq!(parse_clock("75:00"), Ok(4500.0));
        assert_eq!(parse_clock("1:45.5"), Ok(105.5));
    }

    #[test]
    fn test_parse_clock_hours() {
        assert_eq!(parse_clock("1:00:00"), Ok(3600.0));
        assert_eq!(parse_clock("1:02:03"), Ok(3723.0));
        assert_eq!(parse_clock("1:60:00"), Err(ClockError::FieldOutOfRange));
    }

    #[test]
    fn test_parse_clock_rejects_bad_values() {
        assert_eq!(parse_clock("1:60"), Err(ClockError::FieldOutOfRange));
        assert_eq!(parse_clock("1:00.25"), Err(ClockError::Precision));
        assert_eq!(parse_clock("1:"), Err(ClockError::Shape));
        assert_eq!(parse_clock("100"), Err(ClockError::Shape));
        assert_eq!(parse_clock("1:2:3:4"), Err(ClockError::Shape));
    }

    #[test]
    fn test_parse_clock_overflow() {
        assert_eq!(parse_clock("999999999999999999:00"), Err(ClockError::Overflow));
        assert_eq!(parse_clock("99999999999999999:00:00"), Err(ClockError::Overflow));
        assert_eq!(parse_clock("1000000:00:00"), Ok(3_600_000_000.0));
        assert_eq!(parse_clock("123456789012345678901234:00"), Err(ClockError::Overflow));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(60.0), "1:00");
        assert_eq!(format_clock(105.5), "1:45.5");
        assert_eq!(format_clock(4500.0), "1:15:00");
        assert_eq!(format_clock(5.0), "0:05");
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(WorkUnit::Distance { meters: 500.0 }.to_string(), "500m");
        assert_eq!(WorkUnit::Distance { meters: 500.5 }.to_string(), "500.5m");
        assert_eq!(WorkUnit::Calories { count: 20 }.to_string(), "20cal");
        assert_eq!(
            RestUnit(WorkUnit::Duration { seconds: 90.0 }).to_string(),
            "1:30r"
        );
    }

    #[test]
    fn test_same_kind() {
        let a = WorkUnit::Distance { meters: 500.0 };
        let b = WorkUnit::Distance { meters: 2000.0 };
        let c = WorkUnit::Duration { seconds: 60.0 };
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&c));
    }
}
