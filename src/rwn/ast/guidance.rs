//! Guidance: execution intent attached to a segment
//!
//! Guidance is metadata, it never changes the amount of work. The estimator may use pace
//! guidance to convert between distance and time.

use super::units::format_clock;
use serde::Serialize;
use std::fmt;

/// Named training-intensity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Zone {
    #[serde(rename = "UT2")]
    Ut2,
    #[serde(rename = "UT1")]
    Ut1,
    #[serde(rename = "AT")]
    At,
    #[serde(rename = "TR")]
    Tr,
    #[serde(rename = "AN")]
    An,
}

impl Zone {
    pub const ALL: [Zone; 5] = [Zone::Ut2, Zone::Ut1, Zone::At, Zone::Tr, Zone::An];

    /// Case-insensitive lookup of a zone name
    pub fn from_name(name: &str) -> Option<Self> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.name().eq_ignore_ascii_case(name))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Zone::Ut2 => "UT2",
            Zone::Ut1 => "UT1",
            Zone::At => "AT",
            Zone::Tr => "TR",
            Zone::An => "AN",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reference distance of a relative pace (`@2k+10` is relative to the 2k pace)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ReferenceDistance {
    #[serde(rename = "1k")]
    K1,
    #[serde(rename = "2k")]
    K2,
    #[serde(rename = "5k")]
    K5,
    #[serde(rename = "6k")]
    K6,
    #[serde(rename = "10k")]
    K10,
    #[serde(rename = "21k")]
    K21,
    #[serde(rename = "42k")]
    K42,
}

impl ReferenceDistance {
    pub const ALL: [ReferenceDistance; 7] = [
        ReferenceDistance::K1,
        ReferenceDistance::K2,
        ReferenceDistance::K5,
        ReferenceDistance::K6,
        ReferenceDistance::K10,
        ReferenceDistance::K21,
        ReferenceDistance::K42,
    ];

    pub fn from_kilometers(km: u32) -> Option<Self> {
        ReferenceDistance::ALL
            .into_iter()
            .find(|reference| reference.kilometers() == km)
    }

    pub fn kilometers(&self) -> u32 {
        match self {
            ReferenceDistance::K1 => 1,
            ReferenceDistance::K2 => 2,
            ReferenceDistance::K5 => 5,
            ReferenceDistance::K6 => 6,
            ReferenceDistance::K10 => 10,
            ReferenceDistance::K21 => 21,
            ReferenceDistance::K42 => 42,
        }
    }

    /// Parse the `2k` spelling used in notation and configuration keys
    pub fn from_label(label: &str) -> Option<Self> {
        let digits = label
            .strip_suffix('k')
            .or_else(|| label.strip_suffix('K'))?;
        digits.parse().ok().and_then(Self::from_kilometers)
    }
}

impl fmt::Display for ReferenceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}k", self.kilometers())
    }
}

/// Execution intent of a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Guidance {
    Rate {
        spm: u32,
    },
    RateRange {
        low: u32,
        high: u32,
    },
    Pace {
        #[serde(rename = "secondsPer500m")]
        seconds_per_500m: f64,
    },
    /// `low` is the faster (numerically smaller) split
    PaceRange {
        low: f64,
        high: f64,
    },
    RelativePace {
        reference: ReferenceDistance,
        #[serde(rename = "offsetSeconds")]
        offset_seconds: i32,
    },
    Zone {
        zone: Zone,
    },
}

impl Guidance {
    /// Whether a range variant has its bounds in effort order.
    ///
    /// Non-range variants are always ordered.
    pub fn is_ordered(&self) -> bool {
        match self {
            Guidance::RateRange { low, high } => low < high,
            Guidance::PaceRange { low, high } => low < high,
            Guidance::Rate { .. }
            | Guidance::Pace { .. }
            | Guidance::RelativePace { .. }
            | Guidance::Zone { .. } => true,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Guidance::RateRange { .. } | Guidance::PaceRange { .. })
    }
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guidance::Rate { spm } => write!(f, "@r{}", spm),
            Guidance::RateRange { low, high } => write!(f, "@r{}..{}", low, high),
            Guidance::Pace { seconds_per_500m } => write!(f, "@{}", format_clock(*seconds_per_500m)),
            Guidance::PaceRange { low, high } => {
                write!(f, "@{}..{}", format_clock(*low), format_clock(*high))
            }
            Guidance::RelativePace {
                reference,
                offset_seconds,
            } => match offset_seconds {
                0 => write!(f, "@{}", reference),
                offset if *offset > 0 => write!(f, "@{}+{}", reference, offset),
                offset => write!(f, "@{}-{}", reference, offset.unsigned_abs()),
            },
            Guidance::Zone { zone } => write!(f, "@{}", zone),
        }
    }
}
