//! Feed rate unit handling
//!
//! G-code `F` words are millimeters per minute. Speed legends and summaries
//! are usually shown in millimeters per second.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feed rate units selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedRateUnits {
    /// Millimeters per minute
    MmPerMin,
    /// Millimeters per second
    #[default]
    MmPerSec,
}

impl fmt::Display for FeedRateUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MmPerMin => write!(f, "mm/min"),
            Self::MmPerSec => write!(f, "mm/s"),
        }
    }
}

impl FromStr for FeedRateUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm/min" | "mm_per_min" => Ok(Self::MmPerMin),
            "mm/s" | "mm/sec" | "mm_per_sec" => Ok(Self::MmPerSec),
            _ => Err(format!("Unknown feed rate units: {}", s)),
        }
    }
}

/// Convert a feed rate given in mm/min to the target units
pub fn convert_feed_rate(value_mm_per_min: f32, units: FeedRateUnits) -> f32 {
    match units {
        FeedRateUnits::MmPerMin => value_mm_per_min,
        FeedRateUnits::MmPerSec => value_mm_per_min / 60.0,
    }
}
