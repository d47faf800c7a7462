//! Wall-clock helpers for the night-rate window.
//!
//! Quote requests carry the trip time the way the booking form collects
//! it: a 12-hour clock string plus an AM/PM designator. The night rate
//! applies from 22:00 through 05:59.

use std::str::FromStr;

use crate::{FareError, FareResult};

/// First hour of the night window, 24-hour clock
pub const NIGHT_START_HOUR: u32 = 22;

/// First morning hour the night rate no longer applies to
pub const NIGHT_END_HOUR: u32 = 6;

/// AM/PM designator on a 12-hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl FromStr for Meridiem {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Self::Am),
            "PM" => Ok(Self::Pm),
            other => Err(FareError::InvalidTime(other.to_string())),
        }
    }
}

/// Parse an "H:MM" or "HH:MM" 12-hour clock string into (hour, minute)
pub fn parse_clock(time: &str) -> FareResult<(u32, u32)> {
    let (hh, mm) = time
        .split_once(':')
        .ok_or_else(|| FareError::InvalidTime(time.to_string()))?;

    let hour: u32 = hh
        .trim()
        .parse()
        .map_err(|_| FareError::InvalidTime(time.to_string()))?;
    let minute: u32 = mm
        .trim()
        .parse()
        .map_err(|_| FareError::InvalidTime(time.to_string()))?;

    if hour == 0 || hour > 12 || minute > 59 {
        return Err(FareError::InvalidTime(time.to_string()));
    }

    Ok((hour, minute))
}

/// Convert a 12-hour clock hour to 24-hour. 12 AM is midnight, 12 PM noon.
pub fn hour24(hour12: u32, meridiem: Meridiem) -> u32 {
    match (meridiem, hour12) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    }
}

/// Whether a 24-hour hour falls inside the night window
pub fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

/// Night flag for a quoted trip time, e.g. ("11:30", Pm) -> true
pub fn night_rate(time: &str, meridiem: Meridiem) -> FareResult<bool> {
    let (hour12, _minute) = parse_clock(time)?;
    Ok(is_night_hour(hour24(hour12, meridiem)))
}
