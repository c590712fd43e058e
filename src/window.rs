//! Resolves the most recent synoptic observation time (00Z or 12Z).

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};

use crate::error::{Result, SoundingError};

/// Hours between a synoptic time and its report being available in the archive.
pub const DEFAULT_LAG_HOURS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationWindow {
    pub year: String,
    pub month: String,
    /// Zero-padded day followed by the synoptic hour, e.g. `2612`.
    pub day_hour: String,
}

impl ObservationWindow {
    /// Fails only when stepping back `lag_hours` leaves chrono's representable range.
    pub fn from_instant(now: DateTime<Utc>, lag_hours: u32) -> Result<Self> {
        let t = TimeDelta::try_hours(i64::from(lag_hours))
            .and_then(|lag| now.checked_sub_signed(lag))
            .ok_or(SoundingError::LagOutOfRange { hours: lag_hours })?;
        let synoptic_hour = t.hour() / 12 * 12;

        Ok(ObservationWindow {
            year: format!("{:04}", t.year()),
            month: format!("{:02}", t.month()),
            day_hour: format!("{:02}{:02}", t.day(), synoptic_hour),
        })
    }

    pub fn latest(lag_hours: u32) -> Result<Self> {
        Self::from_instant(Utc::now(), lag_hours)
    }

    /// `YYYYMMDDHH`, used to name the published object.
    pub fn timestamp(&self) -> String {
        format!("{}{}{}", self.year, self.month, self.day_hour)
    }
}

impl std::fmt::Display for ObservationWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{} {}Z", self.year, self.month, self.day_hour)
    }
}

// -- Tests -------------------------------------------------------------------
