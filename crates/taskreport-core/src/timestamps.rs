use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::{PipelineError, Result};
use crate::profiles::RegionProfile;

/// The only format accepted for the caller's cutoff.
pub const CUTOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Receipt times are written back in this form. Fractional seconds survive
/// (`%.f` prints nothing for whole seconds) so the output never rounds a row
/// down onto the cutoff.
pub const RECEIPT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const RECEIPT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

pub const DEFAULT_LEAD_MINUTES: i64 = 15;
pub const DEFAULT_RECEIPT_LAG_HOURS: i64 = 1;

pub fn parse_cutoff(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, CUTOFF_FORMAT).map_err(|_| {
        PipelineError::InvalidTimestamp {
            value: value.to_string(),
        }
    })
}

pub(crate) fn parse_receipt(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    RECEIPT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Wall-clock value stamped into the crystallization columns. The policy that
/// produces it belongs to the caller; the constructors below cover the two
/// policies in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustedTimestamp(String);

impl AdjustedTimestamp {
    /// Region-local time at `now` plus a lead, truncated to the minute.
    /// `None` when the result falls outside the representable range.
    pub fn lead_from_now(profile: &RegionProfile, now: DateTime<Utc>, lead: Duration) -> Option<Self> {
        let offset = Duration::try_hours(profile.utc_offset_hours as i64)?;
        let local = now
            .naive_utc()
            .checked_add_signed(offset)?
            .checked_add_signed(lead)?;
        Some(Self(local.format("%Y-%m-%d %H:%M:00").to_string()))
    }

    /// Latest receipt time present in the output plus a lag.
    pub fn after_latest_receipt(latest: NaiveDateTime, lag: Duration) -> Option<Self> {
        let stamped = latest.checked_add_signed(lag)?;
        Some(Self(stamped.format(CUTOFF_FORMAT).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::profiles::{Cadence, UnitSystem};

    fn profile(offset: i32) -> RegionProfile {
        RegionProfile {
            server_id: "GS TEST".into(),
            units: UnitSystem::Metric,
            cadence: Cadence::Daily,
            utc_offset_hours: offset,
            primary: true,
        }
    }

    #[test]
    fn cutoff_requires_exact_format() {
        assert!(parse_cutoff("2024-05-01 08:00:00").is_ok());
        for bad in ["2024-05-01", "2024-05-01T08:00:00", "2024-05-01 08:00", "01/05/2024 08:00:00", ""] {
            let err = parse_cutoff(bad).expect_err("malformed cutoff accepted");
            assert!(matches!(err, PipelineError::InvalidTimestamp { .. }));
            assert!(err.to_string().contains("YYYY-MM-DD HH:MM:SS"));
        }
    }

    #[test]
    fn receipts_accept_common_export_forms() {
        let expected = NaiveDateTime::parse_from_str("2024-05-01 08:30:00", CUTOFF_FORMAT).unwrap();
        assert_eq!(parse_receipt("2024-05-01 08:30:00"), Some(expected));
        assert_eq!(parse_receipt("2024-05-01 08:30"), Some(expected));
        assert_eq!(parse_receipt("2024/05/01 08:30:00"), Some(expected));
        assert_eq!(parse_receipt("2024-05-01 08:30:00.000"), Some(expected));
        assert_eq!(parse_receipt("yesterday"), None);
    }

    #[test]
    fn lead_policy_uses_region_offset_and_truncates_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 50, 42).unwrap();
        let stamp = AdjustedTimestamp::lead_from_now(&profile(9), now, Duration::minutes(15)).unwrap();
        assert_eq!(stamp.as_str(), "2024-05-01 10:05:00");

        let stamp = AdjustedTimestamp::lead_from_now(&profile(8), now, Duration::minutes(15)).unwrap();
        assert_eq!(stamp.as_str(), "2024-05-01 09:05:00");
    }

    #[test]
    fn receipt_policy_adds_lag() {
        let latest = NaiveDateTime::parse_from_str("2024-05-01 23:30:15", CUTOFF_FORMAT).unwrap();
        let stamp = AdjustedTimestamp::after_latest_receipt(latest, Duration::hours(1)).unwrap();
        assert_eq!(stamp.as_str(), "2024-05-02 00:30:15");
    }

    #[test]
    fn out_of_range_stamps_are_none() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 50, 42).unwrap();
        assert!(AdjustedTimestamp::lead_from_now(&profile(8), now, Duration::MAX).is_none());
        assert!(AdjustedTimestamp::after_latest_receipt(NaiveDateTime::MAX, Duration::hours(1)).is_none());
    }
}
