//! Time related utils.

use chrono::Local;
use chrono::Utc;

/// DateTime is the alias of `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Which wall clock the signing timestamp is rendered in.
///
/// The service recomputes the signature from the timestamp it receives, so
/// either zone authenticates; the zone only matters for how the server judges
/// clock skew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampZone {
    /// Local time of the machine running the client.
    #[default]
    Local,
    /// Coordinated universal time.
    Utc,
}

/// Format time into the 14 digits signing timestamp: `20220313072004`
pub fn format_timestamp(t: DateTime, zone: TimestampZone) -> String {
    const FORMAT: &str = "%Y%m%d%H%M%S";

    match zone {
        TimestampZone::Local => t.with_timezone(&Local).format(FORMAT).to_string(),
        TimestampZone::Utc => t.format(FORMAT).to_string(),
    }
}
