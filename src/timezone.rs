//! Helpers for working out "today" in the server's configured timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Look up the current UTC offset for a canonical timezone name, e.g.
/// "Pacific/Auckland". Returns `None` for names that are not in the tz
/// database.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date in the given timezone.
///
/// Insights bucket bills into "this month" and "this year" relative to this
/// date, so it must follow the configured zone rather than UTC.
pub fn local_today(canonical_timezone: &str) -> Option<Date> {
    get_local_offset(canonical_timezone)
        .map(|offset| OffsetDateTime::now_utc().to_offset(offset).date())
}

#[cfg(test)]
mod timezone_tests {
    use super::{get_local_offset, local_today};

    #[test]
    fn utc_resolves() {
        assert!(get_local_offset("Etc/UTC").is_some());
        assert!(local_today("Etc/UTC").is_some());
    }

    #[test]
    fn unknown_zone_is_none() {
        assert!(get_local_offset("Nowhere/Nothing").is_none());
        assert!(local_today("Nowhere/Nothing").is_none());
    }
}
