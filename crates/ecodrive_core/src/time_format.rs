//! Display helpers for timestamps shown in lists and notifications.

use chrono::{DateTime, Utc};

/// `dd/mm/yyyy`.
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy HH:MM`.
pub fn format_date_time(instant: DateTime<Utc>) -> String {
    instant.format("%d/%m/%Y %H:%M").to_string()
}

/// Coarse "time ago" label relative to `now`.
///
/// Future instants read as "just now"; anything a week old or more falls
/// back to [`format_date`].
pub fn format_relative_time(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(instant);
    let seconds = elapsed.num_seconds();
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} {} ago", plural(minutes, "minute"))
    } else if hours < 24 {
        format!("{hours} {} ago", plural(hours, "hour"))
    } else if days < 7 {
        format!("{days} {} ago", plural(days, "day"))
    } else {
        format_date(instant)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count > 1 {
        format!("{unit}s")
    } else {
        unit.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{format_date, format_date_time, format_relative_time};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn absolute_formats_are_day_first() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 5, 8, 7, 0).unwrap();
        assert_eq!(format_date(instant), "05/01/2026");
        assert_eq!(format_date_time(instant), "05/01/2026 08:07");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(1), now), "1 day ago");
        assert_eq!(format_relative_time(now - Duration::days(10), now), "05/06/2026");
    }
}
