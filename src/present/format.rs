use chrono::{DateTime, Utc};

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn format_change(change_pct: f64) -> String {
    let sign = if change_pct >= 0.0 { "+" } else { "" };
    format!("{sign}{change_pct:.2}%")
}

pub fn format_value(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// "Just now", "N minutes ago", "N hours ago", else the calendar date.
pub fn last_update_text(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - ts).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    ts.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn prices_and_changes() {
        assert_eq!(format_price(571.234), "$571.23");
        assert_eq!(format_change(1.5), "+1.50%");
        assert_eq!(format_change(-0.25), "-0.25%");
        assert_eq!(format_value(18.26, 1), "18.3");
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(last_update_text(now - Duration::seconds(30), now), "Just now");
        assert_eq!(last_update_text(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(last_update_text(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(last_update_text(now - Duration::days(2), now), "2025-06-29");
    }
}
