//! Display helpers shared by story templates.

use chrono::{DateTime, Utc};

/// Formats a timestamp as a long en-US date, e.g. `January 8, 2022`.
pub fn format_story_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Formats a coordinate with six decimals, as shown next to story maps.
pub fn format_coordinate(value: f64) -> String {
    format!("{:.6}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_story_date() {
        let date = Utc.with_ymd_and_hms(2022, 1, 8, 6, 34, 18).unwrap();
        assert_eq!(format_story_date(&date), "January 8, 2022");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(-6.2088), "-6.208800");
    }
}
