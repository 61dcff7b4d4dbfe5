// Shared feed-to-domain mapping helpers

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::domain::PlayerPosition;

/// First month of a new season (August)
const SEASON_START_MONTH: u32 = 8;

/// Normalize a scorers "section" to a canonical position
///
/// Unrecognized sections are kept verbatim.
pub fn position_from_section(section: &str) -> String {
    PlayerPosition::from_section(section)
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| section.to_string())
}

/// Calendar year the season containing `today` started in
pub fn season_start_year(today: NaiveDate) -> i32 {
    if today.month() >= SEASON_START_MONTH {
        today.year()
    } else {
        today.year() - 1
    }
}

/// Season label such as "2026/27" for the season containing `today`
pub fn season_label(today: NaiveDate) -> String {
    let start = season_start_year(today);
    format!("{}/{:02}", start, (start + 1) % 100)
}

/// Best-effort ISO date parse; failures are logged and dropped
pub fn parse_birth_date(raw: Option<&str>, player: &str) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(player, raw, error = %e, "Could not parse date of birth");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_rolls_over_in_august() {
        assert_eq!(season_label(day(2026, 10, 19)), "2026/27");
        assert_eq!(season_label(day(2026, 8, 1)), "2026/27");
        assert_eq!(season_label(day(2026, 7, 31)), "2025/26");
        assert_eq!(season_label(day(2000, 1, 15)), "1999/00");
        assert_eq!(season_start_year(day(2027, 3, 2)), 2026);
    }

    #[test]
    fn test_section_passthrough() {
        assert_eq!(position_from_section("Centre-Forward"), "Forward");
        assert_eq!(position_from_section("Defence"), "Defender");
        assert_eq!(position_from_section("Sweeper Keeper"), "Sweeper Keeper");
    }

    #[test]
    fn test_birth_date_best_effort() {
        assert_eq!(
            parse_birth_date(Some("2001-09-05"), "Bukayo Saka"),
            Some(day(2001, 9, 5))
        );
        assert_eq!(parse_birth_date(Some("05/09/2001"), "Bukayo Saka"), None);
        assert_eq!(parse_birth_date(None, "Bukayo Saka"), None);
    }
}
