//! Calendar anchoring of projection months

use chrono::{Datelike, NaiveDate};

use crate::error::{ConfigError, ConfigResult};

/// Maps 1-indexed projection months onto calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    /// First day of projection month 1
    start: NaiveDate,
}

impl Timeline {
    pub fn new(year: i32, month: u32) -> ConfigResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|start| Self { start })
            .ok_or_else(|| ConfigError::InvalidTimelineStart(format!("{year}-{month}")))
    }

    /// Parse a `"YYYY-MM"` start month
    pub fn parse(start: &str) -> ConfigResult<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", start.trim()), "%Y-%m-%d")
            .map(|start| Self { start })
            .map_err(|_| ConfigError::InvalidTimelineStart(start.to_string()))
    }

    /// Whether a projection month is December
    pub fn is_year_end(&self, month: u32) -> bool {
        self.calendar_month(month).1 == 12
    }

    /// (calendar year, calendar month 1-12) of a projection month
    pub fn calendar_month(&self, month: u32) -> (i32, u32) {
        let offset = i64::from(month.saturating_sub(1));
        let zero_based = i64::from(self.start.year()) * 12 + i64::from(self.start.month0()) + offset;
        (zero_based.div_euclid(12) as i32, zero_based.rem_euclid(12) as u32 + 1)
    }

    /// Calendar year used for per-year budgets
    pub fn year_of(&self, month: u32) -> i32 {
        self.calendar_month(month).0
    }

    /// `"YYYY-MM"` label of a projection month
    pub fn label(&self, month: u32) -> String {
        let (year, calendar_month) = self.calendar_month(month);
        format!("{year:04}-{calendar_month:02}")
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roll_over_years() {
        let timeline = Timeline::parse("2025-11").unwrap();

        assert_eq!(timeline.label(1), "2025-11");
        assert_eq!(timeline.label(2), "2025-12");
        assert_eq!(timeline.label(3), "2026-01");
        assert_eq!(timeline.label(14), "2026-12");
        assert_eq!(timeline.label(50), "2029-12");
    }

    #[test]
    fn test_year_of() {
        let timeline = Timeline::default();

        assert_eq!(timeline.year_of(1), 2025);
        assert_eq!(timeline.year_of(3), 2026);
        assert_eq!(timeline.year_of(15), 2027);
        assert_eq!(timeline.year_of(50), 2029);
    }

    #[test]
    fn test_year_end_follows_calendar() {
        let timeline = Timeline::default();

        assert!(timeline.is_year_end(2));
        assert!(!timeline.is_year_end(12));
        assert!(timeline.is_year_end(14));
        assert!(timeline.is_year_end(50));

        let january = Timeline::new(2026, 1).unwrap();
        assert!(january.is_year_end(12));
    }

    #[test]
    fn test_invalid_start_rejected() {
        assert!(Timeline::parse("2025-13").is_err());
        assert!(Timeline::parse("November").is_err());
        assert!(Timeline::new(2025, 0).is_err());
    }
}
