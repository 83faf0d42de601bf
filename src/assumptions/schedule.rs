//! Sparse month- and year-keyed schedules
//!
//! Two lookup policies are used across the assumptions:
//! - exact lookup, where a month missing from the schedule means "nothing
//!   happened" (sales volumes, new subscribers)
//! - step lookup, where a milestone holds until the next one (headcount,
//!   yearly budgets)

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Last value defined at or before `at`, if any milestone precedes it.
///
/// This is the carry-forward rule shared by team-size curves, per-role
/// headcount timelines and per-year budgets.
pub fn last_defined_at_or_before<K: Ord + Copy>(points: &BTreeMap<K, f64>, at: K) -> Option<f64> {
    points.range(..=at).next_back().map(|(_, &value)| value)
}

/// Parse a schedule key such as `"m7"`, `"M7"`, `"y2027"` or a bare `"7"`.
fn parse_key(key: &str, prefix: char) -> ConfigResult<i64> {
    let trimmed = key.trim();
    let digits = trimmed
        .strip_prefix(prefix)
        .or_else(|| trimmed.strip_prefix(prefix.to_ascii_uppercase()))
        .unwrap_or(trimmed);

    digits.parse::<i64>().map_err(|_| ConfigError::InvalidScheduleKey {
        key: key.to_string(),
    })
}

fn parse_month_key(key: &str) -> ConfigResult<u32> {
    let month = parse_key(key, 'm')?;
    if month < 1 || month > i64::from(u32::MAX) {
        return Err(ConfigError::InvalidScheduleKey { key: key.to_string() });
    }
    Ok(month as u32)
}

/// Month-keyed values looked up exactly; absent months resolve to zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct MonthSchedule {
    points: BTreeMap<u32, f64>,
}

impl MonthSchedule {
    pub fn from_pairs<I: IntoIterator<Item = (u32, f64)>>(pairs: I) -> Self {
        Self {
            points: pairs.into_iter().collect(),
        }
    }

    /// Value defined for exactly this month
    pub fn get(&self, month: u32) -> Option<f64> {
        self.points.get(&month).copied()
    }

    /// Value for this month, zero when the month is not scheduled
    pub fn get_or_zero(&self, month: u32) -> f64 {
        self.get(month).unwrap_or(0.0)
    }

    /// Last month with a defined value (the schedule's horizon)
    pub fn last_month(&self) -> Option<u32> {
        self.points.keys().next_back().copied()
    }

    /// Multiply every scheduled value by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|(&m, &v)| (m, v * factor)).collect(),
        }
    }

    /// Move every entry `months` later
    pub fn shifted(&self, months: u32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|(&m, &v)| (m.saturating_add(months), v))
                .collect(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.points.iter().map(|(&m, &v)| (m, v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for MonthSchedule {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut points = BTreeMap::new();
        for (key, value) in raw {
            points.insert(parse_month_key(&key)?, value);
        }
        Ok(Self { points })
    }
}

/// Month-keyed milestones where each value holds until the next milestone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct StepSchedule {
    points: BTreeMap<u32, f64>,
}

impl StepSchedule {
    pub fn from_pairs<I: IntoIterator<Item = (u32, f64)>>(pairs: I) -> Self {
        Self {
            points: pairs.into_iter().collect(),
        }
    }

    /// Most recent milestone at or before `month`; `None` before the first one
    pub fn value_at(&self, month: u32) -> Option<f64> {
        last_defined_at_or_before(&self.points, month)
    }
}

impl TryFrom<BTreeMap<String, f64>> for StepSchedule {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        MonthSchedule::try_from(raw).map(|exact| Self { points: exact.points })
    }
}

/// Calendar-year keyed values, carried forward to later years.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>")]
pub struct YearSchedule {
    points: BTreeMap<i32, f64>,
}

impl YearSchedule {
    pub fn from_pairs<I: IntoIterator<Item = (i32, f64)>>(pairs: I) -> Self {
        Self {
            points: pairs.into_iter().collect(),
        }
    }

    /// Value for `year`, or the latest earlier year's value
    pub fn value_at(&self, year: i32) -> Option<f64> {
        last_defined_at_or_before(&self.points, year)
    }

    pub fn values(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.points.iter().map(|(&y, &v)| (y, v))
    }
}

impl TryFrom<BTreeMap<String, f64>> for YearSchedule {
    type Error = ConfigError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut points = BTreeMap::new();
        for (key, value) in raw {
            let year = parse_key(&key, 'y')?;
            let year = i32::try_from(year)
                .map_err(|_| ConfigError::InvalidScheduleKey { key: key.clone() })?;
            points.insert(year, value);
        }
        Ok(Self { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carry_forward_rule() {
        let points: BTreeMap<u32, f64> = [(1, 5.0), (3, 7.0), (7, 9.0)].into_iter().collect();

        assert_eq!(last_defined_at_or_before(&points, 0), None);
        assert_eq!(last_defined_at_or_before(&points, 1), Some(5.0));
        assert_eq!(last_defined_at_or_before(&points, 2), Some(5.0));
        assert_eq!(last_defined_at_or_before(&points, 6), Some(7.0));
        assert_eq!(last_defined_at_or_before(&points, 50), Some(9.0));
    }

    #[test]
    fn test_month_schedule_exact_lookup() {
        let schedule = MonthSchedule::from_pairs([(1, 2.0), (4, 3.0)]);

        assert_eq!(schedule.get_or_zero(1), 2.0);
        assert_eq!(schedule.get_or_zero(2), 0.0);
        assert_eq!(schedule.get(4), Some(3.0));
        assert_eq!(schedule.last_month(), Some(4));
    }

    #[test]
    fn test_step_schedule_holds_until_next_milestone() {
        let team = StepSchedule::from_pairs([(1, 5.0), (3, 7.0)]);

        assert_eq!(team.value_at(2), Some(5.0));
        assert_eq!(team.value_at(14), Some(7.0));

        let late = StepSchedule::from_pairs([(4, 1.0)]);
        assert_eq!(late.value_at(3), None);
    }

    #[test]
    fn test_key_forms_accepted() {
        let raw: BTreeMap<String, f64> = [
            ("m1".to_string(), 1.5),
            ("M2".to_string(), 2.0),
            ("3".to_string(), 2.5),
        ]
        .into_iter()
        .collect();
        let schedule = MonthSchedule::try_from(raw).unwrap();
        assert_eq!(schedule.get(2), Some(2.0));
        assert_eq!(schedule.get(3), Some(2.5));

        let years: BTreeMap<String, f64> =
            [("y2026".to_string(), 2000.0), ("2028".to_string(), 4000.0)].into_iter().collect();
        let years = YearSchedule::try_from(years).unwrap();
        assert_eq!(years.value_at(2025), None);
        assert_eq!(years.value_at(2027), Some(2000.0));
        assert_eq!(years.value_at(2029), Some(4000.0));
    }

    #[test]
    fn test_bad_keys_rejected() {
        let raw: BTreeMap<String, f64> = [("month-one".to_string(), 1.0)].into_iter().collect();
        assert!(MonthSchedule::try_from(raw).is_err());

        let zero: BTreeMap<String, f64> = [("m0".to_string(), 1.0)].into_iter().collect();
        assert!(MonthSchedule::try_from(zero).is_err());
    }

    #[test]
    fn test_scaled_and_shifted() {
        let schedule = MonthSchedule::from_pairs([(8, 2.0), (9, 3.0)]);

        let scaled = schedule.scaled(1.5);
        assert_eq!(scaled.get(9), Some(4.5));

        let shifted = schedule.shifted(2);
        assert_eq!(shifted.get(8), None);
        assert_eq!(shifted.get(10), Some(2.0));
    }
}
