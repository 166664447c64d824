use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Monday-start, Sunday-end week. The whole calendar surface of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekBounds {
    /// Week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_runs_monday_through_sunday() {
        // 2025-03-05 is a Wednesday
        let week = WeekBounds::containing(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(week.start, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(week.end, NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    }

    #[test]
    fn monday_and_sunday_map_to_their_own_week() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(WeekBounds::containing(monday).start, monday);
        assert_eq!(WeekBounds::containing(sunday).start, monday);
    }

    #[test]
    fn membership_is_inclusive_on_both_ends() {
        let week = WeekBounds::containing(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert!(week.contains(week.start));
        assert!(week.contains(week.end));
        assert!(!week.contains(week.start - Duration::days(1)));
        assert!(!week.contains(week.end + Duration::days(1)));
    }
}
