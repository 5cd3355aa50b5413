//! Calendar work-day math and minimum-earning pro-ration.
//!
//! A role's expected minimum for a month is pro-rated by the share of the
//! month's work days covered by approved vacation. The month is always the
//! calendar month containing the queried range start.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::input::round2;
use crate::model::VacationRecord;

/// Week days (Mon-Fri) of the calendar month containing `unix` seconds.
pub fn work_days_in_month(unix: i64) -> Vec<NaiveDate> {
    let date = DateTime::<Utc>::from_timestamp(unix, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .date_naive();
    let first = date.with_day(1).unwrap_or(date);

    let mut days = Vec::new();
    let mut day = first;
    while day.month() == first.month() {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

fn to_date(unix: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(unix, 0).map(|dt| dt.date_naive())
}

/// Number of the month's work days covered by any of the vacation ranges.
pub fn vacation_overlap_work_days(vacations: &[VacationRecord], month_anchor: i64) -> usize {
    let work_days = work_days_in_month(month_anchor);
    work_days
        .iter()
        .filter(|day| {
            vacations.iter().any(|v| {
                match (to_date(v.date_from), to_date(v.date_to)) {
                    (Some(from), Some(to)) => from <= **day && **day <= to,
                    _ => false,
                }
            })
        })
        .count()
}

/// Pro-rated minimum earning for the month containing `range_start`.
///
/// `base_minimum x vacation-covered work days / total work days`, rounded
/// to 2 decimals. No vacation overlap resolves to zero.
pub fn role_minimum(base_minimum: f64, vacations: &[VacationRecord], range_start: i64) -> f64 {
    let total = work_days_in_month(range_start).len();
    if total == 0 {
        return 0.0;
    }
    let overlap = vacation_overlap_work_days(vacations, range_start);
    round2(base_minimum * overlap as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix(date: NaiveDate) -> i64 {
        date.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp()
    }

    #[test]
    fn june_2017_has_22_work_days() {
        let anchor = unix(NaiveDate::from_ymd_opt(2017, 6, 15).unwrap());
        let days = work_days_in_month(anchor);
        assert_eq!(days.len(), 22);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2017, 6, 1).unwrap());
        assert_eq!(*days.last().unwrap(), NaiveDate::from_ymd_opt(2017, 6, 30).unwrap());
    }

    #[test]
    fn ten_vacation_work_days_pro_rate_the_minimum() {
        let anchor = unix(NaiveDate::from_ymd_opt(2017, 6, 1).unwrap());
        let days = work_days_in_month(anchor);
        let vacation = VacationRecord {
            date_from: unix(days[5]),
            date_to: unix(days[14]),
        };
        assert_eq!(vacation_overlap_work_days(&[vacation], anchor), 10);

        let minimum = role_minimum(1000.0, &[vacation], anchor);
        assert_eq!(minimum, round2(1000.0 * 10.0 / 22.0));
    }

    #[test]
    fn vacation_outside_the_month_resolves_to_zero() {
        let june = unix(NaiveDate::from_ymd_opt(2017, 6, 1).unwrap());
        let july = unix(NaiveDate::from_ymd_opt(2017, 7, 3).unwrap());
        let vacation = VacationRecord {
            date_from: july,
            date_to: july + 5 * 86_400,
        };
        assert_eq!(role_minimum(1000.0, &[vacation], june), 0.0);
    }

    #[test]
    fn weekend_only_vacation_counts_nothing() {
        // 2017-06-03/04 is a weekend.
        let anchor = unix(NaiveDate::from_ymd_opt(2017, 6, 1).unwrap());
        let vacation = VacationRecord {
            date_from: unix(NaiveDate::from_ymd_opt(2017, 6, 3).unwrap()),
            date_to: unix(NaiveDate::from_ymd_opt(2017, 6, 4).unwrap()),
        };
        assert_eq!(vacation_overlap_work_days(&[vacation], anchor), 0);
    }

    #[test]
    fn cross_month_vacation_counts_only_this_month() {
        let anchor = unix(NaiveDate::from_ymd_opt(2017, 6, 1).unwrap());
        let vacation = VacationRecord {
            // Last week of May through the first work week of June.
            date_from: unix(NaiveDate::from_ymd_opt(2017, 5, 25).unwrap()),
            date_to: unix(NaiveDate::from_ymd_opt(2017, 6, 2).unwrap()),
        };
        assert_eq!(vacation_overlap_work_days(&[vacation], anchor), 2);
    }
}
