//! Business timezone helpers
//!
//! Day boundaries are computed in the business timezone and handed to the
//! repositories as UTC instants, `[start, end)`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Today's calendar date in the business timezone
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Calendar date of `instant` in the business timezone
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Local midnight → UTC. DST gap falls back to interpreting the time as UTC.
fn local_midnight_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive: NaiveDateTime = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// UTC bounds of `date` in the business timezone: `[start, next midnight)`
pub fn day_bounds_utc(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next_day = date.succ_opt().unwrap_or(date);
    (local_midnight_utc(date, tz), local_midnight_utc(next_day, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_bounds_mexico_city() {
        // Mexico City has no DST since 2022: UTC-6 all year
        let tz = chrono_tz::America::Mexico_City;
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = day_bounds_utc(date, tz);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 16, 6, 0, 0).unwrap());
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let tz = chrono_tz::America::Mexico_City;
        let late = Utc.with_ymd_and_hms(2024, 3, 16, 3, 0, 0).unwrap();
        assert_eq!(local_date(late, tz), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }
}
