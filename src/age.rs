//! Age shown in the about section.

use chrono::{Datelike, Local, NaiveDate};

/// Whole years from `birth` to `today`: the year difference, minus one if
/// this year's birthday has not been reached yet. Never negative.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birthday_not_yet_reached() {
        assert_eq!(age_on(date(2004, 7, 5), date(2024, 7, 4)), 19);
    }

    #[test]
    fn birthday_today() {
        assert_eq!(age_on(date(2004, 7, 5), date(2024, 7, 5)), 20);
    }

    #[test]
    fn birthday_passed_earlier_month() {
        assert_eq!(age_on(date(2004, 7, 5), date(2024, 12, 1)), 20);
    }

    #[test]
    fn leap_day_birthday() {
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }

    #[test]
    fn future_birth_date_is_zero() {
        assert_eq!(age_on(date(2030, 1, 1), date(2024, 1, 1)), 0);
    }
}
