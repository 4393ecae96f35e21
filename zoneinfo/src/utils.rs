//! Proleptic Gregorian date equations over `i64` epoch days.
//!
//! The year range covered is the full `-999_999_999..=999_999_999`
//! range that zone rule windows may reference, so all intermediate
//! values are kept in `i64`.

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// The smallest year a rule or window may reference.
pub const MIN_YEAR: i32 = -999_999_999;
/// The largest year a rule or window may reference.
pub const MAX_YEAR: i32 = 999_999_999;

/// Returns whether `year` is a leap year.
pub const fn in_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Returns the number of days in `month` (1 based).
pub const fn days_in_month(month: u8, leap: bool) -> u8 {
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Returns the zero based day of year at which `month` starts.
pub const fn month_to_day(month: u8, leap: bool) -> u16 {
    let leap_day = if leap && month > 2 { 1 } else { 0 };
    let start = match month {
        1 => 0,
        2 => 31,
        3 => 59,
        4 => 90,
        5 => 120,
        6 => 151,
        7 => 181,
        8 => 212,
        9 => 243,
        10 => 273,
        11 => 304,
        _ => 334,
    };
    start + leap_day
}

/// Returns the epoch days for the provided ISO date.
///
/// The day is not validated against the month length, which lets
/// callers use out of range days as a cheap "plus days".
pub const fn epoch_days_from_date(year: i64, month: u8, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Returns the `(year, month, day)` for the provided epoch days.
pub const fn date_from_epoch_days(epoch_days: i64) -> (i64, u8, u8) {
    let z = epoch_days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// Returns the epoch days of January 1st of `year`.
pub const fn epoch_days_for_year(year: i64) -> i64 {
    epoch_days_from_date(year, 1, 1)
}

/// Returns the ISO week day (1 = Monday, 7 = Sunday) for the epoch days.
pub const fn epoch_days_to_week_day(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday.
    ((epoch_days + 3).rem_euclid(7) + 1) as u8
}

/// Returns epoch seconds for the start of an epoch day.
pub const fn epoch_seconds_for_epoch_days(epoch_days: i64) -> i64 {
    epoch_days * SECONDS_PER_DAY
}
