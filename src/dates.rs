// src/dates.rs
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;
use tracing::info;

/// Input format for the optional query-date argument.
pub const INPUT_FORMAT: &str = "%d/%m/%Y";

/// ANBIMA only keeps result pages for this many business days back.
pub const LOOKBACK_BUSINESS_DAYS: u32 = 5;

/// Lowercase Portuguese month abbreviations used in ANBIMA URLs.
static MONTHS_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Why a requested query date was rejected. Each rejection reason is a
/// distinct variant so callers (and tests) can tell them apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date `{0}`; use the dd/mm/aaaa format")]
    Format(String),
    #[error("date must be earlier than {}", .0.format(INPUT_FORMAT))]
    NotInPast(NaiveDate),
    #[error("{} was a Saturday; pick a business day", .0.format(INPUT_FORMAT))]
    Saturday(NaiveDate),
    #[error("{} was a Sunday; pick a business day", .0.format(INPUT_FORMAT))]
    Sunday(NaiveDate),
    #[error(
        "ANBIMA history only covers the last {LOOKBACK_BUSINESS_DAYS} business days; \
         pick a date on or after {}",
        .0.format(INPUT_FORMAT)
    )]
    OutsideWindow(NaiveDate),
}

/// Formats a date in the ANBIMA URL style: `31out2025`.
pub fn format_anbima(date: NaiveDate) -> String {
    format!(
        "{:02}{}{}",
        date.day(),
        MONTHS_PT[date.month0() as usize],
        date.year()
    )
}

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts business days from `start` (inclusive) to `end` (exclusive),
/// walking day by day. Weekends are skipped; no holiday calendar.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut days = 0;
    let mut current = start;
    while current < end {
        if is_business_day(current) {
            days += 1;
        }
        current += Duration::days(1);
    }
    days
}

/// The business day before `today`, together with the calendar-day offset
/// used (3 from a Monday, 2 from a Sunday, otherwise 1).
pub fn previous_business_day(today: NaiveDate) -> (NaiveDate, i64) {
    let offset = match today.weekday() {
        Weekday::Mon => 3,
        Weekday::Sun => 2,
        _ => 1,
    };
    (today - Duration::days(offset), offset)
}

/// Earliest date still inside the lookback window: walk backwards from
/// `today` until the window's worth of business days has been counted.
pub fn earliest_allowed(today: NaiveDate) -> NaiveDate {
    let mut counted = 0;
    let mut current = today;
    while counted < LOOKBACK_BUSINESS_DAYS {
        current -= Duration::days(1);
        if is_business_day(current) {
            counted += 1;
        }
    }
    current
}

/// Resolves the query date. With no input, the previous business day is
/// used and the `D-n` offset logged. An explicit input must parse as
/// `dd/mm/yyyy`, be strictly before `today`, fall on a weekday, and lie
/// within the lookback window.
pub fn resolve(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let Some(raw) = input else {
        let (date, offset) = previous_business_day(today);
        info!(
            offset = %format!("D-{offset}"),
            date = %date.format(INPUT_FORMAT),
            "no date given; using last business day"
        );
        return Ok(date);
    };

    let date = NaiveDate::parse_from_str(raw, INPUT_FORMAT)
        .map_err(|_| DateError::Format(raw.to_string()))?;

    if date >= today {
        return Err(DateError::NotInPast(today));
    }
    match date.weekday() {
        Weekday::Sat => return Err(DateError::Saturday(date)),
        Weekday::Sun => return Err(DateError::Sunday(date)),
        _ => {}
    }
    if business_days_between(date, today) > LOOKBACK_BUSINESS_DAYS {
        return Err(DateError::OutsideWindow(earliest_allowed(today)));
    }

    Ok(date)
}
