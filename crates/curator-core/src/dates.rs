use jiff::civil::Date;
use jiff::fmt::strtime;

use crate::error::DeriveError;

/// Parse a form date. Accepts `YYYY-MM-DD` and `MM/DD/YYYY` only — the two
/// formats that appear in submitted form data.
pub fn parse_form_date(raw: &str) -> Result<Date, DeriveError> {
    let trimmed = raw.trim();
    if let Ok(date) = trimmed.parse::<Date>() {
        return Ok(date);
    }

    strtime::parse("%m/%d/%Y", trimmed)
        .and_then(|parsed| parsed.to_date())
        .map_err(|_| DeriveError::DateParse {
            value: raw.to_string(),
        })
}

/// Full years elapsed between `dob` and `on`. A birthday not yet reached in
/// the year of `on` subtracts one.
pub fn age_in_years(dob: Date, on: Date) -> i64 {
    let mut years = i64::from(on.year()) - i64::from(dob.year());
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years
}
