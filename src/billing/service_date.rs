//! Service-date parsing and the past-date rule.
//!
//! Accepted inputs: `YYYY-MM-DD`, `MM/DD/YYYY`, `MM/DD/YY` (read as 20YY)
//! and `MM/DD` (current year). A date is legal when it is today or later;
//! administrators may back-date freely.

use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

use super::BillingError;
use crate::config::ADMIN_AUTH_LEVEL;
use crate::db;

fn bad(part: &str) -> BillingError {
    BillingError::Validation(format!("Bad date: {part} is incorrect"))
}

fn parse_part(raw: &str, part: &str) -> Result<u32, BillingError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad(part));
    }
    raw.parse::<u32>().map_err(|_| bad(part))
}

fn parse_year(raw: &str) -> Result<i32, BillingError> {
    let raw = raw.trim();
    let digits = match raw.len() {
        2 => format!("20{raw}"),
        4 => raw.to_string(),
        _ => return Err(bad("year")),
    };
    parse_part(&digits, "year").map(|y| y as i32)
}

/// Parse a service date in any accepted input format.
pub fn parse_service_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, BillingError> {
    let raw = raw.trim();
    let (year, month, day) = if raw.contains('-') {
        let parts: Vec<&str> = raw.split('-').collect();
        if parts.len() != 3 {
            return Err(bad("year"));
        }
        (parse_year(parts[0])?, parse_part(parts[1], "month")?, parse_part(parts[2], "day")?)
    } else {
        let parts: Vec<&str> = raw.split('/').collect();
        let year = match parts.len() {
            2 => today.year(),
            3 => parse_year(parts[2])?,
            _ => return Err(bad("year")),
        };
        (year, parse_part(parts[0], "month")?, parse_part(parts[1], "day")?)
    };

    if !(1..=12).contains(&month) {
        return Err(bad("month"));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| bad("day"))
}

/// Apply the past-date rule to an already parsed date.
pub fn check_service_date(
    auth_level: i64,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), BillingError> {
    if auth_level == ADMIN_AUTH_LEVEL || date >= today {
        return Ok(());
    }
    Err(BillingError::Validation(
        "Bad date: Service Date cannot be in the past".into(),
    ))
}

/// Parse `raw` and check it against the acting specialist's authorization.
pub fn validate_service_date(
    conn: &Connection,
    acting_specialist: i64,
    raw: &str,
    today: NaiveDate,
) -> Result<NaiveDate, BillingError> {
    let auth_level = db::lookup_auth_level(conn, acting_specialist)?.ok_or_else(|| {
        BillingError::NotFound(format!("Specialist {acting_specialist} not found"))
    })?;
    let date = parse_service_date(raw, today)?;
    check_service_date(auth_level, date, today)?;
    Ok(date)
}
