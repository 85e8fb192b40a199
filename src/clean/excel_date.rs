//! Spreadsheet serial-date decoding
//!
//! The 1900 system counts days from 1900-01-01 = 1 and, for compatibility
//! with Lotus 1-2-3, pretends 1900 was a leap year: serial 60 is the
//! non-existent 1900-02-29 and every later serial is anchored at 1899-12-30.
//! Serials 1..=59 (January and February 1900) are shifted by one so they
//! land on the calendar date a spreadsheet shows, and serial 60 resolves to
//! 1900-02-28 because the phantom day has no calendar representation.
//!
//! The 1904 system has no phantom day: serial 0 is 1904-01-01.
//!
//! Fractional serials carry a time of day. [`decode`] truncates to the
//! date; [`decode_datetime`] keeps the time, rounded to the millisecond.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::config::DateSystem;
use crate::error::{Result, TableError};
use crate::model::{Cell, Column, Table};

/// First serial after the phantom 1900-02-29
const FIRST_REAL_MARCH_SERIAL: i64 = 61;
/// The phantom 1900-02-29
const LEAP_BUG_SERIAL: i64 = 60;
/// 9999-12-31, the last date a spreadsheet can hold
const MAX_SERIAL: f64 = 2_958_465.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TableError::InvalidDate(format!("{}-{}-{}", year, month, day)))
}

fn check_serial(serial: f64) -> Result<()> {
    if !serial.is_finite() {
        return Err(TableError::InvalidDate(format!("serial {} is not finite", serial)));
    }
    if serial < 0.0 {
        return Err(TableError::InvalidDate(format!("serial {} is negative", serial)));
    }
    if serial >= MAX_SERIAL + 1.0 {
        return Err(TableError::InvalidDate(format!("serial {} is out of range", serial)));
    }
    Ok(())
}

/// Decode the integral part of a serial to a calendar date
pub fn decode(serial: f64, system: DateSystem) -> Result<NaiveDate> {
    check_serial(serial)?;
    let days = serial.floor() as i64;

    let epoch = match system {
        DateSystem::Excel1900 if days > LEAP_BUG_SERIAL => ymd(1899, 12, 30)?,
        DateSystem::Excel1900 if days == LEAP_BUG_SERIAL => {
            tracing::trace!("serial 60 is the phantom 1900-02-29; using 1900-02-28");
            return ymd(1900, 2, 28);
        }
        DateSystem::Excel1900 => ymd(1899, 12, 31)?,
        DateSystem::Excel1904 => ymd(1904, 1, 1)?,
    };

    epoch
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| TableError::InvalidDate(format!("serial {} is out of range", serial)))
}

/// Decode a serial to a date and time of day
pub fn decode_datetime(serial: f64, system: DateSystem) -> Result<NaiveDateTime> {
    let date = decode(serial, system)?;
    let millis = ((serial - serial.floor()) * MILLIS_PER_DAY).round() as i64;

    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.checked_add_signed(Duration::milliseconds(millis)))
        .ok_or_else(|| TableError::InvalidDate(format!("serial {} is out of range", serial)))
}

/// Inverse of [`decode`] for whole days
pub fn encode(date: NaiveDate, system: DateSystem) -> Result<i64> {
    let serial = match system {
        DateSystem::Excel1900 => {
            let after_bug = date - ymd(1899, 12, 30)?;
            if after_bug.num_days() >= FIRST_REAL_MARCH_SERIAL {
                after_bug.num_days()
            } else {
                (date - ymd(1899, 12, 31)?).num_days()
            }
        }
        DateSystem::Excel1904 => (date - ymd(1904, 1, 1)?).num_days(),
    };

    if serial < 0 {
        return Err(TableError::InvalidDate(format!(
            "{} precedes the {:?} epoch",
            date, system
        )));
    }
    Ok(serial)
}

/// Replace a numeric serial column with decoded dates.
///
/// Null stays Null and existing dates pass through; any other cell is a
/// `TypeMismatch`.
pub fn convert_excel_dates(table: &Table, column: &str, system: DateSystem) -> Result<Table> {
    let idx = table.require_column(column)?;
    let source = &table.columns()[idx];

    let cells = source
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Number(serial) => decode(*serial, system).map(Cell::Date),
            Cell::Null | Cell::Date(_) => Ok(cell.clone()),
            other => Err(TableError::TypeMismatch {
                expected: "number",
                found: other.type_name().to_string(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(column, ?system, rows = cells.len(), "decoded date serials");

    table.with_column(Column::new(source.name.clone(), cells))
}
