//! Time-spent parsing and formatting.
//!
//! Jira reports logged work as a short free-form string such as `"2d 3h 15m"`.
//! This module converts those strings into whole minutes for aggregation and
//! turns aggregated minutes back into the compact `"<H>h<M>m"` form used in
//! report cells.
//!
//! ## Units
//!
//! | Unit | Minutes                          |
//! |------|----------------------------------|
//! | `d`  | 480 (one work day of eight hours) |
//! | `h`  | 60                               |
//! | `m`  | 1                                |
//!
//! The day unit is a work day, not a calendar day. Output never uses `d`:
//! an aggregated cell of 480 minutes is rendered as `"8h"`.
//!
//! ## Examples
//!
//! ```rust
//! use timesheet::libs::duration::{format_minutes, parse_minutes};
//!
//! assert_eq!(parse_minutes("2d 3h 15m").unwrap(), 1155);
//! assert_eq!(format_minutes(125), "2h5m");
//! assert_eq!(format_minutes(0), "");
//! ```

use crate::libs::error::{Result, TimesheetError};

/// Hours in one work day, the meaning of the `d` unit.
pub const HOURS_PER_WORK_DAY: u32 = 8;
pub const MINUTES_PER_HOUR: u32 = 60;

/// Maximum number of space-separated fragments (day, hour, minute).
const MAX_FRAGMENTS: usize = 3;

/// Parses a time-spent string into minutes.
///
/// The input is split on single spaces into at most three fragments, each of
/// the form `<digits><unit>`. Fragment order is not enforced, so `"15m 1h"`
/// parses to 75.
///
/// # Errors
///
/// Returns [`TimesheetError::MalformedDuration`] when a fragment is shorter
/// than two characters, its prefix is not an unsigned integer, or its unit is
/// not one of `d`, `h`, `m`. The empty string is malformed, and so is a total
/// that does not fit in `u32` minutes.
pub fn parse_minutes(time_spent: &str) -> Result<u32> {
    time_spent.splitn(MAX_FRAGMENTS, ' ').try_fold(0u32, |total, fragment| {
        let minutes = parse_fragment(time_spent, fragment)?;
        total
            .checked_add(minutes)
            .ok_or_else(|| TimesheetError::malformed_duration(time_spent, fragment))
    })
}

fn parse_fragment(time_spent: &str, fragment: &str) -> Result<u32> {
    let malformed = || TimesheetError::malformed_duration(time_spent, fragment);

    if fragment.chars().count() < 2 {
        return Err(malformed());
    }
    // The unit is the final char, which may be multi-byte in bad input.
    let (idx, unit) = fragment.char_indices().last().ok_or_else(malformed)?;
    let digits = &fragment[..idx];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let amount: u32 = digits.parse().map_err(|_| malformed())?;

    let factor = match unit {
        'd' => HOURS_PER_WORK_DAY * MINUTES_PER_HOUR,
        'h' => MINUTES_PER_HOUR,
        'm' => 1,
        _ => return Err(malformed()),
    };
    amount.checked_mul(factor).ok_or_else(malformed)
}

/// Formats minutes as `"<H>h<M>m"`, omitting zero terms.
///
/// ```rust
/// use timesheet::libs::duration::format_minutes;
///
/// assert_eq!(format_minutes(90), "1h30m");
/// assert_eq!(format_minutes(60), "1h");
/// assert_eq!(format_minutes(45), "45m");
/// assert_eq!(format_minutes(0), "");
/// ```
pub fn format_minutes(minutes: u64) -> String {
    let mut formatted = String::new();
    let hours = minutes / u64::from(MINUTES_PER_HOUR);
    if hours > 0 {
        formatted.push_str(&format!("{}h", hours));
    }
    let rem = minutes % u64::from(MINUTES_PER_HOUR);
    if rem > 0 {
        formatted.push_str(&format!("{}m", rem));
    }
    formatted
}
