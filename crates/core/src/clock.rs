//! Calendar helpers.

use chrono::{Local, NaiveDate};

/// Current local calendar date, used wherever a date was omitted.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
