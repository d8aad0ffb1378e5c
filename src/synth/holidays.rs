//! Public holiday lookup against the fixed-date national calendar

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed-date national holidays (Ghana), keyed by `MM-DD`
pub const NATIONAL_HOLIDAYS: [(&str, &str); 9] = [
    ("01-01", "New Year's Day"),
    ("01-07", "Constitution Day"),
    ("03-06", "Independence Day"),
    ("05-01", "May Day"),
    ("07-01", "Republic Day"),
    ("08-04", "Founders' Day"),
    ("09-21", "Kwame Nkrumah Memorial Day"),
    ("12-25", "Christmas Day"),
    ("12-26", "Boxing Day"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayStatus {
    pub is_holiday: bool,
    #[serde(default)]
    pub holiday_name: Option<String>,
    pub date: NaiveDate,
}

impl HolidayStatus {
    pub fn new(date: NaiveDate, holiday_name: Option<String>) -> Self {
        Self {
            is_holiday: holiday_name.is_some(),
            holiday_name,
            date,
        }
    }
}

/// Name of the fixed holiday falling on `date`, if any
pub fn fixed_holiday(date: NaiveDate) -> Option<&'static str> {
    let key = date.format("%m-%d").to_string();
    NATIONAL_HOLIDAYS
        .iter()
        .find(|(day, _)| *day == key)
        .map(|(_, name)| *name)
}

pub fn holiday_status(date: NaiveDate) -> HolidayStatus {
    HolidayStatus::new(date, fixed_holiday(date).map(str::to_string))
}
