// Copyright (c) 2018-2022  Ministerio de Fomento
//                          Instituto de Ciencias de la Construcción Eduardo Torroja (IETcc-CSIC)

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

/*!
Periodo de simulación
=====================

Contiguous simulated date range inside a single calendar year.
*/

use std::fmt;
use std::str;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::BillError;

/// Calendar year used when none is given
pub const DEFAULT_CALENDAR_YEAR: i32 = 2007;

/// Month abbreviations, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of days of month `month` (1-12) in `year`
///
/// Returns 0 for months outside 1-12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// Periodo de simulación
///
/// Simulation period, from `begin_month/begin_day` to `end_month/end_day` (both
/// included) of `calendar_year`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationPeriod {
    /// First simulated month (1-12)
    pub begin_month: u32,
    /// First simulated day of `begin_month`
    pub begin_day: u32,
    /// Last simulated month (1-12)
    pub end_month: u32,
    /// Last simulated day of `end_month`
    pub end_day: u32,
    /// Calendar year
    pub calendar_year: i32,
}

impl SimulationPeriod {
    /// Checked constructor
    ///
    /// # Errors
    ///
    /// * Dates that don't exist in the calendar year
    /// * End date before begin date (wrap-around periods are not supported)
    pub fn new(
        calendar_year: i32,
        (begin_month, begin_day): (u32, u32),
        (end_month, end_day): (u32, u32),
    ) -> Result<Self, BillError> {
        let begin = NaiveDate::from_ymd_opt(calendar_year, begin_month, begin_day);
        let end = NaiveDate::from_ymd_opt(calendar_year, end_month, end_day);
        match (begin, end) {
            (Some(begin), Some(end)) if begin <= end => Ok(Self {
                begin_month,
                begin_day,
                end_month,
                end_day,
                calendar_year,
            }),
            (Some(_), Some(_)) => Err(BillError::Period(format!(
                "end date {}/{} before begin date {}/{}",
                end_month, end_day, begin_month, begin_day
            ))),
            _ => Err(BillError::Period(format!(
                "{}/{}-{}/{} is not a valid date range for year {}",
                begin_month, begin_day, end_month, end_day, calendar_year
            ))),
        }
    }

    /// Whole calendar year
    pub fn full_year(calendar_year: i32) -> Self {
        Self {
            begin_month: 1,
            begin_day: 1,
            end_month: 12,
            end_day: 31,
            calendar_year,
        }
    }

    /// Same dates on a different calendar year
    ///
    /// # Errors
    ///
    /// * February 29th used in a non leap year
    pub fn with_year(&self, calendar_year: i32) -> Result<Self, BillError> {
        Self::new(
            calendar_year,
            (self.begin_month, self.begin_day),
            (self.end_month, self.end_day),
        )
    }

    /// Does the period cover the whole calendar year?
    pub fn is_full_year(&self) -> bool {
        self.begin_month == 1 && self.begin_day == 1 && self.end_month == 12 && self.end_day == 31
    }

    /// Days of month `month` in the calendar year of the period
    pub fn days_in_month(&self, month: u32) -> u32 {
        days_in_month(self.calendar_year, month)
    }

    /// Is `month` (partially) simulated?
    pub fn contains_month(&self, month: u32) -> bool {
        month >= self.begin_month && month <= self.end_month
    }

    /// Last simulated month
    pub fn last_month(&self) -> u32 {
        self.end_month
    }
}

impl Default for SimulationPeriod {
    fn default() -> Self {
        Self::full_year(DEFAULT_CALENDAR_YEAR)
    }
}

impl fmt::Display for SimulationPeriod {
    /// Period dates as `M/D-M/D`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}-{}/{}",
            self.begin_month, self.begin_day, self.end_month, self.end_day
        )
    }
}

impl str::FromStr for SimulationPeriod {
    type Err = BillError;

    /// Parse `M/D-M/D` dates in the default calendar year
    fn from_str(s: &str) -> Result<SimulationPeriod, Self::Err> {
        SimulationPeriod::parse_in_year(s, DEFAULT_CALENDAR_YEAR)
    }
}

impl SimulationPeriod {
    /// Parse `M/D-M/D` dates in calendar year `calendar_year`
    pub fn parse_in_year(s: &str, calendar_year: i32) -> Result<Self, BillError> {
        let parse_err = || BillError::Parse {
            from: s.into(),
            into: "SimulationPeriod".into(),
            desc: "expected M/D-M/D",
        };
        let parse_date = |d: &str| -> Result<(u32, u32), BillError> {
            let items: Vec<&str> = d.split('/').map(str::trim).collect();
            if items.len() != 2 {
                return Err(parse_err());
            }
            let month = items[0].parse::<u32>().map_err(|_| parse_err())?;
            let day = items[1].parse::<u32>().map_err(|_| parse_err())?;
            Ok((month, day))
        };
        let items: Vec<&str> = s.trim().split('-').collect();
        if items.len() != 2 {
            return Err(parse_err());
        }
        SimulationPeriod::new(calendar_year, parse_date(items[0])?, parse_date(items[1])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2002, 1), 31);
        assert_eq!(days_in_month(2002, 2), 28);
        assert_eq!(days_in_month(2004, 2), 29);
        assert_eq!(days_in_month(2002, 4), 30);
        assert_eq!(days_in_month(2002, 12), 31);
        assert_eq!(days_in_month(2002, 13), 0);
    }

    #[test]
    fn test_period_checks() {
        assert!(SimulationPeriod::new(2002, (2, 29), (3, 1)).is_err());
        assert!(SimulationPeriod::new(2004, (2, 29), (3, 1)).is_ok());
        assert!(SimulationPeriod::new(2002, (4, 10), (2, 10)).is_err());
        assert!(SimulationPeriod::new(2002, (3, 20), (3, 5)).is_err());
        assert!(SimulationPeriod::full_year(2002).is_full_year());
        assert!(!SimulationPeriod::new(2002, (1, 1), (12, 30))
            .unwrap()
            .is_full_year());
    }

    #[test]
    fn test_period_parse() {
        let period = "2/10-4/10".parse::<SimulationPeriod>().unwrap();
        assert_eq!(period.to_string(), "2/10-4/10");
        assert_eq!(period.calendar_year, DEFAULT_CALENDAR_YEAR);
        let period = period.with_year(2002).unwrap();
        assert_eq!(period.calendar_year, 2002);
        assert!("2/10".parse::<SimulationPeriod>().is_err());
        assert!("2/x-4/10".parse::<SimulationPeriod>().is_err());
        assert!("2/29-3/1".parse::<SimulationPeriod>().is_err());
        assert!(SimulationPeriod::parse_in_year("2/29-3/1", 2004).is_ok());
    }
}
