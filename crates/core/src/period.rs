//! Recurrence frequencies and period-key computation.
//!
//! A period key is a string bucket identifying which recurrence cycle an
//! evaluation belongs to: `YYYY-MM` for monthly schedules, `YYYY-MM-DD` for
//! daily ones. The schedule's advisory `due_time` never shifts which period
//! is current.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How often a schedule spawns evaluation instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Monthly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(format!("Unknown frequency: {other}")),
        }
    }
}

/// Compute the period key for a date under the given frequency.
pub fn period_key(date: NaiveDate, frequency: Frequency) -> String {
    match frequency {
        Frequency::Monthly => date.format("%Y-%m").to_string(),
        Frequency::Daily => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_key_is_year_month() {
        assert_eq!(period_key(date(2024, 3, 5), Frequency::Monthly), "2024-03");
        assert_eq!(period_key(date(2024, 3, 31), Frequency::Monthly), "2024-03");
        assert_eq!(period_key(date(2024, 4, 1), Frequency::Monthly), "2024-04");
    }

    #[test]
    fn daily_key_is_full_date() {
        assert_eq!(
            period_key(date(2024, 3, 5), Frequency::Daily),
            "2024-03-05"
        );
        assert_eq!(
            period_key(date(2024, 12, 1), Frequency::Daily),
            "2024-12-01"
        );
    }

    #[test]
    fn frequency_parses_case_insensitively() {
        assert_eq!("daily".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!(" Monthly ".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekly".parse::<Frequency>().is_err());
    }

    #[test]
    fn as_str_roundtrips() {
        for f in [Frequency::Daily, Frequency::Monthly] {
            assert_eq!(f.as_str().parse::<Frequency>().unwrap(), f);
        }
    }
}
