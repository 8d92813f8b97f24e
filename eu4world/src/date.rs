use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug)]
#[error("invalid date: {0:?}")]
pub struct InvalidDate(String);

/// A specific date in history, `year.month.day` in save files.
///
/// Ordering is chronological. The default is `1.1.1`, which predates any
/// date a save can contain, so it works as a "never" floor for
/// newest-possession comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl FromStr for Date {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let year = parts.next().and_then(|p| p.parse().ok());
        let month = parts.next().and_then(|p| p.parse().ok());
        let day = parts.next().and_then(|p| p.parse().ok());
        match (year, month, day, parts.next()) {
            (Some(y), Some(m), Some(d), None) => Ok(Date::new(y, m, d)),
            _ => Err(InvalidDate(s.to_string())),
        }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.month, self.day)
    }
}

/// Returns `true` if the key has the `Y.M.D` shape of a history entry.
pub fn is_date_key(key: &str) -> bool {
    Date::from_str(key).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_order() {
        let a: Date = "1444.11.11".parse().unwrap();
        let b: Date = "1445.1.1".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "1444.11.11");
    }

    #[test]
    fn default_is_floor() {
        let any: Date = "1066.9.15".parse().unwrap();
        assert!(Date::default() < any);
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Date>().is_err());
        assert!("1444.11".parse::<Date>().is_err());
        assert!("1444.11.11.5".parse::<Date>().is_err());
        assert!("SWE".parse::<Date>().is_err());
    }
}
