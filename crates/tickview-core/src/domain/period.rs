use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Number of closes averaged by the moving average. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SmaPeriod(usize);

impl SmaPeriod {
    pub const DEFAULT: Self = Self(20);

    pub fn new(value: usize) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::ZeroSmaPeriod);
        }
        Ok(Self(value))
    }

    /// Like [`Self::new`], additionally requiring `value` to fall inside `range`.
    pub fn bounded(value: usize, range: RangeInclusive<usize>) -> Result<Self, ValidationError> {
        let period = Self::new(value)?;
        if !range.contains(&value) {
            return Err(ValidationError::SmaPeriodOutOfRange {
                value,
                min: *range.start(),
                max: *range.end(),
            });
        }
        Ok(period)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for SmaPeriod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for SmaPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for SmaPeriod {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SmaPeriod> for usize {
    fn from(value: SmaPeriod) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_period() {
        assert_eq!(SmaPeriod::new(0), Err(ValidationError::ZeroSmaPeriod));
        assert_eq!(SmaPeriod::new(1).expect("valid").get(), 1);
    }

    #[test]
    fn bounded_period_reports_the_allowed_range() {
        assert_eq!(SmaPeriod::bounded(50, 5..=100).expect("valid").get(), 50);
        assert_eq!(
            SmaPeriod::bounded(4, 5..=100),
            Err(ValidationError::SmaPeriodOutOfRange {
                value: 4,
                min: 5,
                max: 100
            })
        );
        assert_eq!(SmaPeriod::bounded(0, 5..=100), Err(ValidationError::ZeroSmaPeriod));
    }
}
