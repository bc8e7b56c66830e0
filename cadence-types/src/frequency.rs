//! Calendar step descriptors and their token grammar.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CadenceError;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const WEEK: i64 = 7 * DAY;

/// Step descriptor used to lay a series onto a regular grid.
///
/// Tokens (see [`FromStr`]):
/// - `D` / `day`, `B` / `business-day`, `W` / `week`, `M` / `MS` / `month`,
///   `H` / `h` / `hour`
/// - an explicit duration `<n><unit>` with unit in `s`, `min` / `T`, `h` / `H`,
///   `D`, `W`. A multiple of one collapses to the canonical unit (`1D` is
///   [`Frequency::Day`]); larger multiples become [`Frequency::Every`].
///
/// `Day` and `BusinessDay` are distinct even though both step "daily":
/// the latter never lands on Saturday or Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// One calendar day.
    Day,
    /// One business day (Monday through Friday).
    BusinessDay,
    /// Seven calendar days.
    Week,
    /// One calendar month, anchored on the first grid instant's day of month.
    /// A month-end anchor keeps to month ends.
    Month,
    /// One hour.
    Hour,
    /// An arbitrary fixed duration in seconds.
    Every {
        /// Step length in seconds; must be positive to produce a grid.
        seconds: i64,
    },
}

impl Frequency {
    /// Build an arbitrary-duration frequency.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` if `seconds` is not positive.
    pub fn every(seconds: i64) -> Result<Self, CadenceError> {
        if seconds <= 0 {
            return Err(CadenceError::invalid_frequency(
                format!("{seconds}s"),
                "step must be positive",
            ));
        }
        Ok(Self::Every { seconds })
    }

    /// Parse an optional token; an empty or blank token requests inference.
    ///
    /// # Errors
    /// Returns `InvalidFrequency` when a non-empty token does not parse.
    pub fn parse_optional(token: &str) -> Result<Option<Self>, CadenceError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        token.parse().map(Some)
    }

    /// Fixed step length in seconds, or `None` for calendar-relative steps
    /// (`Month`, `BusinessDay`).
    #[must_use]
    pub const fn fixed_seconds(&self) -> Option<i64> {
        match self {
            Self::Day => Some(DAY),
            Self::Week => Some(WEEK),
            Self::Hour => Some(HOUR),
            Self::Every { seconds } => Some(*seconds),
            Self::Month | Self::BusinessDay => None,
        }
    }

    /// Returns `true` if the step is shorter than one calendar day.
    #[must_use]
    pub const fn is_subdaily(&self) -> bool {
        match self.fixed_seconds() {
            Some(s) => s < DAY,
            None => false,
        }
    }

    /// Canonical frequency for a fixed step: known units collapse to their
    /// named variant, anything else stays an explicit duration.
    ///
    /// A one-day step maps to [`Frequency::Day`]; business-day detection is
    /// the inferencer's job.
    #[must_use]
    pub const fn from_step_seconds(seconds: i64) -> Self {
        match seconds {
            DAY => Self::Day,
            WEEK => Self::Week,
            HOUR => Self::Hour,
            s => Self::Every { seconds: s },
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => f.write_str("D"),
            Self::BusinessDay => f.write_str("B"),
            Self::Week => f.write_str("W"),
            Self::Month => f.write_str("M"),
            Self::Hour => f.write_str("H"),
            Self::Every { seconds } => {
                // Largest unit that divides the step; a bare multiple of one
                // would parse back as the named variant, so those fall through.
                let units: [(i64, &str); 5] =
                    [(WEEK, "W"), (DAY, "D"), (HOUR, "h"), (MINUTE, "min"), (1, "s")];
                for (len, sym) in units {
                    if *seconds % len == 0 && (*seconds / len > 1 || len <= MINUTE) {
                        return write!(f, "{}{sym}", *seconds / len);
                    }
                }
                write!(f, "{seconds}s")
            }
        }
    }
}

impl FromStr for Frequency {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(CadenceError::invalid_frequency(s, "empty token"));
        }

        match token.to_ascii_lowercase().as_str() {
            "day" | "daily" | "calendar-day" => return Ok(Self::Day),
            "business-day" | "businessday" | "bday" => return Ok(Self::BusinessDay),
            "week" | "weekly" => return Ok(Self::Week),
            "month" | "monthly" => return Ok(Self::Month),
            "hour" | "hourly" => return Ok(Self::Hour),
            _ => {}
        }

        let split = token
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(token.len());
        let (digits, unit) = token.split_at(split);
        let multiple: i64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| CadenceError::invalid_frequency(token, "step multiple out of range"))?
        };
        if multiple <= 0 {
            return Err(CadenceError::invalid_frequency(token, "step must be positive"));
        }

        let unit_seconds = match unit {
            "D" => DAY,
            "W" | "W-SUN" => WEEK,
            "H" | "h" => HOUR,
            "T" | "min" => MINUTE,
            "s" | "S" => 1,
            "B" if multiple == 1 => return Ok(Self::BusinessDay),
            "M" | "MS" if multiple == 1 => return Ok(Self::Month),
            "B" | "M" | "MS" => {
                return Err(CadenceError::invalid_frequency(
                    token,
                    "multiples of calendar-relative units are not supported",
                ));
            }
            "" => return Err(CadenceError::invalid_frequency(token, "missing unit")),
            _ => return Err(CadenceError::invalid_frequency(token, "unknown unit symbol")),
        };

        let seconds = multiple
            .checked_mul(unit_seconds)
            .ok_or_else(|| CadenceError::invalid_frequency(token, "step overflows"))?;
        if multiple == 1 && unit_seconds != MINUTE && unit_seconds != 1 {
            return Ok(Self::from_step_seconds(seconds));
        }
        Ok(Self::Every { seconds })
    }
}

impl TryFrom<String> for Frequency {
    type Error = CadenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}
