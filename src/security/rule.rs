//! Rate limit rules and their text notation.
//!
//! Accepted forms (case-insensitive, unit singular or plural):
//! - `5/minute`, `100/hour`
//! - `5 per minute`
//! - `10/5 minutes` (10 requests per 5-minute window)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum admitted requests per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RateLimitRule {
    max_requests: u32,
    multiplier: u32,
    unit: WindowUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WindowUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl WindowUnit {
    fn secs(self) -> u64 {
        match self {
            WindowUnit::Second => 1,
            WindowUnit::Minute => 60,
            WindowUnit::Hour => 3_600,
            WindowUnit::Day => 86_400,
        }
    }

    fn name(self) -> &'static str {
        match self {
            WindowUnit::Second => "second",
            WindowUnit::Minute => "minute",
            WindowUnit::Hour => "hour",
            WindowUnit::Day => "day",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        let s = s.strip_suffix('s').unwrap_or(&s);
        match s {
            "second" => Some(WindowUnit::Second),
            "minute" => Some(WindowUnit::Minute),
            "hour" => Some(WindowUnit::Hour),
            "day" => Some(WindowUnit::Day),
            _ => None,
        }
    }
}

/// Error returned when a rule string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleParseError {
    #[error("expected `<count>/<unit>` or `<count> per <unit>`, got `{0}`")]
    Syntax(String),
    #[error("invalid request count `{0}`")]
    Count(String),
    #[error("request count must be at least 1")]
    ZeroCount,
    #[error("unknown window unit `{0}`")]
    Unit(String),
    #[error("window multiplier must be at least 1")]
    ZeroWindow,
}

impl RateLimitRule {
    pub fn per_second(max_requests: u32) -> Self {
        Self::new(max_requests, WindowUnit::Second)
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, WindowUnit::Minute)
    }

    pub fn per_hour(max_requests: u32) -> Self {
        Self::new(max_requests, WindowUnit::Hour)
    }

    fn new(max_requests: u32, unit: WindowUnit) -> Self {
        Self {
            max_requests: max_requests.max(1),
            multiplier: 1,
            unit,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Length of one counting window.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.unit.secs() * u64::from(self.multiplier))
    }
}

impl FromStr for RateLimitRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (count, window) = trimmed
            .split_once('/')
            .or_else(|| trimmed.split_once(" per "))
            .ok_or_else(|| RuleParseError::Syntax(trimmed.to_string()))?;

        let count = count.trim();
        let max_requests: u32 = count
            .parse()
            .map_err(|_| RuleParseError::Count(count.to_string()))?;
        if max_requests == 0 {
            return Err(RuleParseError::ZeroCount);
        }

        let mut parts = window.split_whitespace();
        let (multiplier, unit) = match (parts.next(), parts.next(), parts.next()) {
            (Some(unit), None, None) => (1, unit),
            (Some(n), Some(unit), None) => {
                let n: u32 = n
                    .parse()
                    .map_err(|_| RuleParseError::Syntax(trimmed.to_string()))?;
                (n, unit)
            }
            _ => return Err(RuleParseError::Syntax(trimmed.to_string())),
        };
        if multiplier == 0 {
            return Err(RuleParseError::ZeroWindow);
        }
        let unit = WindowUnit::parse(unit).ok_or_else(|| RuleParseError::Unit(unit.to_string()))?;

        Ok(Self {
            max_requests,
            multiplier,
            unit,
        })
    }
}

impl TryFrom<String> for RateLimitRule {
    type Error = RuleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RateLimitRule> for String {
    fn from(rule: RateLimitRule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for RateLimitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiplier == 1 {
            write!(f, "{} per 1 {}", self.max_requests, self.unit.name())
        } else {
            write!(f, "{} per {} {}s", self.max_requests, self.multiplier, self.unit.name())
        }
    }
}
