//! Address-matching problems

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hex characters following the `0x` prefix of an address
pub const ADDRESS_BODY_LEN: u32 = 40;

/// Adjacent character pairs in an address body
pub const MAX_SNAKE_PAIRS: u32 = ADDRESS_BODY_LEN - 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("{problem}: value {value} out of range ({min}..={max})")]
    OutOfRange {
        problem: ProblemId,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("{problem}: invalid specifier '{specifier}' ({reason})")]
    InvalidSpecifier {
        problem: ProblemId,
        specifier: String,
        reason: &'static str,
    },
    #[error("Unknown problem type: {0}")]
    UnknownProblem(String),
}

/// A declarative address-matching rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Problem {
    /// At least `length` identical characters at the start of the body
    LeadingAny { length: u32 },
    /// At least `length` identical characters at the end of the body
    TrailingAny { length: u32 },
    /// At least `count` letters (a-f)
    LettersHeavy { count: u32 },
    /// Body made of digits only
    NumbersHeavy,
    /// At least `count` adjacent equal pairs, ignoring case
    SnakeScoreNoCase { count: u32 },
    /// Literal prefix, `0x`-prefixed
    UserPrefix { specifier: String },
    /// Literal suffix
    UserSuffix { specifier: String },
    /// Full-length mask, lowercase `x` matches any character
    UserMask { specifier: String },
}

/// Discriminant of [`Problem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemId {
    LeadingAny,
    TrailingAny,
    LettersHeavy,
    NumbersHeavy,
    SnakeScoreNoCase,
    UserPrefix,
    UserSuffix,
    UserMask,
}

impl ProblemId {
    pub const ALL: [ProblemId; 8] = [
        ProblemId::UserPrefix,
        ProblemId::UserSuffix,
        ProblemId::UserMask,
        ProblemId::LeadingAny,
        ProblemId::TrailingAny,
        ProblemId::LettersHeavy,
        ProblemId::NumbersHeavy,
        ProblemId::SnakeScoreNoCase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemId::LeadingAny => "leading-any",
            ProblemId::TrailingAny => "trailing-any",
            ProblemId::LettersHeavy => "letters-heavy",
            ProblemId::NumbersHeavy => "numbers-heavy",
            ProblemId::SnakeScoreNoCase => "snake-score-no-case",
            ProblemId::UserPrefix => "user-prefix",
            ProblemId::UserSuffix => "user-suffix",
            ProblemId::UserMask => "user-mask",
        }
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemId {
    type Err = ProblemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProblemId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ProblemError::UnknownProblem(s.to_string()))
    }
}

/// Strip a leading `0x`, if any
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Mask wildcard, lowercase only
pub(crate) fn is_wildcard(c: char) -> bool {
    c == 'x'
}

impl Problem {
    pub fn id(&self) -> ProblemId {
        match self {
            Problem::LeadingAny { .. } => ProblemId::LeadingAny,
            Problem::TrailingAny { .. } => ProblemId::TrailingAny,
            Problem::LettersHeavy { .. } => ProblemId::LettersHeavy,
            Problem::NumbersHeavy => ProblemId::NumbersHeavy,
            Problem::SnakeScoreNoCase { .. } => ProblemId::SnakeScoreNoCase,
            Problem::UserPrefix { .. } => ProblemId::UserPrefix,
            Problem::UserSuffix { .. } => ProblemId::UserSuffix,
            Problem::UserMask { .. } => ProblemId::UserMask,
        }
    }

    /// The numeric parameter that sizes this problem's probability space.
    ///
    /// For literal problems this is the number of fixed hex characters.
    pub fn threshold(&self) -> u32 {
        match self {
            Problem::LeadingAny { length } | Problem::TrailingAny { length } => *length,
            Problem::LettersHeavy { count } | Problem::SnakeScoreNoCase { count } => *count,
            Problem::NumbersHeavy => ADDRESS_BODY_LEN,
            Problem::UserPrefix { specifier } => strip_hex_prefix(specifier).chars().count() as u32,
            Problem::UserSuffix { specifier } => specifier.chars().count() as u32,
            Problem::UserMask { specifier } => strip_hex_prefix(specifier)
                .chars()
                .filter(|c| !is_wildcard(*c))
                .count() as u32,
        }
    }

    /// Check the problem against the limits accepted for new orders
    pub fn validate(&self) -> Result<(), ProblemError> {
        let id = self.id();
        let range = |value: u32, min: u32, max: u32| {
            if (min..=max).contains(&value) {
                Ok(())
            } else {
                Err(ProblemError::OutOfRange {
                    problem: id,
                    value,
                    min,
                    max,
                })
            }
        };
        let invalid = |specifier: &str, reason: &'static str| ProblemError::InvalidSpecifier {
            problem: id,
            specifier: specifier.to_string(),
            reason,
        };

        match self {
            Problem::LeadingAny { length } | Problem::TrailingAny { length } => {
                range(*length, 8, ADDRESS_BODY_LEN)
            }
            Problem::LettersHeavy { count } => range(*count, 32, ADDRESS_BODY_LEN),
            Problem::NumbersHeavy => Ok(()),
            Problem::SnakeScoreNoCase { count } => range(*count, 15, MAX_SNAKE_PAIRS),
            Problem::UserPrefix { specifier } => {
                let body = specifier
                    .strip_prefix("0x")
                    .ok_or_else(|| invalid(specifier, "must start with 0x"))?;
                if !(6..=40).contains(&body.len()) {
                    return Err(invalid(specifier, "must have 6 to 40 hex characters"));
                }
                if !body.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid(specifier, "must be hex"));
                }
                Ok(())
            }
            Problem::UserSuffix { specifier } => {
                if !(6..=40).contains(&specifier.len()) {
                    return Err(invalid(specifier, "must have 6 to 40 hex characters"));
                }
                if !specifier.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(invalid(specifier, "must be hex"));
                }
                Ok(())
            }
            Problem::UserMask { specifier } => {
                let body = specifier
                    .strip_prefix("0x")
                    .ok_or_else(|| invalid(specifier, "must start with 0x"))?;
                if body.len() != ADDRESS_BODY_LEN as usize {
                    return Err(invalid(specifier, "must be 42 characters long"));
                }
                if !body.chars().all(|c| c.is_ascii_hexdigit() || is_wildcard(c)) {
                    return Err(invalid(specifier, "must be hex or x"));
                }
                Ok(())
            }
        }
    }
}
