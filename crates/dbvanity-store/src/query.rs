//! Query expressions over entity annotations
//!
//! Only the equality subset is understood: clauses of the form
//! `key = 42` or `key = "text"` joined by `&&`. The special key `$owner`
//! matches the entity owner instead of an annotation.

use std::fmt;

use crate::traits::{Entity, StoreError};

const OWNER_KEY: &str = "$owner";

/// Right-hand side of an equality clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseValue {
    Str(String),
    Num(u64),
}

/// A single `key = value` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub key: String,
    pub value: ClauseValue,
}

impl Clause {
    fn matches(&self, entity: &Entity) -> bool {
        match (&self.value, self.key.as_str()) {
            (ClauseValue::Str(owner), OWNER_KEY) => entity.owner.eq_ignore_ascii_case(owner),
            (ClauseValue::Num(_), OWNER_KEY) => false,
            (ClauseValue::Str(v), key) => entity.string_annotation(key) == Some(v.as_str()),
            (ClauseValue::Num(v), key) => entity.numeric_annotation(key) == Some(*v),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ClauseValue::Str(s) => write!(f, "{} = \"{}\"", self.key, s),
            ClauseValue::Num(n) => write!(f, "{} = {}", self.key, n),
        }
    }
}

/// Conjunction of equality clauses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric equality clause
    pub fn num(mut self, key: impl Into<String>, value: u64) -> Self {
        self.clauses.push(Clause {
            key: key.into(),
            value: ClauseValue::Num(value),
        });
        self
    }

    /// Add a string equality clause
    pub fn str(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push(Clause {
            key: key.into(),
            value: ClauseValue::Str(value.into()),
        });
        self
    }

    /// Restrict to entities created by `owner`
    pub fn owner(self, owner: impl Into<String>) -> Self {
        self.str(OWNER_KEY, owner)
    }

    /// Parse a query expression
    pub fn parse(input: &str) -> Result<Self, StoreError> {
        let mut clauses = Vec::new();

        for raw in input.split("&&") {
            let raw = raw.trim();
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| StoreError::InvalidQuery(raw.to_string()))?;
            let key = key.trim();
            let value = value.trim();

            if key.is_empty() || value.is_empty() {
                return Err(StoreError::InvalidQuery(raw.to_string()));
            }

            let value = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                ClauseValue::Str(value[1..value.len() - 1].to_string())
            } else {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| StoreError::InvalidQuery(raw.to_string()))?;
                ClauseValue::Num(n)
            };

            clauses.push(Clause {
                key: key.to_string(),
                value,
            });
        }

        Ok(Self { clauses })
    }

    /// Whether every clause holds for the entity
    pub fn matches(&self, entity: &Entity) -> bool {
        self.clauses.iter().all(|c| c.matches(entity))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Query selecting one provider group written by `owner`
pub fn group_query(group: u64, owner: &str) -> String {
    Query::new().num("group", group).owner(owner).to_string()
}
