//! Statistics records for administrative display
//!
//! A [`Stats`] value is a named, ordered list of [`StatElement`]s. Queues, pools, and the
//! no-wait dispatcher each produce one; the `ceq` binary renders them as a table or JSON.

use serde::Serialize;
use std::fmt;

/// A single statistic value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    Count(u64),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Count(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<bool> for StatValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for StatValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<usize> for StatValue {
    fn from(value: usize) -> Self {
        Self::Count(value as u64)
    }
}

impl From<String> for StatValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A named statistic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatElement {
    pub name: String,
    pub value: StatValue,
}

impl StatElement {
    pub fn new(name: impl Into<String>, value: impl Into<StatValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A read-only snapshot of statistics for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub type_name: String,
    pub elements: Vec<StatElement>,
}

impl Stats {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element, builder style
    pub fn with(mut self, name: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<StatValue>) {
        self.elements.push(StatElement::new(name, value));
    }

    pub fn extend(&mut self, other: Stats) {
        self.elements.extend(other.elements);
    }

    /// Look up the first element with `name`
    pub fn get(&self, name: &str) -> Option<&StatValue> {
        self.elements
            .iter()
            .find(|element| element.name == name)
            .map(|element| &element.value)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.type_name)?;
        for element in &self.elements {
            writeln!(f, "{} = {}", element.name, element.value)?;
        }
        Ok(())
    }
}
