//! Signal record: name -> primitive observation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single observation extracted from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Flag(bool),
    Count(u64),
    /// Captured text, e.g. a displayed username
    Text(String),
}

impl SignalValue {
    /// Flags are truthy when set, counts when above zero, text when non-empty
    pub fn is_truthy(&self) -> bool {
        self.magnitude() > 0
    }

    /// Numeric view used by count thresholds (`true` and text count as 1)
    pub fn magnitude(&self) -> u64 {
        match self {
            Self::Flag(flag) => u64::from(*flag),
            Self::Count(count) => *count,
            Self::Text(text) => u64::from(!text.trim().is_empty()),
        }
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<u64> for SignalValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<usize> for SignalValue {
    fn from(value: usize) -> Self {
        Self::Count(value as u64)
    }
}

impl From<String> for SignalValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SignalValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Flat record of every signal observed on one snapshot
///
/// Keys are kept sorted so two records built from the same snapshot serialize
/// byte-identically. Missing signals read as false/zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalRecord {
    values: BTreeMap<String, SignalValue>,
}

impl SignalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SignalValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SignalValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&SignalValue> {
        self.values.get(name)
    }

    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(SignalValue::is_truthy)
    }

    /// Whether the signal's magnitude reaches `min`
    pub fn meets(&self, name: &str, min: u64) -> bool {
        self.get(name).is_some_and(|v| v.magnitude() >= min.max(1))
    }

    pub fn flag(&self, name: &str) -> bool {
        self.is_truthy(name)
    }

    pub fn count(&self, name: &str) -> u64 {
        self.get(name).map(SignalValue::magnitude).unwrap_or(0)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(SignalValue::Text(text)) if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SignalValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of every truthy signal, in sorted order
    pub fn active(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| v.is_truthy())
            .map(|(k, _)| k)
            .collect()
    }
}
