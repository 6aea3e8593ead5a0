/// Rule sets — symbol definitions supplied from outside the grammar text.
///
/// Each symbol maps to either a single source string or a list of
/// alternatives:
///
/// ```text
/// { "origin": "#greeting#, #name#!", "greeting": ["Hello", "Hi"] }
/// ```
///
/// Source strings stay raw here; they are only parsed when loaded into a
/// [`Grammar`](crate::core::grammar::Grammar).
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("unknown rule set format for '{0}' (expected .json or .ron)")]
    UnknownFormat(String),
}

/// The source strings for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    One(String),
    Many(Vec<String>),
}

impl Rule {
    pub fn alternatives(&self) -> &[String] {
        match self {
            Rule::One(source) => std::slice::from_ref(source),
            Rule::Many(sources) => sources,
        }
    }
}

impl From<&str> for Rule {
    fn from(source: &str) -> Self {
        Rule::One(source.to_string())
    }
}

impl From<Vec<String>> for Rule {
    fn from(sources: Vec<String>) -> Self {
        Rule::Many(sources)
    }
}

/// Symbol name → rule, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    pub rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    /// Load a rule set from a `.json` or `.ron` file.
    pub fn load(path: &Path) -> Result<RuleSet, RuleSetError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json(&contents),
            Some("ron") => Self::from_ron(&contents),
            _ => Err(RuleSetError::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn from_json(input: &str) -> Result<RuleSet, RuleSetError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_ron(input: &str) -> Result<RuleSet, RuleSetError> {
        Ok(ron::from_str(input)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, rule: impl Into<Rule>) {
        self.rules.insert(key.into(), rule.into());
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Merge another rule set into this one. Rules from `other` replace
    /// rules in `self` with the same name.
    pub fn merge(&mut self, other: RuleSet) {
        self.rules.extend(other.rules);
    }
}
