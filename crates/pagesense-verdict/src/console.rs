//! Console report filtering

use pagesense_core::config::ConsoleConfig;
use pagesense_core::{Issue, IssueCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Browser console message level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Error,
    Warning,
    Info,
    Log,
    Debug,
}

impl std::fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Log => write!(f, "log"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

impl std::str::FromStr for ConsoleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "assert" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "log" => Ok(Self::Log),
            "debug" | "verbose" | "trace" => Ok(Self::Debug),
            _ => Err(format!("Unknown console level: {}", s)),
        }
    }
}

/// A single console message captured by the browser driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub text: String,
    /// Script or resource URL the message came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ConsoleEntry {
    pub fn new(level: ConsoleLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            source: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(ConsoleLevel::Warning, text)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Drops console noise and turns the rest into issues
#[derive(Debug, Clone)]
pub struct ConsoleFilter {
    /// Lowercased substrings
    ignore_patterns: Vec<String>,
}

impl ConsoleFilter {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            ignore_patterns: config
                .ignore_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Whether an entry mentions an ignored pattern in its text or source
    pub fn is_noise(&self, entry: &ConsoleEntry) -> bool {
        let text = entry.text.to_lowercase();
        let source = entry.source.as_deref().map(str::to_lowercase);
        self.ignore_patterns.iter().any(|pattern| {
            text.contains(pattern)
                || source.as_deref().is_some_and(|s| s.contains(pattern))
        })
    }

    /// Errors and warnings that survive the filter, in capture order
    pub fn issues(&self, entries: &[ConsoleEntry]) -> Vec<Issue> {
        let mut issues = Vec::new();
        for entry in entries {
            if self.is_noise(entry) {
                debug!("Dropping console noise: {}", entry.text);
                continue;
            }
            let issue = match entry.level {
                ConsoleLevel::Error => {
                    Issue::error(IssueCategory::Console, format!("Console error: {}", entry.text))
                }
                ConsoleLevel::Warning => Issue::warning(
                    IssueCategory::Console,
                    format!("Console warning: {}", entry.text),
                ),
                _ => continue,
            };
            issues.push(match &entry.source {
                Some(source) => issue.with_element(source.clone()),
                None => issue,
            });
        }
        issues
    }
}

impl Default for ConsoleFilter {
    fn default() -> Self {
        Self::new(&ConsoleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesense_core::IssueSeverity;

    #[test]
    fn test_favicon_and_manifest_are_noise() {
        let filter = ConsoleFilter::default();
        assert!(filter.is_noise(&ConsoleEntry::error(
            "GET https://example.com/favicon.ico 404 (Not Found)"
        )));
        assert!(filter.is_noise(
            &ConsoleEntry::error("Failed to load resource").with_source("/Manifest.json")
        ));
        assert!(!filter.is_noise(&ConsoleEntry::error("TypeError: x is undefined")));
    }

    #[test]
    fn test_issues_keep_errors_and_warnings_only() {
        let entries = vec![
            ConsoleEntry::error("TypeError: x is undefined").with_source("app.js"),
            ConsoleEntry::new(ConsoleLevel::Log, "mounted"),
            ConsoleEntry::warning("Deprecated API"),
            ConsoleEntry::error("favicon.ico 404"),
        ];
        let issues = ConsoleFilter::default().issues(&entries);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, IssueSeverity::Error);
        assert_eq!(issues[0].message, "Console error: TypeError: x is undefined");
        assert_eq!(issues[0].element.as_deref(), Some("app.js"));
        assert_eq!(issues[1].severity, IssueSeverity::Warning);
        assert!(issues.iter().all(|i| i.category == IssueCategory::Console));
    }

    #[test]
    fn test_custom_patterns() {
        let config = ConsoleConfig {
            ignore_patterns: vec!["Analytics".to_string(), String::new()],
        };
        let filter = ConsoleFilter::new(&config);
        assert!(filter.is_noise(&ConsoleEntry::error("analytics blocked")));
        assert!(!filter.is_noise(&ConsoleEntry::error("favicon.ico 404")));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("warn".parse::<ConsoleLevel>().unwrap(), ConsoleLevel::Warning);
        assert_eq!("ERROR".parse::<ConsoleLevel>().unwrap(), ConsoleLevel::Error);
        assert!("loud".parse::<ConsoleLevel>().is_err());
    }
}
