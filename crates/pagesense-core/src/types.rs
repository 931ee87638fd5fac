//! Shared issue types for pagesense inspections

use serde::{Deserialize, Serialize};

/// Issue severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error = 0,
    Warning = 1,
    Info = 2,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for IssueSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "major" => Ok(Self::Error),
            "warning" | "warn" | "minor" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            _ => Err(format!("Invalid issue severity: {}", s)),
        }
    }
}

/// Where an issue was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Element geometry, overflow, overlap
    Layout,
    /// Contrast, labels, landmarks
    Accessibility,
    /// Handlers, focusability, dead controls
    Interactivity,
    /// Page intent and state mismatches
    Semantic,
    /// Browser console output
    Console,
    /// Text and media content
    Content,
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Layout => write!(f, "layout"),
            Self::Accessibility => write!(f, "accessibility"),
            Self::Interactivity => write!(f, "interactivity"),
            Self::Semantic => write!(f, "semantic"),
            Self::Console => write!(f, "console"),
            Self::Content => write!(f, "content"),
        }
    }
}

impl std::str::FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "layout" => Ok(Self::Layout),
            "accessibility" | "a11y" => Ok(Self::Accessibility),
            "interactivity" => Ok(Self::Interactivity),
            "semantic" => Ok(Self::Semantic),
            "console" => Ok(Self::Console),
            "content" => Ok(Self::Content),
            _ => Err(format!("Invalid issue category: {}", s)),
        }
    }
}

/// A single finding about the inspected page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub severity: IssueSeverity,
    /// Selector or description of the offending element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub message: String,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Issue {
    pub fn new(
        category: IssueCategory,
        severity: IssueSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            element: None,
            message: message.into(),
            fix: None,
        }
    }

    pub fn error(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(category, IssueSeverity::Error, message)
    }

    pub fn warning(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(category, IssueSeverity::Warning, message)
    }

    pub fn info(category: IssueCategory, message: impl Into<String>) -> Self {
        Self::new(category, IssueSeverity::Info, message)
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == IssueSeverity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == IssueSeverity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(IssueSeverity::Error < IssueSeverity::Warning);
        assert!(IssueSeverity::Warning < IssueSeverity::Info);
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("major".parse::<IssueSeverity>().unwrap(), IssueSeverity::Error);
        assert_eq!("WARN".parse::<IssueSeverity>().unwrap(), IssueSeverity::Warning);
        assert!("fatal".parse::<IssueSeverity>().is_err());
    }

    #[test]
    fn test_issue_builder() {
        let issue = Issue::error(IssueCategory::Accessibility, "Button has no label")
            .with_element("button.submit")
            .with_fix("Add an aria-label");

        assert!(issue.is_error());
        assert_eq!(issue.element.as_deref(), Some("button.submit"));
        assert_eq!(issue.fix.as_deref(), Some("Add an aria-label"));
        assert_eq!(issue.category.to_string(), "accessibility");
    }

    #[test]
    fn test_issue_serialization_skips_empty_fields() {
        let issue = Issue::info(IssueCategory::Console, "debug output");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("element"));
        assert!(!json.contains("fix"));
        assert!(json.contains("\"severity\":\"info\""));
    }
}
