//! Page snapshot provider interface
//!
//! The browser driver owns navigation, waiting and capture. Extraction only
//! needs a DOM it can query by selector, computed styles, element geometry
//! and page text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use pagesense_core::{PageSenseError, Result};

/// Element geometry in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// A queryable view of one rendered page
///
/// Every method may fail (stale node, selector engine error, detached
/// context). Callers in this workspace treat such failures as "absent".
pub trait PageSnapshot {
    /// Number of elements matching a CSS selector
    fn count(&self, selector: &str) -> Result<usize>;

    /// Whether at least one element matches
    fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.count(selector)? > 0)
    }

    /// Text content of the first matching element
    fn element_text(&self, selector: &str) -> Result<Option<String>>;

    /// Computed style property of the first matching element
    fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>>;

    /// Bounding box of the first matching element
    fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>>;

    /// Visible text of the whole page
    fn text_content(&self) -> Result<String>;

    /// Document title
    fn title(&self) -> Result<String>;

    /// Names of cookies visible to the page
    fn cookie_names(&self) -> Result<Vec<String>>;
}

/// In-memory snapshot keyed by exact selector strings
///
/// Useful for replaying a recorded snapshot (it deserializes from JSON) and
/// for tests. Selectors listed in `failing` return a selector error, which
/// exercises the extractor's fail-open path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSnapshot {
    pub counts: BTreeMap<String, usize>,
    pub texts: BTreeMap<String, String>,
    /// Keyed by `"selector|property"`
    pub styles: BTreeMap<String, String>,
    pub boxes: BTreeMap<String, BoundingBox>,
    pub body_text: String,
    pub title: String,
    pub cookies: Vec<String>,
    pub failing: BTreeSet<String>,
}

impl StaticSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, selector: impl Into<String>, count: usize) -> Self {
        self.counts.insert(selector.into(), count);
        self
    }

    pub fn with_element_text(
        mut self,
        selector: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let selector = selector.into();
        self.counts.entry(selector.clone()).or_insert(1);
        self.texts.insert(selector, text.into());
        self
    }

    pub fn with_style(
        mut self,
        selector: &str,
        property: &str,
        value: impl Into<String>,
    ) -> Self {
        self.styles
            .insert(format!("{}|{}", selector, property), value.into());
        self
    }

    pub fn with_box(mut self, selector: impl Into<String>, bbox: BoundingBox) -> Self {
        self.boxes.insert(selector.into(), bbox);
        self
    }

    pub fn with_body_text(mut self, text: impl Into<String>) -> Self {
        self.body_text = text.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>) -> Self {
        self.cookies.push(name.into());
        self
    }

    pub fn with_failing(mut self, selector: impl Into<String>) -> Self {
        self.failing.insert(selector.into());
        self
    }

    fn check(&self, selector: &str) -> Result<()> {
        if self.failing.contains(selector) {
            return Err(PageSenseError::Selector {
                selector: selector.to_string(),
                reason: "selector marked as failing".to_string(),
            });
        }
        Ok(())
    }
}

impl PageSnapshot for StaticSnapshot {
    fn count(&self, selector: &str) -> Result<usize> {
        self.check(selector)?;
        Ok(self.counts.get(selector).copied().unwrap_or(0))
    }

    fn element_text(&self, selector: &str) -> Result<Option<String>> {
        self.check(selector)?;
        Ok(self.texts.get(selector).cloned())
    }

    fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        self.check(selector)?;
        Ok(self
            .styles
            .get(&format!("{}|{}", selector, property))
            .cloned())
    }

    fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>> {
        self.check(selector)?;
        Ok(self.boxes.get(selector).copied())
    }

    fn text_content(&self) -> Result<String> {
        Ok(self.body_text.clone())
    }

    fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    fn cookie_names(&self) -> Result<Vec<String>> {
        Ok(self.cookies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_snapshot_queries() {
        let snapshot = StaticSnapshot::new()
            .with_count("li", 7)
            .with_element_text("h1", "Orders")
            .with_style("body", "cursor", "wait")
            .with_title("Orders - Shop");

        assert_eq!(snapshot.count("li").unwrap(), 7);
        assert!(snapshot.exists("h1").unwrap());
        assert!(!snapshot.exists("table").unwrap());
        assert_eq!(snapshot.element_text("h1").unwrap().as_deref(), Some("Orders"));
        assert_eq!(
            snapshot.computed_style("body", "cursor").unwrap().as_deref(),
            Some("wait")
        );
        assert_eq!(snapshot.title().unwrap(), "Orders - Shop");
    }

    #[test]
    fn test_failing_selector_errors() {
        let snapshot = StaticSnapshot::new().with_failing("div:has(");
        let err = snapshot.count("div:has(").unwrap_err();
        assert!(matches!(err, PageSenseError::Selector { .. }));
    }

    #[test]
    fn test_deserialize_recorded_snapshot() {
        let json = r#"{
            "counts": { "input[type='password']": 1 },
            "title": "Sign in",
            "cookies": ["sid"]
        }"#;
        let snapshot: StaticSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.count("input[type='password']").unwrap(), 1);
        assert_eq!(snapshot.cookie_names().unwrap(), vec!["sid"]);
        assert!(snapshot.body_text.is_empty());
    }

    #[test]
    fn test_bounding_box_area() {
        let bbox = BoundingBox { x: 0.0, y: 0.0, width: 10.0, height: 4.0 };
        assert_eq!(bbox.area(), 40.0);
        let negative = BoundingBox { x: 0.0, y: 0.0, width: -3.0, height: 4.0 };
        assert_eq!(negative.area(), 0.0);
    }
}
