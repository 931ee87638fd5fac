//! Live DOM queries behind the [`PageSnapshot`] trait
//!
//! Each query runs one script in the page. Scripts serialize their own reply
//! as `{"ok": value}` or `{"error": message}` so a bad selector surfaces as a
//! [`PageSenseError::Selector`] instead of a CDP exception.

use pagesense_core::{PageSenseError, Result};
use pagesense_signals::{BoundingBox, PageSnapshot};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::browser::BrowserSession;

/// Reply envelope written by [`wrap_query`] scripts
#[derive(Debug, Deserialize)]
struct ScriptReply<T> {
    ok: Option<T>,
    error: Option<String>,
}

/// Quote a Rust string as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Wrap a query body that assigns `result` given `sel`
fn wrap_query(selector: &str, body: &str) -> String {
    format!(
        "JSON.stringify((() => {{ try {{ const sel = {}; let result = null; {} return {{ ok: result }}; }} catch (e) {{ return {{ error: String(e) }}; }} }})())",
        js_string(selector),
        body
    )
}

fn count_script(selector: &str) -> String {
    wrap_query(selector, "result = document.querySelectorAll(sel).length;")
}

fn text_script(selector: &str) -> String {
    wrap_query(
        selector,
        "const el = document.querySelector(sel); \
         if (el) { result = (el.innerText ?? el.textContent ?? '').trim(); }",
    )
}

fn style_script(selector: &str, property: &str) -> String {
    wrap_query(
        selector,
        &format!(
            "const el = document.querySelector(sel); \
             if (el) {{ const v = getComputedStyle(el).getPropertyValue({}); result = v === '' ? null : v; }}",
            js_string(property)
        ),
    )
}

fn box_script(selector: &str) -> String {
    wrap_query(
        selector,
        "const el = document.querySelector(sel); \
         if (el) { const r = el.getBoundingClientRect(); \
         result = { x: r.left + window.scrollX, y: r.top + window.scrollY, width: r.width, height: r.height }; }",
    )
}

const BODY_TEXT_SCRIPT: &str =
    "JSON.stringify({ ok: document.body ? (document.body.innerText ?? document.body.textContent ?? '') : '' })";

/// Decode a script reply, mapping script exceptions to selector errors
fn decode<T: DeserializeOwned>(selector: &str, raw: serde_json::Value) -> Result<Option<T>> {
    let text = raw.as_str().ok_or_else(|| {
        PageSenseError::Snapshot(format!("Query for '{}' returned no reply", selector))
    })?;
    let reply: ScriptReply<T> = serde_json::from_str(text)?;
    match reply.error {
        Some(reason) => Err(PageSenseError::Selector {
            selector: selector.to_string(),
            reason,
        }),
        None => Ok(reply.ok),
    }
}

impl BrowserSession {
    fn query<T: DeserializeOwned>(&self, selector: &str, script: &str) -> Result<Option<T>> {
        decode(selector, self.evaluate(script)?)
    }
}

impl PageSnapshot for BrowserSession {
    fn count(&self, selector: &str) -> Result<usize> {
        Ok(self
            .query::<usize>(selector, &count_script(selector))?
            .unwrap_or(0))
    }

    fn element_text(&self, selector: &str) -> Result<Option<String>> {
        self.query(selector, &text_script(selector))
    }

    fn computed_style(&self, selector: &str, property: &str) -> Result<Option<String>> {
        self.query(selector, &style_script(selector, property))
    }

    fn bounding_box(&self, selector: &str) -> Result<Option<BoundingBox>> {
        self.query(selector, &box_script(selector))
    }

    fn text_content(&self) -> Result<String> {
        Ok(self
            .query::<String>("body", BODY_TEXT_SCRIPT)?
            .unwrap_or_default())
    }

    fn title(&self) -> Result<String> {
        self.tab()
            .get_title()
            .map_err(|e| PageSenseError::Browser(format!("Failed to read title: {}", e)))
    }

    fn cookie_names(&self) -> Result<Vec<String>> {
        self.all_cookie_names()
    }
}
