//! Compiled text patterns used by the extractor

use regex::{Regex, RegexBuilder};

use pagesense_core::{PageSenseError, Result};

/// Every text pattern the extractor matches, compiled once
#[derive(Debug, Clone)]
pub struct TextPatterns {
    pub login: Regex,
    pub signup: Regex,
    pub forgot_password: Regex,
    pub logout: Regex,
    /// Captures the greeted name in group 1
    pub welcome: Regex,
    pub auth_required: Regex,
    pub add_to_cart: Regex,
    pub empty_state: Regex,
    /// Status code in error context; the code is in group 1, 2 or 3
    pub http_error_code: Regex,
    pub error_heading: Regex,
    pub permission_denied: Regex,
    pub not_found: Regex,
    pub server_error: Regex,
}

/// Status codes treated as error evidence
const ERROR_CODES: &str = "400|401|403|404|410|500|502|503|504";

/// A status code needs error context around it, so "Fortune 500" and
/// "Top 404 Recipes" do not match.
fn http_error_code_pattern() -> String {
    format!(
        concat!(
            r"^\s*(?:(?:http\s+)?(?:error|status)\s*:?\s*)?({codes})\s*(?:$|[-:|.!\x{{2013}}])",
            r"|\b(?:error|status)\s*:?\s*({codes})\b",
            r"|\b({codes})\s*[-:|]?\s*(?:page\s+)?(?:not\s+found|forbidden|unauthori[sz]ed|bad\s+request|gone",
            r"|(?:internal\s+)?server\s+error|bad\s+gateway|service\s+unavailable|gateway\s+time-?out|error)\b",
        ),
        codes = ERROR_CODES
    )
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| PageSenseError::Other(format!("Invalid text pattern '{}': {}", name, e)))
}

impl TextPatterns {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            login: compile("login", r"\b(log ?in|sign ?in)\b")?,
            signup: compile("signup", r"\b(sign ?up|register|create (an )?account)\b")?,
            forgot_password: compile("forgot_password", r"\bforgot (your )?password\b")?,
            logout: compile("logout", r"\b(log ?out|sign ?out)\b")?,
            welcome: compile(
                "welcome",
                r"\bwelcome(?: back)?,\s+([\p{L}][\p{L}\p{N}._-]{0,63})",
            )?,
            auth_required: compile(
                "auth_required",
                r"(please (log|sign) ?in|(log|sign) ?in to continue|authentication required|you must be (logged|signed) in|session (has )?expired)",
            )?,
            add_to_cart: compile("add_to_cart", r"\b(add to (cart|bag|basket)|buy now)\b")?,
            empty_state: compile(
                "empty_state",
                r"\b(no (results|items|data|records)( found)?|nothing (here|to show)( yet)?)\b",
            )?,
            http_error_code: compile("http_error_code", &http_error_code_pattern())?,
            error_heading: compile(
                "error_heading",
                r"(page not found|something went wrong|an error occurred|oops)",
            )?,
            permission_denied: compile(
                "permission_denied",
                r"(access denied|permission denied|forbidden|not authori[sz]ed|you don't have permission)",
            )?,
            not_found: compile(
                "not_found",
                r"(page not found|not be found|doesn't exist|does not exist|no longer available)",
            )?,
            server_error: compile(
                "server_error",
                r"(internal server error|server error|service unavailable|bad gateway|gateway timeout)",
            )?,
        })
    }

    /// Name greeted by a "Welcome, X" message, if any
    pub fn welcome_name(&self, text: &str) -> Option<String> {
        self.welcome
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches(['.', '!', '-']).to_string())
            .filter(|name| !name.is_empty())
    }

    /// Status code shown as an error in one line of text (a title or heading)
    pub fn error_code(&self, text: &str) -> Option<String> {
        let caps = self.http_error_code.captures(text.trim())?;
        (1..=3)
            .find_map(|group| caps.get(group))
            .map(|m| m.as_str().to_string())
    }
}
