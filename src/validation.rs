//! Request validation
//!
//! Rules accumulate plain-English messages; a failed validation surfaces as
//! an HTML `<li>` list the front end injects into its error container.

use crate::error::{HelpdeskError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]*>").unwrap_or_else(|e| panic!("invalid html tag pattern: {e}"))
});

static STYLE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?style[^>]*>").unwrap_or_else(|e| panic!("invalid style tag pattern: {e}"))
});

/// Accumulates validation failures for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value must be non-blank
    pub fn require(&mut self, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(format!("{label} is required"));
        }
    }

    /// A select-style field must carry a positive id
    pub fn require_id(&mut self, label: &str, id: Option<i64>) {
        if !id.is_some_and(|id| id > 0) {
            self.errors.push(format!("{label} is required"));
        }
    }

    /// The value must not contain HTML tags
    pub fn no_tags(&mut self, label: &str, value: &str) {
        if HTML_TAG_RE.is_match(value) {
            self.errors.push(format!("{label} must not contain HTML tags"));
        }
    }

    /// Record an ad hoc failure
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The accumulated messages as an inline `<li>` list
    #[must_use]
    pub fn html_list(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("<li>{e}</li>"))
            .collect()
    }

    /// Finish: `Ok` when clean, otherwise a `Validation` error carrying the
    /// `<li>` list
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(HelpdeskError::Validation(self.html_list()))
        }
    }
}

/// Remove `<style>` wrappers from pasted CSS, keeping the rules themselves
#[must_use]
pub fn strip_style_tags(css: &str) -> String {
    STYLE_TAG_RE.replace_all(css, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_flags_blank_values() {
        let mut v = Validator::new();
        v.require("Subject", "  ");
        v.require("Body", "present");

        assert!(!v.is_valid());
        assert_eq!(v.html_list(), "<li>Subject is required</li>");
    }

    #[test]
    fn test_require_id_rejects_missing_and_zero() {
        let mut v = Validator::new();
        v.require_id("Category", None);
        v.require_id("Client", Some(0));
        v.require_id("Status", Some(3));

        assert_eq!(
            v.html_list(),
            "<li>Category is required</li><li>Client is required</li>"
        );
    }

    #[test]
    fn test_no_tags_rule() {
        let mut v = Validator::new();
        v.no_tags("Theme name", "midnight <script>alert(1)</script>");
        assert!(!v.is_valid());

        let mut v = Validator::new();
        v.no_tags("Theme name", "midnight blue");
        assert!(v.is_valid());
    }

    #[test]
    fn test_into_result_carries_list() {
        let mut v = Validator::new();
        v.require("Subject", "");
        let err = v.into_result().unwrap_err();
        match err {
            HelpdeskError::Validation(list) => assert!(list.contains("<li>Subject is required</li>")),
            other => panic!("unexpected error: {other}"),
        }

        assert!(Validator::new().into_result().is_ok());
    }

    #[test]
    fn test_strip_style_tags_keeps_rules() {
        let css = "<style type=\"text/css\">body { color: red; }</STYLE>";
        assert_eq!(strip_style_tags(css), "body { color: red; }");
        assert_eq!(strip_style_tags(".plain { x: 1; }"), ".plain { x: 1; }");
    }
}
