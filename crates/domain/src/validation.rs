//! Field-level request validation helpers

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{DomainError, Result};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Collects one message per offending field
#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Trimmed, non-empty string
    pub fn required(&mut self, field: &str, value: Option<&String>) -> Option<String> {
        match value.map(|v| v.trim()) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            Some(_) => {
                self.push(format!("\"{}\" is not allowed to be empty", field));
                None
            }
            None => {
                self.push(format!("\"{}\" is required", field));
                None
            }
        }
    }

    /// Trimmed string, `None` when absent; empty strings are rejected
    pub fn optional(&mut self, field: &str, value: Option<&String>) -> Option<String> {
        value.and_then(|_| self.required(field, value))
    }

    pub fn required_date(&mut self, field: &str, value: Option<&String>) -> Option<DateTime<Utc>> {
        match value {
            Some(raw) => self.date(field, raw),
            None => {
                self.push(format!("\"{}\" is required", field));
                None
            }
        }
    }

    pub fn optional_date(&mut self, field: &str, value: Option<&String>) -> Option<DateTime<Utc>> {
        value.and_then(|raw| self.date(field, raw))
    }

    fn date(&mut self, field: &str, raw: &str) -> Option<DateTime<Utc>> {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.push(format!("\"{}\" must be a valid date", field));
        }
        parsed
    }

    /// Parse `value` with `parse`, reporting the accepted values on failure
    pub fn one_of<T>(
        &mut self,
        field: &str,
        value: &str,
        allowed: &[&str],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let parsed = parse(value.trim());
        if parsed.is_none() {
            self.push(format!("\"{}\" must be one of [{}]", field, allowed.join(", ")));
        }
        parsed
    }

    pub fn min(&mut self, field: &str, value: f64, limit: f64) -> bool {
        if value < limit {
            self.push(format!(
                "\"{}\" must be greater than or equal to {}",
                field, limit
            ));
            return false;
        }
        true
    }

    pub fn max(&mut self, field: &str, value: f64, limit: f64) -> bool {
        if value > limit {
            self.push(format!("\"{}\" must be less than or equal to {}", field, limit));
            return false;
        }
        true
    }

    /// `Ok(())` when nothing was collected
    pub fn finish(self) -> Result<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.messages))
        }
    }
}

/// Loose shape check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.contains(char::is_whitespace)
        }
        _ => false,
    }
}
