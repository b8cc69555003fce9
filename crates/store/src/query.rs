//! Listing helpers: pagination and dynamic WHERE clauses

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Clamp to `page >= 1` and `1 <= limit <= MAX_LIMIT`
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_pages: total.div_ceil(request.limit as u64),
            current_page: request.page,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            current_page: self.current_page,
            total: self.total,
        }
    }
}

/// Accumulates `AND`-joined conditions with positional parameters
#[derive(Debug, Default)]
pub(crate) struct Where {
    clauses: Vec<String>,
    pub(crate) values: Vec<Value>,
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

impl Where {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, value: Value) -> usize {
        self.values.push(value);
        self.values.len()
    }

    pub(crate) fn eq(&mut self, column: &str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            let n = self.bind(value.into());
            self.clauses.push(format!("{} = ?{}", column, n));
        }
        self
    }

    /// Raw condition with a single bound value, written as `?` in `clause`
    pub(crate) fn raw(&mut self, clause: &str, value: Option<impl Into<Value>>) -> &mut Self {
        if let Some(value) = value {
            let n = self.bind(value.into());
            self.clauses.push(clause.replace('?', &format!("?{}", n)));
        }
        self
    }

    /// Case-insensitive substring match on any of `columns`
    pub(crate) fn search(&mut self, columns: &[&str], term: Option<&str>) -> &mut Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let n = self.bind(Value::Text(escape_like(term)));
            let any = columns
                .iter()
                .map(|c| format!("{} LIKE ?{} ESCAPE '\\'", c, n))
                .collect::<Vec<_>>()
                .join(" OR ");
            self.clauses.push(format!("({})", any));
        }
        self
    }

    pub(crate) fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}
