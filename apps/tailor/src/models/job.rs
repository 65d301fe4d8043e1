#![allow(dead_code)]

//! Job posting model — the immutable input record of the pipeline.
//!
//! Postings arrive as loosely structured JSON (scraper payloads vary by
//! source), so the struct declares the fields the pipeline reads and keeps
//! every unrecognized key in a raw passthrough map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single job posting. Never mutated by the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPosting {
    pub id: Option<String>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub location: Option<String>,
    pub posted_at: Option<String>,
    /// Heterogeneous across sources: a string, an object, or a list.
    pub salary_info: Option<Value>,
    pub link: Option<String>,
    pub apply_url: Option<String>,
    pub company_website: Option<String>,
    /// Unrecognized keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl JobPosting {
    pub fn company(&self) -> &str {
        self.company_name.as_deref().unwrap_or("Unknown Company")
    }

    pub fn role(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Position")
    }

    /// Free-text description used for keyword extraction and gating.
    pub fn description_text(&self) -> &str {
        self.description
            .as_deref()
            .or(self.description_html.as_deref())
            .unwrap_or("")
    }

    /// Stable dedup key built from the identifying fields. Used both for
    /// in-run duplicate filtering and as the compile base name.
    pub fn job_key(&self) -> String {
        let parts = [
            self.id.as_deref(),
            self.company_name.as_deref(),
            self.title.as_deref(),
            self.posted_at.as_deref(),
            self.link.as_deref().or(self.apply_url.as_deref()),
        ];
        let combined = parts
            .iter()
            .flatten()
            .map(|p| clean_string(p))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let key = slugify(&combined);
        if key == "na" {
            // Nothing identifying on the record; a random key keeps the
            // posting from colliding with every other anonymous one.
            uuid::Uuid::new_v4().simple().to_string()
        } else {
            key
        }
    }

    /// Human-readable salary string from whatever shape the source sent.
    pub fn format_salary(&self) -> String {
        match &self.salary_info {
            Some(v) => format_salary_value(v),
            None => "Not specified".to_string(),
        }
    }
}

fn format_salary_value(value: &Value) -> String {
    const NOT_SPECIFIED: &str = "Not specified";
    match value {
        Value::Array(entries) => entries
            .iter()
            .map(format_salary_value)
            .find(|s| s != NOT_SPECIFIED)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
        Value::Object(map) => {
            for key in ["displayValue", "value", "label", "text"] {
                if let Some(v) = map.get(key).filter(|v| !v.is_null()) {
                    let s = clean_string(&value_to_string(v));
                    if !s.is_empty() {
                        return s;
                    }
                }
            }
            let low = map.get("min").or(map.get("from")).or(map.get("low"));
            let high = map.get("max").or(map.get("to")).or(map.get("high"));
            let currency = map.get("currency").or(map.get("curr"));
            let period = map.get("period").or(map.get("unit"));

            let mut parts = Vec::new();
            if let Some(c) = currency {
                parts.push(value_to_string(c));
            }
            match (low, high) {
                (Some(l), Some(h)) => parts.push(format!("{}-{}", value_to_string(l), value_to_string(h))),
                (Some(l), None) => parts.push(value_to_string(l)),
                (None, Some(h)) => parts.push(value_to_string(h)),
                (None, None) => {}
            }
            if let Some(p) = period {
                parts.push(value_to_string(p));
            }
            if parts.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                clean_string(&parts.join(" "))
            }
        }
        Value::Null => NOT_SPECIFIED.to_string(),
        other => {
            let s = clean_string(&value_to_string(other));
            if s.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                s
            }
        }
    }
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Removes newlines/tabs and surrounding whitespace.
pub fn clean_string(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// URL- and filename-safe slug: lowercase, whitespace collapsed to single
/// dashes, everything outside `[a-z0-9-]` dropped. Empty input slugs to "na".
pub fn slugify(text: &str) -> String {
    let cleaned = clean_string(text).to_lowercase();
    let mut out = String::with_capacity(cleaned.len());
    let mut prev_dash = true; // suppress leading dashes
    for ch in cleaned.chars() {
        let mapped = if ch.is_whitespace() {
            Some('-')
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            Some(ch)
        } else {
            None
        };
        match mapped {
            Some('-') => {
                if !prev_dash {
                    out.push('-');
                    prev_dash = true;
                }
            }
            Some(c) => {
                out.push(c);
                prev_dash = false;
            }
            None => {}
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "na".to_string()
    } else {
        out
    }
}
