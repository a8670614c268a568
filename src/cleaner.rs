use crate::scraper::RawSupporter;
pub use crate::log_debug;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Date format the target site renders, e.g. "12 August 2025".
const SITE_DATE_FORMAT: &str = "%d %B %Y";

/// One normalized supporter row, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supporter {
    pub name: String,
    pub amount: f64,
    /// ISO `YYYY-MM-DD`, or empty when the source date was unparseable.
    pub date: String,
    pub location: String,
    pub message: String,
}

pub struct Cleaner {
    amount_re: Regex,
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            amount_re: Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap(),
        }
    }

    /// Normalize raw entries and drop duplicates, preserving first-seen
    /// order. Identity is name + amount + date.
    pub fn clean_data(&self, raw: Vec<RawSupporter>) -> Vec<Supporter> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::new();

        for entry in raw {
            let supporter = Supporter {
                name: clean_name(&entry.name),
                amount: self.clean_amount(&entry.amount),
                date: clean_date(&entry.date),
                location: entry.location.trim().to_string(),
                message: entry.message.trim().to_string(),
            };

            let key = (
                supporter.name.clone(),
                supporter.amount.to_bits(),
                supporter.date.clone(),
            );
            if seen.insert(key) {
                cleaned.push(supporter);
            } else {
                log_debug!("[cleaner] Dropping duplicate entry for {}", supporter.name);
            }
        }

        cleaned
    }

    /// "$1,234.56" -> 1234.56. Anything without a number becomes 0.0.
    pub fn clean_amount(&self, raw: &str) -> f64 {
        self.amount_re
            .find(raw)
            .map(|m| m.as_str().replace(',', ""))
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0.0)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

pub fn clean_name(name: &str) -> String {
    name.trim().to_string()
}

/// "12 August 2025" -> "2025-08-12"; unparseable dates become empty rather
/// than failing the row.
pub fn clean_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), SITE_DATE_FORMAT)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
