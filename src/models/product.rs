//! Tracked product state and change records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability status of a tracked product.
///
/// `Unknown` only appears in states that were never successfully observed,
/// e.g. a hand-edited state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Unknown,
}

impl Availability {
    /// Human-readable label used in notifications and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Availability::InStock => "in stock",
            Availability::OutOfStock => "out of stock",
            Availability::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted state of a single tracked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState {
    /// Last-known availability status
    pub status: Availability,

    /// Displayed price at the last in-stock observation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// When this product was last successfully checked
    pub last_checked: DateTime<Utc>,

    /// When the status last flipped
    pub last_changed: DateTime<Utc>,
}

/// One fresh observation of a product page.
#[derive(Debug, Clone)]
pub struct Observation {
    pub name: String,
    pub url: String,
    pub status: Availability,
    pub price: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// A detected status flip, drives exactly one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub name: String,
    pub url: String,
    pub old: Availability,
    pub new: Availability,
    pub price: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl StatusChange {
    /// Subject line for channels that have one.
    pub fn subject(&self) -> String {
        format!("Stock alert: {} is now {}", self.name, self.new)
    }

    /// HTML-formatted message body for chat channels.
    pub fn html_message(&self) -> String {
        let mut message = format!("<b>Stock alert: {}</b>\n\n", self.name);
        message.push_str(&format!("Status: {} (was {})\n", self.new, self.old));
        if let Some(price) = &self.price {
            message.push_str(&format!("Price: {}\n", price));
        }
        message.push_str(&format!("{}\n", self.url));
        message.push_str(&format!(
            "\nChecked at {}",
            self.changed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        message
    }

    /// Plain-text message body for email.
    pub fn text_message(&self) -> String {
        let mut message = format!("Stock alert: {}\n\n", self.name);
        message.push_str(&format!("Status: {} (was {})\n", self.new, self.old));
        if let Some(price) = &self.price {
            message.push_str(&format!("Price: {}\n", price));
        }
        message.push_str(&format!("URL: {}\n", self.url));
        message.push_str(&format!(
            "Checked at: {}\n",
            self.changed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_change() -> StatusChange {
        StatusChange {
            name: "Test Butter".to_string(),
            url: "https://example.com/butter".to_string(),
            old: Availability::OutOfStock,
            new: Availability::InStock,
            price: Some("₹285".to_string()),
            changed_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject() {
        let change = sample_change();
        assert_eq!(change.subject(), "Stock alert: Test Butter is now in stock");
    }

    #[test]
    fn test_html_message_contains_fields() {
        let message = sample_change().html_message();
        assert!(message.contains("<b>Stock alert: Test Butter</b>"));
        assert!(message.contains("in stock (was out of stock)"));
        assert!(message.contains("₹285"));
        assert!(message.contains("https://example.com/butter"));
    }

    #[test]
    fn test_text_message_skips_missing_price() {
        let mut change = sample_change();
        change.price = None;
        let message = change.text_message();
        assert!(!message.contains("Price:"));
        assert!(message.contains("URL: https://example.com/butter"));
    }

    #[test]
    fn test_availability_serde_labels() {
        let json = serde_json::to_string(&Availability::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
        let back: Availability = serde_json::from_str("\"in_stock\"").unwrap();
        assert_eq!(back, Availability::InStock);
    }
}
