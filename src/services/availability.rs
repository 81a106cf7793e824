// src/services/availability.rs

//! Availability checker service.
//!
//! Fetches each tracked product's page and extracts the availability signal:
//! a per-product CSS selector (typically the buy button) plus the global
//! keyword markers. Out-of-stock markers override in-stock ones, since pages
//! routinely carry "add to cart" markup even when disabled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{Availability, Config, Observation, ProductSpec};
use crate::utils::http;

/// Summary of a check run.
#[derive(Debug, Default)]
pub struct CheckOutcome {
    /// Successful observations, one per reachable product
    pub observations: Vec<Observation>,
    /// Number of products configured for this run
    pub product_total: usize,
    /// Number of products whose fetch or parse failed
    pub failures: usize,
}

/// Service for checking tracked products.
pub struct AvailabilityChecker {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl AvailabilityChecker {
    /// Create a new checker with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_client(&config.monitor)?;
        Ok(Self { config, client })
    }

    /// Check every configured product sequentially.
    ///
    /// Per-product failures are counted, logged, and skipped; the remaining
    /// products are still checked.
    pub async fn check_all(&self) -> Result<CheckOutcome> {
        let delay = Duration::from_millis(self.config.monitor.request_delay_ms);
        let mut outcome = CheckOutcome {
            product_total: self.config.products.len(),
            ..CheckOutcome::default()
        };

        for (i, product) in self.config.products.iter().enumerate() {
            log::info!("Checking {} ({})", product.name, product.url);
            match self.check_product(product).await {
                Ok(observation) => {
                    log::debug!("{} observed {}", observation.name, observation.status);
                    outcome.observations.push(observation);
                }
                Err(error) => {
                    outcome.failures += 1;
                    log::warn!("Failed to check {}: {}", product.name, error);
                }
            }

            if delay.as_millis() > 0 && i + 1 < self.config.products.len() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcome)
    }

    /// Fetch a single product page and parse its availability.
    async fn check_product(&self, product: &ProductSpec) -> Result<Observation> {
        let html = self
            .client
            .get(&product.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        self.parse_observation(product, &html)
    }

    /// Parse an observation out of a fetched page body.
    pub fn parse_observation(&self, product: &ProductSpec, html: &str) -> Result<Observation> {
        let document = Html::parse_document(html);
        let status = self.detect_availability(product, &document, html)?;

        let price = if status == Availability::InStock {
            self.extract_price(product, &document)?
        } else {
            None
        };

        Ok(Observation {
            name: product.name.clone(),
            url: product.url.clone(),
            status,
            price,
            checked_at: Utc::now(),
        })
    }

    fn detect_availability(
        &self,
        product: &ProductSpec,
        document: &Html,
        html: &str,
    ) -> Result<Availability> {
        let text = html.to_lowercase();

        let mut available = false;
        if let Some(selector) = &product.selector {
            let sel = Self::parse_selector(selector)?;
            available = document.select(&sel).next().is_some();
        }
        if !available {
            available = self
                .config
                .markers
                .in_stock
                .iter()
                .any(|marker| text.contains(&marker.to_lowercase()));
        }

        // Out-of-stock markers override.
        if self
            .config
            .markers
            .out_of_stock
            .iter()
            .any(|marker| text.contains(&marker.to_lowercase()))
        {
            available = false;
        }

        Ok(if available {
            Availability::InStock
        } else {
            Availability::OutOfStock
        })
    }

    fn extract_price(&self, product: &ProductSpec, document: &Html) -> Result<Option<String>> {
        let Some(selector) = &product.price_selector else {
            return Ok(None);
        };
        let sel = Self::parse_selector(selector)?;
        let Some(element) = document.select(&sel).next() else {
            return Ok(None);
        };
        let raw: String = element.text().collect();
        let price = normalize_price(&raw);
        Ok((!price.is_empty()).then_some(price))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

/// Tidy a raw price string: collapse whitespace and, when a recognizable
/// currency amount is present, keep just that token.
fn normalize_price(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Ok(pattern) = Regex::new(r"[$€£₹]\s*\d[\d,]*(?:\.\d+)?|\d[\d,]*(?:\.\d+)?") {
        if let Some(m) = pattern.find(&collapsed) {
            return collapsed[m.start()..m.end()].replace(' ', "");
        }
    }
    collapsed
}
