//! Diff calculation between stored state and fresh observations.
//!
//! A notification is owed exactly when a stored status exists and differs
//! from the newly observed one. First observations are recorded silently,
//! and products that failed this run keep their stored entry untouched.

use std::collections::HashMap;

use crate::models::{Observation, ProductState, StatusChange};

/// Result of diffing a run's observations against the stored state.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Status flips, one notification each
    pub changes: Vec<StatusChange>,
    /// Products recorded for the first time this run
    pub new_products: Vec<String>,
    /// The full updated state mapping to persist
    pub state: HashMap<String, ProductState>,
}

impl DiffResult {
    /// Check if there are any status flips.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Get the number of status flips.
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }
}

/// Calculator for diffing observations against stored state.
#[derive(Debug, Clone, Default)]
pub struct DiffCalculator;

impl DiffCalculator {
    /// Create a new diff calculator.
    pub fn new() -> Self {
        Self
    }

    /// Diff the observations against the previous state.
    ///
    /// Every stored entry survives into the result; observed products get
    /// their bookkeeping fields refreshed, and only genuine status flips
    /// produce a `StatusChange`.
    pub fn calculate(
        &self,
        previous: &HashMap<String, ProductState>,
        observations: &[Observation],
    ) -> DiffResult {
        let mut state = previous.clone();
        let mut changes = Vec::new();
        let mut new_products = Vec::new();

        for observation in observations {
            match state.get_mut(&observation.name) {
                Some(entry) => {
                    if entry.status != observation.status {
                        changes.push(StatusChange {
                            name: observation.name.clone(),
                            url: observation.url.clone(),
                            old: entry.status,
                            new: observation.status,
                            price: observation.price.clone(),
                            changed_at: observation.checked_at,
                        });
                        entry.status = observation.status;
                        entry.last_changed = observation.checked_at;
                    }
                    entry.price = observation.price.clone();
                    entry.last_checked = observation.checked_at;
                }
                None => {
                    new_products.push(observation.name.clone());
                    state.insert(
                        observation.name.clone(),
                        ProductState {
                            status: observation.status,
                            price: observation.price.clone(),
                            last_checked: observation.checked_at,
                            last_changed: observation.checked_at,
                        },
                    );
                }
            }
        }

        DiffResult {
            changes,
            new_products,
            state,
        }
    }
}

/// Convenience function to calculate a diff.
pub fn calculate_diff(
    previous: &HashMap<String, ProductState>,
    observations: &[Observation],
) -> DiffResult {
    DiffCalculator::new().calculate(previous, observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Availability;
    use chrono::Utc;

    fn make_observation(name: &str, status: Availability) -> Observation {
        Observation {
            name: name.to_string(),
            url: format!("https://example.com/{}", name),
            status,
            price: None,
            checked_at: Utc::now(),
        }
    }

    fn make_state(status: Availability) -> ProductState {
        let now = Utc::now();
        ProductState {
            status,
            price: None,
            last_checked: now,
            last_changed: now,
        }
    }

    #[test]
    fn test_no_changes() {
        let mut previous = HashMap::new();
        previous.insert("butter".to_string(), make_state(Availability::InStock));
        let observations = vec![make_observation("butter", Availability::InStock)];

        let result = calculate_diff(&previous, &observations);
        assert!(!result.has_changes());
        assert_eq!(result.change_count(), 0);
        assert_eq!(result.state["butter"].status, Availability::InStock);
    }

    #[test]
    fn test_restock_produces_one_change() {
        let mut previous = HashMap::new();
        previous.insert("butter".to_string(), make_state(Availability::OutOfStock));
        let observations = vec![make_observation("butter", Availability::InStock)];

        let result = calculate_diff(&previous, &observations);
        assert_eq!(result.change_count(), 1);
        assert_eq!(result.changes[0].old, Availability::OutOfStock);
        assert_eq!(result.changes[0].new, Availability::InStock);
        assert_eq!(result.state["butter"].status, Availability::InStock);
    }

    #[test]
    fn test_sellout_produces_one_change() {
        let mut previous = HashMap::new();
        previous.insert("butter".to_string(), make_state(Availability::InStock));
        let observations = vec![make_observation("butter", Availability::OutOfStock)];

        let result = calculate_diff(&previous, &observations);
        assert_eq!(result.change_count(), 1);
        assert_eq!(result.changes[0].new, Availability::OutOfStock);
    }

    #[test]
    fn test_first_observation_records_without_change() {
        let previous = HashMap::new();
        let observations = vec![make_observation("butter", Availability::InStock)];

        let result = calculate_diff(&previous, &observations);
        assert!(!result.has_changes());
        assert_eq!(result.new_products, vec!["butter"]);
        assert_eq!(result.state["butter"].status, Availability::InStock);
    }

    #[test]
    fn test_failed_product_keeps_stored_entry() {
        let mut previous = HashMap::new();
        previous.insert("butter".to_string(), make_state(Availability::InStock));
        previous.insert("powder".to_string(), make_state(Availability::OutOfStock));

        // Only butter was reachable this run.
        let observations = vec![make_observation("butter", Availability::InStock)];

        let result = calculate_diff(&previous, &observations);
        assert!(!result.has_changes());
        assert_eq!(result.state.len(), 2);
        assert_eq!(result.state["powder"], previous["powder"]);
    }

    #[test]
    fn test_unknown_to_observed_notifies() {
        let mut previous = HashMap::new();
        previous.insert("butter".to_string(), make_state(Availability::Unknown));
        let observations = vec![make_observation("butter", Availability::InStock)];

        let result = calculate_diff(&previous, &observations);
        assert_eq!(result.change_count(), 1);
        assert_eq!(result.changes[0].old, Availability::Unknown);
    }

    #[test]
    fn test_price_refresh_without_flip_is_silent() {
        let mut previous = HashMap::new();
        previous.insert("butter".to_string(), make_state(Availability::InStock));

        let mut observation = make_observation("butter", Availability::InStock);
        observation.price = Some("₹300".to_string());

        let result = calculate_diff(&previous, &[observation]);
        assert!(!result.has_changes());
        assert_eq!(result.state["butter"].price.as_deref(), Some("₹300"));
    }

    #[test]
    fn test_timestamps_updated_on_flip() {
        let mut previous = HashMap::new();
        let old_state = ProductState {
            status: Availability::OutOfStock,
            price: None,
            last_checked: Utc::now() - chrono::Duration::hours(1),
            last_changed: Utc::now() - chrono::Duration::days(3),
        };
        previous.insert("butter".to_string(), old_state.clone());

        let observation = make_observation("butter", Availability::InStock);
        let result = calculate_diff(&previous, &[observation.clone()]);

        let entry = &result.state["butter"];
        assert_eq!(entry.last_checked, observation.checked_at);
        assert_eq!(entry.last_changed, observation.checked_at);
        assert!(entry.last_changed > old_state.last_changed);
    }
}
