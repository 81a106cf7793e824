// src/pipeline/status.rs

//! Persisted state report.

use crate::error::Result;
use crate::storage::StateStore;

/// Print the persisted product state without fetching anything.
pub async fn run_status(store: &dyn StateStore) -> Result<()> {
    let state = store.load().await?;

    if state.products.is_empty() {
        println!("No state recorded yet, run a check first");
        return Ok(());
    }

    println!(
        "State as of {}",
        state.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let mut names: Vec<&String> = state.products.keys().collect();
    names.sort();

    for name in names {
        let entry = &state.products[name];
        let price = entry
            .price
            .as_deref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {}: {}{} (last change {})",
            name,
            entry.status,
            price,
            entry.last_changed.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}
