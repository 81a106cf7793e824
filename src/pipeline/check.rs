// src/pipeline/check.rs

//! The scrape-diff-notify cycle.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::notify::{self, Notifier};
use crate::pipeline::diff::calculate_diff;
use crate::services::AvailabilityChecker;
use crate::storage::{StateData, StateStore};
use crate::utils::log::RunLog;

/// Run one full check cycle: fetch, diff, notify, persist.
pub async fn run_check(
    config: &Arc<Config>,
    store: &dyn StateStore,
    notifiers: &[Box<dyn Notifier>],
) -> Result<()> {
    config.validate()?;

    let run_log = RunLog::new(&config.logging.run_log);
    log::info!(
        "Starting product check ({} products, {} channels)",
        config.products.len(),
        notifiers.len()
    );

    let previous = store.load().await?;

    let checker = AvailabilityChecker::new(Arc::clone(config))?;
    let outcome = checker.check_all().await?;

    if outcome.observations.is_empty() && outcome.failures > 0 {
        run_log.line(&format!(
            "run failed: all {} product checks failed",
            outcome.product_total
        ))?;
        return Err(AppError::check(
            "run",
            format!("all {} product checks failed", outcome.product_total),
        ));
    }

    let diff = calculate_diff(&previous.products, &outcome.observations);

    for name in &diff.new_products {
        log::info!("First observation for {}, recorded without notification", name);
    }

    let mut sent = 0;
    for change in &diff.changes {
        log::info!(
            "Status changed for {}: {} -> {}",
            change.name,
            change.old,
            change.new
        );
        run_log.line(&format!(
            "status change: {} {} -> {}",
            change.name, change.old, change.new
        ))?;
        sent += notify::dispatch(notifiers, change).await;
    }

    let has_changes = diff.has_changes();
    let change_count = diff.change_count();

    store.save(&StateData::new(diff.state)).await?;

    if has_changes {
        log::info!(
            "Sent {} notifications for {} status changes",
            sent,
            change_count
        );
    } else {
        log::info!("No status changes detected");
    }

    run_log.line(&format!(
        "checked {} products ({} failures), {} changes, {} notifications sent",
        outcome.product_total,
        outcome.failures,
        change_count,
        sent
    ))?;

    Ok(())
}
