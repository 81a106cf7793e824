// src/pipeline/validate.rs

//! Configuration validation report.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::notify;

/// Load the configuration strictly and print the resolved settings.
pub fn run_validate(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.validate()?;

    println!("Configuration OK: {}", config_path.display());
    println!("  user_agent: {}", config.monitor.user_agent);
    println!("  timeout_secs: {}", config.monitor.timeout_secs);
    println!("  request_delay_ms: {}", config.monitor.request_delay_ms);
    println!("  state_file: {}", config.storage.state_file);
    println!("  run_log: {}", config.logging.run_log);
    println!("  products: {}", config.products.len());
    for product in &config.products {
        println!("    - {} ({})", product.name, product.url);
    }

    let channels = notify::configured_channels();
    if channels.is_empty() {
        println!("  channels: none configured (set Telegram or email credentials)");
    } else {
        println!("  channels: {}", channels.join(", "));
    }

    Ok(())
}
