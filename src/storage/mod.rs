//! State persistence for tracked products.
//!
//! The state file is a single JSON document mapping product name to its
//! last-known status. It is read once at process start and replaced once at
//! process end; entries are created on first observation and never deleted.

pub mod local;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ProductState;

// Re-export for convenience
pub use local::LocalStateStore;

/// Root document of the state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateData {
    /// ISO 8601 timestamp of last update
    pub updated_at: DateTime<Utc>,
    /// Product name to last-known state
    pub products: HashMap<String, ProductState>,
}

impl StateData {
    pub fn new(products: HashMap<String, ProductState>) -> Self {
        Self {
            updated_at: Utc::now(),
            products,
        }
    }

    /// State for a first run, before anything was observed.
    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }
}

/// Trait for state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the previous state, or an empty state when none exists yet.
    async fn load(&self) -> Result<StateData>;

    /// Persist the updated state atomically.
    async fn save(&self, state: &StateData) -> Result<()>;
}
