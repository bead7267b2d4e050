//! Account aggregate
//!
//! One account exists per customer or vendor. The `cached_balance` field is
//! advisory only: it exists for fast UI reads and is written exclusively by
//! the consistency validator, never trusted as the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Money};

/// A customer or vendor account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Human-readable name
    pub display_name: String,
    /// Advisory balance cache; never authoritative
    pub cached_balance: Money,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier
    /// * `display_name` - Human-readable name
    pub fn new(id: AccountId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            cached_balance: Money::zero(),
            created_at: Utc::now(),
        }
    }
}
