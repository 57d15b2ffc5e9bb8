//! Profile model
//!
//! One row per user in the `profiles` table, holding the monthly savings goal.

use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::money::Money;

/// Goal written into a fresh profile at sign-up
pub const DEFAULT_SAVINGS_GOAL: Money = Money::from_units(5000);

/// A user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same value as the auth user's id
    pub id: UserId,

    /// Display name chosen at sign-up
    #[serde(default)]
    pub username: String,

    /// Monthly budget ceiling
    pub savings_goal: Money,
}

impl Profile {
    /// Create a new profile
    pub fn new(id: UserId, username: impl Into<String>, savings_goal: Money) -> Self {
        Self {
            id,
            username: username.into(),
            savings_goal,
        }
    }
}
