//! Promotional discount codes scoped to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::auth::UserId;
use crate::serde_util::f64_or_string;

/// Owner reference sent with a promotional code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoOwner {
    pub id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub discount_percentage: f64,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default, skip_serializing)]
    pub usage_count: u32,
    #[serde(default)]
    pub user: Option<PromoOwner>,
}

impl PromotionalCode {
    /// Active, inside its validity window and under its usage limit at `now`.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if self.valid_from.is_some_and(|from| now < from) {
            return false;
        }
        if self.valid_to.is_some_and(|to| now > to) {
            return false;
        }
        match self.usage_limit {
            Some(limit) => self.usage_count < limit,
            None => true,
        }
    }
}
