//! Insurance clause records.

use serde::{Deserialize, Serialize};

use crate::serde_util::f64_or_string;

/// The clause that can never be deactivated.
pub const ALWAYS_ACTIVE_CLAUSE_ID: i64 = 1;

/// A named insurable risk line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceClause {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub tariff_number: f64,
    #[serde(default)]
    pub has_tariff_number: bool,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub tariff_amount: f64,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub active: bool,
}

impl InsuranceClause {
    pub fn is_always_active(&self) -> bool {
        self.id == ALWAYS_ACTIVE_CLAUSE_ID
    }

    pub fn to_ref(&self) -> ClauseRef {
        ClauseRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// `PUT` body for a clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseUpdate {
    pub name: String,
    pub tariff_number: f64,
    pub has_tariff_number: bool,
    pub tariff_amount: f64,
    pub position: i32,
    pub active: bool,
}

/// Minimal clause reference embedded in presets and option lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Order clauses by their `position` field.
pub fn sort_by_position(clauses: &mut [InsuranceClause]) {
    clauses.sort_by_key(|c| c.position);
}
