//! Tariff presets: named bundles of clauses with premium amounts.

use serde::{Deserialize, Serialize};

use super::clause::ClauseRef;
use crate::serde_util::f64_or_string;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffPreset {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub tariff_preset_clauses: Vec<TariffPresetClause>,
}

/// One line item of a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffPresetClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub insurance_clause: ClauseRef,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub tariff_amount: f64,
}

/// Create/update body for a preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffPresetPayload {
    pub name: String,
    pub active: bool,
    pub tariff_preset_clauses: Vec<TariffPresetClause>,
}

impl TariffPreset {
    /// Sum of the line item amounts.
    pub fn total_amount(&self) -> f64 {
        self.tariff_preset_clauses
            .iter()
            .map(|c| c.tariff_amount)
            .sum()
    }
}
