//! Application configuration values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::serde_util::string_or_number;

/// Configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConfigName {
    Currency,
    DiscountPercents,
    TaxPercents,
    EarthquakeId,
    FloodLt500MId,
    FloodGt500MId,
    /// Any key this console has no dedicated editor for.
    Other(String),
}

impl ConfigName {
    pub fn as_str(&self) -> &str {
        match self {
            ConfigName::Currency => "CURRENCY",
            ConfigName::DiscountPercents => "DISCOUNT_PERCENTS",
            ConfigName::TaxPercents => "TAX_PERCENTS",
            ConfigName::EarthquakeId => "EARTHQUAKE_ID",
            ConfigName::FloodLt500MId => "FLOOD_LT_500_M_ID",
            ConfigName::FloodGt500MId => "FLOOD_GT_500_M_ID",
            ConfigName::Other(name) => name,
        }
    }

    /// Value holds an insurance clause id.
    pub fn references_clause(&self) -> bool {
        matches!(
            self,
            ConfigName::EarthquakeId | ConfigName::FloodLt500MId | ConfigName::FloodGt500MId
        )
    }

    /// Value is a percentage in `0..=100`.
    pub fn is_percentage(&self) -> bool {
        matches!(self, ConfigName::DiscountPercents | ConfigName::TaxPercents)
    }
}

impl From<String> for ConfigName {
    fn from(name: String) -> Self {
        match name.as_str() {
            "CURRENCY" => ConfigName::Currency,
            "DISCOUNT_PERCENTS" => ConfigName::DiscountPercents,
            "TAX_PERCENTS" => ConfigName::TaxPercents,
            "EARTHQUAKE_ID" => ConfigName::EarthquakeId,
            "FLOOD_LT_500_M_ID" => ConfigName::FloodLt500MId,
            "FLOOD_GT_500_M_ID" => ConfigName::FloodGt500MId,
            _ => ConfigName::Other(name),
        }
    }
}

impl From<ConfigName> for String {
    fn from(name: ConfigName) -> Self {
        match name {
            ConfigName::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub id: i64,
    pub name: ConfigName,
    #[serde(default, deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(default)]
    pub name_bg: Option<String>,
}

/// `PUT` body for a config value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigUpdate {
    pub name: ConfigName,
    pub value: String,
    pub name_bg: Option<String>,
}
