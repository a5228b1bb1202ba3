//! Issued insurance policies: list rows, pagination, statistics and the
//! detail record.

use serde::{Deserialize, Serialize};

use crate::serde_util::{f64_or_string, opt_f64_or_string};

/// A nested lookup value the backend sends either as an object or as a
/// bare label, depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NamedRef {
    Named {
        #[serde(default)]
        id: Option<i64>,
        name: String,
    },
    Label(String),
}

impl NamedRef {
    pub fn name(&self) -> &str {
        match self {
            NamedRef::Named { name, .. } => name,
            NamedRef::Label(label) => label,
        }
    }
}

/// Display name of an optional nested value, `-` when absent.
pub fn name_or_dash(value: Option<&NamedRef>) -> &str {
    value.map(NamedRef::name).unwrap_or("-")
}

/// One row of the paginated policy list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub settlement: Option<NamedRef>,
    #[serde(default)]
    pub estate_type: Option<NamedRef>,
    #[serde(default)]
    pub tariff_preset: Option<NamedRef>,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub total: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Pagination block returned next to a policy page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            items_per_page: 10,
            has_next_page: false,
            has_previous_page: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyPage {
    pub policies: Vec<PolicySummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStats {
    #[serde(default)]
    pub total_policies: u64,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub total_amount: f64,
    #[serde(default)]
    pub today_policies: u64,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub today_amount: f64,
}

/// A clause line on an issued policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyClause {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub tariff_number: Option<f64>,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub tariff_amount: f64,
}

/// Yes/no answer from the property checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCodeRef {
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Any other value the backend sends.
    #[serde(other)]
    Other,
}

impl Gender {
    /// Anything that is not `male` is shown as female.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female | Gender::Other => "Female",
        }
    }
}

/// Full policy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDetails {
    pub id: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub tariff_preset: Option<NamedRef>,
    #[serde(default)]
    pub tariff_preset_name: Option<String>,
    #[serde(default)]
    pub promotional_code: Option<PromoCodeRef>,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub promotional_code_discount: Option<f64>,
    #[serde(default)]
    pub insurance_policy_clauses: Vec<PolicyClause>,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub discount: f64,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub subtotal_tax: f64,
    #[serde(default, deserialize_with = "f64_or_string")]
    pub total: f64,

    // Property
    #[serde(default)]
    pub settlement: Option<NamedRef>,
    #[serde(default)]
    pub property_address: Option<String>,
    #[serde(default)]
    pub estate_type: Option<NamedRef>,
    #[serde(default)]
    pub estate_subtype: Option<NamedRef>,
    #[serde(default)]
    pub distance_to_water: Option<NamedRef>,
    #[serde(default, deserialize_with = "opt_f64_or_string")]
    pub area_sq_meters: Option<f64>,
    #[serde(default)]
    pub property_checklist_items: Vec<ChecklistItem>,
    #[serde(default)]
    pub property_owner_name: Option<String>,
    #[serde(default)]
    pub property_owner_id_number: Option<String>,

    // Insurer
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub id_number_type: Option<NamedRef>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub permanent_address: Option<String>,
    #[serde(default)]
    pub insurer_settlement: Option<NamedRef>,
    #[serde(default)]
    pub insurer_nationality: Option<NamedRef>,
    #[serde(default)]
    pub person_role: Option<NamedRef>,
}

impl PolicyDetails {
    /// Preset label: nested preset, then the denormalized name, else `None`
    /// for a custom clause selection.
    pub fn preset_label(&self) -> Option<&str> {
        self.tariff_preset
            .as_ref()
            .map(NamedRef::name)
            .or(self.tariff_preset_name.as_deref())
    }

    /// Whether the property owner differs from the insurer and is recorded.
    pub fn has_separate_owner(&self) -> bool {
        self.property_owner_name.is_some() || self.property_owner_id_number.is_some()
    }
}
