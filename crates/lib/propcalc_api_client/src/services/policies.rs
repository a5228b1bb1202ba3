//! Issued insurance policies (read-only).

use serde::Serialize;

use propcalc_core::models::{PolicyDetails, PolicyPage, PolicyStats};

use crate::client::ApiClient;
use crate::error::ApiResult;

const BASE: &str = "api/v1/insurance-policies/admin/policies";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[default]
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Sortable list columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicySortField {
    #[default]
    CreatedAt,
    Code,
    FullName,
    Total,
    Settlement,
}

impl PolicySortField {
    pub const ALL: [PolicySortField; 5] = [
        PolicySortField::CreatedAt,
        PolicySortField::Code,
        PolicySortField::FullName,
        PolicySortField::Total,
        PolicySortField::Settlement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicySortField::CreatedAt => "createdAt",
            PolicySortField::Code => "code",
            PolicySortField::FullName => "fullName",
            PolicySortField::Total => "total",
            PolicySortField::Settlement => "settlement",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PolicySortField::CreatedAt => "Created",
            PolicySortField::Code => "Policy code",
            PolicySortField::FullName => "Insurer name",
            PolicySortField::Total => "Total",
            PolicySortField::Settlement => "Settlement",
        }
    }
}

/// Query for the policy list. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<PolicySortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PolicyFilter {
    /// Copy with blank text parameters and zero paging dropped.
    pub fn normalized(&self) -> Self {
        let text = |v: &Option<String>| {
            v.as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            page: self.page.filter(|p| *p > 0),
            limit: self.limit.filter(|l| *l > 0),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            search: text(&self.search),
            status: text(&self.status),
        }
    }
}

pub struct PolicyService<'a> {
    client: &'a ApiClient,
}

impl<'a> PolicyService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// One page of policies with the server's pagination block.
    pub async fn list(&self, filter: &PolicyFilter) -> ApiResult<PolicyPage> {
        self.client.get_with_query(BASE, &filter.normalized()).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<PolicyDetails> {
        self.client.get(&format!("{BASE}/{id}")).await
    }

    pub async fn stats(&self) -> ApiResult<PolicyStats> {
        self.client.get(&format!("{BASE}/stats")).await
    }
}
