//! Insurance clauses.

use serde_json::json;

use propcalc_core::models::{ALWAYS_ACTIVE_CLAUSE_ID, ClauseUpdate, InsuranceClause};

use super::find_in_list;
use crate::client::ApiClient;
use crate::error::ApiResult;

const BASE: &str = "api/v1/insurance-policies/admin/insurance-clauses";

/// `active` as it may be stored for clause `id`.
pub fn effective_active(id: i64, requested: bool) -> bool {
    requested || id == ALWAYS_ACTIVE_CLAUSE_ID
}

pub struct ClauseService<'a> {
    client: &'a ApiClient,
}

impl<'a> ClauseService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All clauses in backend order.
    pub async fn list(&self) -> ApiResult<Vec<InsuranceClause>> {
        self.client.get(BASE).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<InsuranceClause> {
        find_in_list(self.list().await?, id, |c| c.id, "insurance clause")
    }

    /// Full update. Deactivating the always-active clause is silently undone.
    pub async fn update(&self, id: i64, update: &ClauseUpdate) -> ApiResult<InsuranceClause> {
        let mut update = update.clone();
        update.active = effective_active(id, update.active);
        self.client.put(&format!("{BASE}/{id}"), &update).await
    }

    pub async fn set_position(&self, id: i64, position: i32) -> ApiResult<InsuranceClause> {
        self.client
            .put(&format!("{BASE}/{id}"), &json!({ "position": position }))
            .await
    }

    pub async fn set_active(&self, id: i64, active: bool) -> ApiResult<InsuranceClause> {
        let active = effective_active(id, active);
        self.client
            .put(&format!("{BASE}/{id}"), &json!({ "active": active }))
            .await
    }
}
