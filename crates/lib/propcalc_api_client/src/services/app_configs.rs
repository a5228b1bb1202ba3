//! Application configuration values.

use propcalc_core::models::{AppConfig, AppConfigUpdate, ClauseRef, clause::sort_by_position};

use super::find_in_list;
use crate::client::ApiClient;
use crate::error::ApiResult;

const BASE: &str = "api/v1/app-configs/admin";

pub struct AppConfigService<'a> {
    client: &'a ApiClient,
}

impl<'a> AppConfigService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<AppConfig>> {
        self.client.get(BASE).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<AppConfig> {
        find_in_list(self.list().await?, id, |c| c.id, "app config")
    }

    pub async fn update(&self, id: i64, update: &AppConfigUpdate) -> ApiResult<AppConfig> {
        self.client.put(&format!("{BASE}/{id}"), update).await
    }

    /// Clauses a clause-reference config may point at, by position.
    pub async fn clause_options(&self) -> ApiResult<Vec<ClauseRef>> {
        let mut clauses = self.client.clauses().list().await?;
        sort_by_position(&mut clauses);
        Ok(clauses.iter().map(|c| c.to_ref()).collect())
    }
}
