//! Tariff presets.

use serde::de::IgnoredAny;

use propcalc_core::models::{TariffPreset, TariffPresetPayload};

use super::find_in_list;
use crate::client::ApiClient;
use crate::error::ApiResult;

const BASE: &str = "api/v1/insurance-policies/admin/tariff-presets";

pub struct TariffPresetService<'a> {
    client: &'a ApiClient,
}

impl<'a> TariffPresetService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<TariffPreset>> {
        self.client.get(BASE).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<TariffPreset> {
        find_in_list(self.list().await?, id, |p| p.id, "tariff preset")
    }

    /// Returns the stored preset as echoed by the backend.
    pub async fn create(&self, payload: &TariffPresetPayload) -> ApiResult<TariffPreset> {
        self.client.post(BASE, payload).await
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &TariffPresetPayload,
    ) -> ApiResult<TariffPreset> {
        self.client.put(&format!("{BASE}/{id}"), payload).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let _: IgnoredAny = self.client.delete(&format!("{BASE}/{id}")).await?;
        Ok(())
    }
}
