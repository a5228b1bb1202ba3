//! Promotional codes, managed per user.

use serde::de::IgnoredAny;

use propcalc_core::models::{PromotionalCode, UserId};

use crate::client::ApiClient;
use crate::error::ApiResult;

const BASE: &str = "api/v1/admin/promotional-codes";

pub struct PromoCodeService<'a> {
    client: &'a ApiClient,
}

impl<'a> PromoCodeService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_for_user(&self, user_id: &UserId) -> ApiResult<Vec<PromotionalCode>> {
        self.client.get(&format!("{BASE}/user/{user_id}")).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<PromotionalCode> {
        self.client.get(&format!("{BASE}/{id}")).await
    }

    pub async fn create(&self, code: &PromotionalCode) -> ApiResult<PromotionalCode> {
        self.client.post(BASE, code).await
    }

    pub async fn update(&self, id: i64, code: &PromotionalCode) -> ApiResult<PromotionalCode> {
        self.client.put(&format!("{BASE}/{id}"), code).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let _: IgnoredAny = self.client.delete(&format!("{BASE}/{id}")).await?;
        Ok(())
    }
}
