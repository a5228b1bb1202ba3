//! User management.

use serde::de::IgnoredAny;

use propcalc_core::models::{ManagedUser, UserId, UserPayload};

use crate::client::ApiClient;
use crate::error::ApiResult;

const LIST_PATH: &str = "api/v1/admin/users";
const BASE: &str = "api/v1/admin/user-management";

pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<ManagedUser>> {
        self.client.get(LIST_PATH).await
    }

    pub async fn get(&self, id: &UserId) -> ApiResult<ManagedUser> {
        self.client.get(&format!("{BASE}/{id}")).await
    }

    pub async fn create(&self, payload: &UserPayload) -> ApiResult<ManagedUser> {
        self.client.post(BASE, payload).await
    }

    pub async fn update(&self, id: &UserId, payload: &UserPayload) -> ApiResult<ManagedUser> {
        self.client.put(&format!("{BASE}/{id}"), payload).await
    }

    pub async fn delete(&self, id: &UserId) -> ApiResult<()> {
        let _: IgnoredAny = self.client.delete(&format!("{BASE}/{id}")).await?;
        Ok(())
    }
}
