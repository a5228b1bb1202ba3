//! The signed-in user's own profile.

use tracing::warn;

use propcalc_core::models::{Profile, ProfileUpdate, ProfileUpdateResponse};

use crate::client::ApiClient;
use crate::error::ApiResult;

const PATH: &str = "api/v1/admin/profile";

pub struct ProfileService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProfileService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> ApiResult<Profile> {
        self.client.get(PATH).await
    }

    /// Save the profile. When the reply echoes the user, the cached session
    /// identity is updated to match.
    pub async fn update(&self, update: &ProfileUpdate) -> ApiResult<ProfileUpdateResponse> {
        let resp: Option<ProfileUpdateResponse> = self.client.put(PATH, update).await?;
        let resp = resp.unwrap_or(ProfileUpdateResponse {
            message: None,
            user: None,
        });
        if let Some(user) = &resp.user
            && let Err(e) = self
                .client
                .session()
                .update_identity(&user.email, user.full_name.as_deref())
        {
            warn!(error = %e, "failed to update cached identity");
        }
        Ok(resp)
    }
}
