//! Admin login.

use propcalc_core::models::{LoginRequest, LoginResponse, UserSummary};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

const LOGIN_PATH: &str = "api/v1/admin/auth/login";

/// Token and identity of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub token: String,
    pub user: UserSummary,
}

pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token. Does not touch the session.
    ///
    /// A reply without a token is an error. A reply without a user yields
    /// an identity carrying only the username as email.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginSuccess> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.client.post(LOGIN_PATH, &body).await?;

        let Some(token) = resp.token.filter(|t| !t.is_empty()) else {
            warn!(username, "login response carried no token");
            return Err(ApiError::MissingToken);
        };
        let user = resp.user.unwrap_or_else(|| UserSummary {
            id: None,
            email: username.to_string(),
            full_name: None,
            roles: Vec::new(),
        });
        info!(username, "login succeeded");
        Ok(LoginSuccess { token, user })
    }
}
