//! One service per backend resource.
//!
//! Services borrow the [`ApiClient`](crate::ApiClient) and return typed
//! records or the client's [`ApiError`](crate::ApiError) unchanged.

pub mod app_configs;
pub mod auth;
pub mod clauses;
pub mod policies;
pub mod profile;
pub mod promo_codes;
pub mod tariff_presets;
pub mod users;

pub use app_configs::AppConfigService;
pub use auth::{AuthService, LoginSuccess};
pub use clauses::ClauseService;
pub use policies::{PolicyFilter, PolicyService, PolicySortField, SortOrder};
pub use profile::ProfileService;
pub use promo_codes::PromoCodeService;
pub use tariff_presets::TariffPresetService;
pub use users::UserService;

use crate::error::{ApiError, ApiResult};

/// Find a record in a list response; the backend has no single-record
/// endpoint for these resources.
pub(crate) fn find_in_list<T>(
    records: Vec<T>,
    id: i64,
    id_of: impl Fn(&T) -> i64,
    what: &str,
) -> ApiResult<T> {
    records
        .into_iter()
        .find(|r| id_of(r) == id)
        .ok_or_else(|| ApiError::NotFound(format!("{what} {id}")))
}
