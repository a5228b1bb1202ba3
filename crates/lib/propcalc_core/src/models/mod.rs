//! Resource records exchanged with the admin backend.
//!
//! Field names follow the backend wire format: clause and tariff records are
//! snake_case, everything else camelCase.

pub mod app_config;
pub mod auth;
pub mod clause;
pub mod policy;
pub mod promo;
pub mod tariff;
pub mod user;

pub use app_config::{AppConfig, AppConfigUpdate, ConfigName};
pub use auth::{LoginRequest, LoginResponse, MessageResponse, UserId, UserSummary};
pub use clause::{ALWAYS_ACTIVE_CLAUSE_ID, ClauseRef, ClauseUpdate, InsuranceClause};
pub use policy::{
    ChecklistItem, Gender, NamedRef, Pagination, PolicyClause, PolicyDetails, PolicyPage,
    PolicyStats, PolicySummary, PromoCodeRef,
};
pub use promo::{PromoOwner, PromotionalCode};
pub use tariff::{TariffPreset, TariffPresetClause, TariffPresetPayload};
pub use user::{
    ManagedUser, Profile, ProfileIdentity, ProfileUpdate, ProfileUpdateResponse, UserPayload,
};
