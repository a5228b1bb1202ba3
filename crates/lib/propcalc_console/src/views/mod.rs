//! Per-page view models.
//!
//! Each view owns its draft state and a [`ViewScope`](crate::view::ViewScope);
//! a UI shell renders the public fields and forwards user actions to the
//! methods.

pub mod app_configs;
pub mod clauses;
pub mod login;
pub mod policies;
pub mod profile;
pub mod promo_codes;
pub mod tariff_presets;
pub mod users;

pub use app_configs::{AppConfigEditView, AppConfigListView, ValueEditor};
pub use clauses::{ClauseDraft, ClauseEditView, ClauseListView};
pub use login::LoginView;
pub use policies::{PolicyDetailsView, PolicyListView};
pub use profile::{ProfileDraft, ProfileView};
pub use promo_codes::{PromoCodeForm, PromoDraft, PromoFormMode};
pub use tariff_presets::{
    PresetFormMode, PresetLineDraft, PreviewLine, TariffPresetFormView, TariffPresetListView,
    TariffPresetPreviewView,
};
pub use users::{UserDraft, UserFormMode, UserFormView, UserListView};
