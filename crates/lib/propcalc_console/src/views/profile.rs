//! The signed-in user's own profile.

use tracing::info;

use propcalc_core::models::{Profile, ProfileUpdate};
use propcalc_core::validation::{FieldErrors, Rule};

use crate::routes::Route;
use crate::view::{SubmitOutcome, ViewContext, ViewError, ViewScope};

pub const MIN_PASSWORD_LEN: usize = 6;

const UPDATE_FAILED: &str = "Failed to update the profile. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Blank keeps the current password.
    pub password: String,
    pub confirm_password: String,
}

impl From<Profile> for ProfileDraft {
    fn from(profile: Profile) -> Self {
        Self {
            first_name: profile.first_name.unwrap_or_default(),
            last_name: profile.last_name.unwrap_or_default(),
            email: profile.email,
            ..Default::default()
        }
    }
}

pub struct ProfileView {
    ctx: ViewContext,
    scope: ViewScope,
    draft: ProfileDraft,
    pub loading: bool,
    pub saving: bool,
    pub field_errors: FieldErrors,
    /// Load or save failure banner.
    pub error: Option<String>,
    /// Banner after a successful save.
    pub success: Option<String>,
}

impl ProfileView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            draft: ProfileDraft::default(),
            loading: true,
            saving: false,
            field_errors: FieldErrors::new(),
            error: None,
            success: None,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self.scope.run(self.ctx.client.profile().get()).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(profile) => self.draft = ProfileDraft::from(profile),
            Err(e) => {
                let err = ViewError::from(e);
                if !err.is_session_expired() {
                    self.error =
                        Some("Failed to load the profile. Please try again.".to_string());
                }
            }
        }
    }

    // Editing a field clears its error.

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.draft.first_name = value.into();
        self.field_errors.clear("first_name");
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.draft.last_name = value.into();
        self.field_errors.clear("last_name");
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.draft.email = value.into();
        self.field_errors.clear("email");
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.draft.password = value.into();
        self.field_errors.clear("password");
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.draft.confirm_password = value.into();
        self.field_errors.clear("confirm_password");
    }

    pub fn validate(&mut self) -> bool {
        self.field_errors = FieldErrors::new();
        let d = &self.draft;
        if d.email.is_empty() {
            self.field_errors.add("email", "Email is required");
        } else {
            self.field_errors
                .check_as("email", &d.email, &[Rule::Email], "Invalid email");
        }
        if !d.password.is_empty() {
            self.field_errors
                .check_as(
                    "password",
                    &d.password,
                    &[Rule::MinLength(MIN_PASSWORD_LEN)],
                    "Password must be at least 6 characters",
                )
                .check_as(
                    "confirm_password",
                    &d.confirm_password,
                    &[Rule::Equals(d.password.clone())],
                    "Passwords do not match",
                );
        }
        self.field_errors.is_empty()
    }

    pub fn payload(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.draft.first_name.clone(),
            last_name: self.draft.last_name.clone(),
            email: self.draft.email.clone(),
            password: Some(self.draft.password.clone()).filter(|p| !p.is_empty()),
        }
    }

    /// Save the profile. The profile service writes the returned identity
    /// back into the session.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.error = None;
        self.success = None;
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }
        let update = self.payload();

        self.saving = true;
        let Some(result) = self.scope.run(self.ctx.client.profile().update(&update)).await
        else {
            return SubmitOutcome::Cancelled;
        };
        self.saving = false;

        match result {
            Ok(resp) => {
                self.draft.password.clear();
                self.draft.confirm_password.clear();
                let message = resp
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Profile updated successfully".to_string());
                info!(email = %update.email, "profile updated");
                self.ctx.notifications.success(message.clone());
                self.success = Some(message);
                SubmitOutcome::Saved(Route::Profile)
            }
            Err(e) => {
                let err = ViewError::from(e);
                if !err.is_session_expired() {
                    let message = err
                        .messages()
                        .first()
                        .cloned()
                        .unwrap_or_else(|| UPDATE_FAILED.to_string());
                    self.error = Some(message);
                }
                SubmitOutcome::Failed(err)
            }
        }
    }
}
