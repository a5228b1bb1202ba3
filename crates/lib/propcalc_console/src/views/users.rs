//! User management: list with guarded delete, and the create/edit form with
//! the user's promotional codes managed inline.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use propcalc_core::models::{ManagedUser, PromotionalCode, UserId, UserPayload};
use propcalc_core::roles::{Capability, Role, badge_roles, toggle_role};
use propcalc_core::validation::{FieldErrors, Rule};

use crate::layout::Layout;
use crate::routes::Route;
use crate::view::{Confirmation, SubmitOutcome, ViewContext, ViewError, ViewScope};
use crate::views::promo_codes::{PromoCodeForm, PromoFormMode};

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct UserListView {
    ctx: ViewContext,
    scope: ViewScope,
    pub users: Vec<ManagedUser>,
    pub loading: bool,
    pub error: Option<ViewError>,
    confirm: Confirmation<ManagedUser>,
}

impl UserListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            users: Vec::new(),
            loading: true,
            error: None,
            confirm: Confirmation::default(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn layout(&self, width_px: u32) -> Layout {
        Layout::for_width(width_px)
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self.scope.run(self.ctx.client.users().list()).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(users) => {
                self.users = users;
                self.error = None;
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load users");
                self.error = Some(err);
            }
        }
    }

    /// Role badges for a row.
    pub fn badges(&self, user: &ManagedUser) -> Vec<Role> {
        badge_roles(&user.roles)
    }

    pub fn create_route(&self) -> Route {
        Route::UserCreate
    }

    pub fn edit_route(&self, user: &ManagedUser) -> Option<Route> {
        user.id.clone().map(Route::UserEdit)
    }

    fn is_self(&self, user: &ManagedUser) -> bool {
        self.ctx
            .current_user()
            .is_some_and(|me| me.is_same_account(user.id.as_ref(), &user.email))
    }

    pub fn pending_delete(&self) -> Option<&ManagedUser> {
        self.confirm.pending()
    }

    /// Open the delete confirmation. Refused for the signed-in account.
    pub fn request_delete(&mut self, user: &ManagedUser) -> bool {
        if self.is_self(user) {
            self.ctx.report(&ViewError::SelfDelete, "");
            return false;
        }
        self.confirm.request(user.clone());
        true
    }

    pub fn cancel_delete(&mut self) {
        self.confirm.cancel();
    }

    pub async fn confirm_delete(&mut self) {
        let Some(user) = self.confirm.pending().cloned() else {
            return;
        };
        // The session may have changed since the dialog opened.
        if self.is_self(&user) {
            self.confirm.cancel();
            self.ctx.report(&ViewError::SelfDelete, "");
            return;
        }
        let Some(id) = user.id.clone() else {
            self.confirm.cancel();
            warn!(email = %user.email, "cannot delete a user without an id");
            return;
        };

        let Some(result) = self.scope.run(self.ctx.client.users().delete(&id)).await else {
            return;
        };
        match result {
            Ok(()) => {
                self.confirm.cancel();
                self.ctx.notifications.success("User deleted successfully");
                self.load().await;
            }
            Err(e) => self
                .ctx
                .report(&ViewError::from(e), "Failed to delete user"),
        }
    }
}

// ---------------------------------------------------------------------------
// Create / edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFormMode {
    Create,
    Edit(UserId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// On edit, blank keeps the current password.
    pub password: String,
    pub roles: Vec<Role>,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: String::new(),
            roles: vec![Role::Agent],
        }
    }
}

impl From<&ManagedUser> for UserDraft {
    fn from(user: &ManagedUser) -> Self {
        Self {
            email: user.email.clone(),
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            password: String::new(),
            roles: user.roles.clone(),
        }
    }
}

pub struct UserFormView {
    ctx: ViewContext,
    scope: ViewScope,
    mode: UserFormMode,
    pub draft: UserDraft,
    pub loading: bool,
    pub error: Option<ViewError>,
    pub field_errors: FieldErrors,
    pub submit_error: Option<String>,
    pub saving: bool,

    pub promo_codes: Vec<PromotionalCode>,
    pub loading_codes: bool,
    /// Open promotional code dialog.
    pub code_form: Option<PromoCodeForm>,
    code_delete: Confirmation<PromotionalCode>,
}

impl UserFormView {
    pub fn new(ctx: ViewContext, mode: UserFormMode) -> Self {
        let loading = matches!(mode, UserFormMode::Edit(_));
        Self {
            ctx,
            scope: ViewScope::new(),
            mode,
            draft: UserDraft::default(),
            loading,
            error: None,
            field_errors: FieldErrors::new(),
            submit_error: None,
            saving: false,
            promo_codes: Vec::new(),
            loading_codes: false,
            code_form: None,
            code_delete: Confirmation::default(),
        }
    }

    pub fn mode(&self) -> &UserFormMode {
        &self.mode
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Roles offered as checkboxes.
    pub fn assignable_roles(&self) -> [Role; 3] {
        Role::ASSIGNABLE
    }

    /// Load the user and their codes. Nothing to load on create.
    pub async fn load(&mut self) {
        let UserFormMode::Edit(id) = self.mode.clone() else {
            self.loading = false;
            return;
        };
        let Some(result) = self.scope.run(self.ctx.client.users().get(&id)).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(user) => self.draft = UserDraft::from(&user),
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load user");
                self.error = Some(err);
                return;
            }
        }
        self.load_codes().await;
    }

    pub async fn load_codes(&mut self) {
        let UserFormMode::Edit(id) = self.mode.clone() else {
            return;
        };
        self.loading_codes = true;
        let Some(result) = self
            .scope
            .run(self.ctx.client.promo_codes().list_for_user(&id))
            .await
        else {
            return;
        };
        self.loading_codes = false;
        match result {
            Ok(codes) => self.promo_codes = codes,
            Err(e) => self.ctx.report(
                &ViewError::from(e),
                "Failed to load promotional codes",
            ),
        }
    }

    pub fn toggle_role(&mut self, role: Role) {
        if role.has(Capability::Assignable) {
            toggle_role(&mut self.draft.roles, role);
        }
    }

    pub fn validate(&mut self) -> bool {
        self.field_errors = FieldErrors::new();
        self.field_errors
            .check_as("email", &self.draft.email, &[Rule::Required], "Email is required")
            .check_as("email", &self.draft.email, &[Rule::Email], "Invalid email");
        if self.mode == UserFormMode::Create {
            self.field_errors.check_as(
                "password",
                &self.draft.password,
                &[Rule::Required],
                "Password is required",
            );
        }
        self.field_errors.is_empty()
    }

    pub fn payload(&self) -> UserPayload {
        let password = Some(self.draft.password.clone()).filter(|p| !p.is_empty());
        UserPayload {
            email: self.draft.email.trim().to_string(),
            first_name: self.draft.first_name.trim().to_string(),
            last_name: self.draft.last_name.trim().to_string(),
            password,
            roles: self.draft.roles.clone(),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.submit_error = None;
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }
        let payload = self.payload();
        let (success, failure) = match self.mode {
            UserFormMode::Create => ("User created successfully", "Failed to create user"),
            UserFormMode::Edit(_) => ("User updated successfully", "Failed to update user"),
        };

        self.saving = true;
        debug!(email = %payload.email, roles = payload.roles.len(), "saving user");
        let mode = self.mode.clone();
        let users = self.ctx.client.users();
        let request = async {
            match &mode {
                UserFormMode::Create => users.create(&payload).await,
                UserFormMode::Edit(id) => users.update(id, &payload).await,
            }
        };
        let Some(result) = self.scope.run(request).await else {
            return SubmitOutcome::Cancelled;
        };
        self.saving = false;

        match result {
            Ok(saved) => {
                debug!(id = ?saved.id, email = %saved.email, "user saved");
                self.draft.password.clear();
                self.ctx.notifications.success(success);
                SubmitOutcome::Saved(Route::Users)
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, failure);
                if let Some(toast) = err.toast_message(failure) {
                    self.submit_error = Some(toast);
                }
                SubmitOutcome::Failed(err)
            }
        }
    }

    // -- promotional codes --------------------------------------------------

    fn owner(&self) -> Option<UserId> {
        match &self.mode {
            UserFormMode::Edit(id) => Some(id.clone()),
            UserFormMode::Create => None,
        }
    }

    /// Codes belong to saved users only.
    pub fn open_create_code(&mut self, now: DateTime<Utc>) {
        if let Some(owner) = self.owner() {
            self.code_form = Some(PromoCodeForm::create(owner, now));
        }
    }

    pub fn open_edit_code(&mut self, code: &PromotionalCode) {
        if let Some(owner) = self.owner() {
            self.code_form = Some(PromoCodeForm::edit(owner, code));
        }
    }

    pub fn open_view_code(&mut self, code: &PromotionalCode) {
        if let Some(owner) = self.owner() {
            self.code_form = Some(PromoCodeForm::view(owner, code));
        }
    }

    pub fn close_code_form(&mut self) {
        self.code_form = None;
    }

    /// Save the open code form. The form closes on success and stays open
    /// with the backend's messages on failure.
    pub async fn save_code_form(&mut self) -> bool {
        let Some(form) = self.code_form.as_mut() else {
            return false;
        };
        if form.is_read_only() || !form.validate() {
            return false;
        }
        form.saving = true;
        let mode = form.mode();
        let payload = form.to_payload();

        let promos = self.ctx.client.promo_codes();
        let request = async {
            match (mode, payload.id) {
                (PromoFormMode::Edit, Some(id)) => promos.update(id, &payload).await,
                _ => promos.create(&payload).await,
            }
        };
        let Some(result) = self.scope.run(request).await else {
            return false;
        };

        match result {
            Ok(saved) => {
                debug!(id = ?saved.id, code = %saved.code, "promotional code saved");
                let message = match mode {
                    PromoFormMode::Create => "Promotional code created successfully",
                    _ => "Promotional code updated successfully",
                };
                self.ctx.notifications.success(message);
                self.code_form = None;
                self.load_codes().await;
                true
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to save promotional code");
                if let Some(form) = self.code_form.as_mut() {
                    form.apply_error(&err);
                }
                false
            }
        }
    }

    pub fn pending_code_delete(&self) -> Option<&PromotionalCode> {
        self.code_delete.pending()
    }

    pub fn request_delete_code(&mut self, code: &PromotionalCode) {
        self.code_delete.request(code.clone());
    }

    pub fn cancel_delete_code(&mut self) {
        self.code_delete.cancel();
    }

    pub async fn confirm_delete_code(&mut self) {
        let Some(id) = self.code_delete.pending().and_then(|c| c.id) else {
            self.code_delete.cancel();
            return;
        };
        let Some(result) = self.scope.run(self.ctx.client.promo_codes().delete(id)).await else {
            return;
        };
        match result {
            Ok(()) => {
                self.code_delete.cancel();
                self.ctx
                    .notifications
                    .success("Promotional code deleted successfully");
                self.load_codes().await;
            }
            Err(e) => self.ctx.report(
                &ViewError::from(e),
                "Failed to delete promotional code",
            ),
        }
    }
}
