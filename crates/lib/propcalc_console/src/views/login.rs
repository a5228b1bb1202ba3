//! Login page.

use propcalc_core::validation::{FieldErrors, Rule};

use crate::gate::AuthGate;
use crate::notify::Notifications;
use crate::routes::Route;
use crate::view::{SubmitOutcome, ViewError};

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const NETWORK_ERROR: &str = "Could not reach the server. Please try again later.";

#[derive(Debug, Default)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    pub field_errors: FieldErrors,
    /// Banner shown above the form after a failed attempt.
    pub error: Option<String>,
    pub submitting: bool,
    notifications: Notifications,
}

impl LoginView {
    pub fn new(notifications: Notifications) -> Self {
        Self {
            notifications,
            ..Default::default()
        }
    }

    pub async fn submit(&mut self, gate: &mut AuthGate) -> SubmitOutcome {
        self.error = None;
        self.field_errors = FieldErrors::new();
        self.field_errors
            .check_as("username", &self.username, &[Rule::Required], "Username is required")
            .check_as("password", &self.password, &[Rule::Required], "Password is required");
        if !self.field_errors.is_empty() {
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;
        let result = gate.login(self.username.trim(), &self.password).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                self.notifications.success("Signed in");
                SubmitOutcome::Saved(Route::Home)
            }
            Err(e) => {
                let err = ViewError::from(e);
                if matches!(err, ViewError::Network(_)) {
                    self.error = Some(NETWORK_ERROR.to_string());
                    self.notifications.error(NETWORK_ERROR);
                } else {
                    self.error = Some(INVALID_CREDENTIALS.to_string());
                    self.notifications.error("Login failed");
                }
                SubmitOutcome::Failed(err)
            }
        }
    }
}
