//! Insurance clause list and edit form.

use tracing::debug;

use propcalc_api_client::services::clauses::effective_active;
use propcalc_core::models::{ALWAYS_ACTIVE_CLAUSE_ID, ClauseUpdate, InsuranceClause};
use propcalc_core::models::clause::sort_by_position;
use propcalc_core::validation::{FieldErrors, Rule, parse_number};

use crate::layout::Layout;
use crate::routes::Route;
use crate::view::{SubmitOutcome, ViewContext, ViewError, ViewScope};

/// Shown next to the locked `active` toggle.
pub const ALWAYS_ACTIVE_NOTICE: &str = "This clause is always active and cannot be deactivated.";

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct ClauseListView {
    ctx: ViewContext,
    scope: ViewScope,
    /// Sorted by `position`.
    pub clauses: Vec<InsuranceClause>,
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl ClauseListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            clauses: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self.scope.run(self.ctx.client.clauses().list()).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(mut clauses) => {
                sort_by_position(&mut clauses);
                self.clauses = clauses;
                self.error = None;
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load insurance clauses");
                self.error = Some(err);
            }
        }
    }

    pub fn layout(&self, width_px: u32) -> Layout {
        Layout::for_width(width_px)
    }

    pub fn edit_route(&self, id: i64) -> Route {
        Route::ClauseEdit(id)
    }

    /// Flip a clause's `active` flag. The always-active clause is refused
    /// with a notice.
    pub async fn toggle_active(&mut self, id: i64) {
        let Some(current) = self.clauses.iter().find(|c| c.id == id).map(|c| c.active) else {
            return;
        };
        if id == ALWAYS_ACTIVE_CLAUSE_ID {
            self.ctx.notifications.info(ALWAYS_ACTIVE_NOTICE);
            return;
        }
        let Some(result) = self
            .scope
            .run(self.ctx.client.clauses().set_active(id, !current))
            .await
        else {
            return;
        };
        match result {
            Ok(clause) => {
                debug!(
                    id = clause.id,
                    active = clause.active,
                    position = clause.position,
                    "clause updated"
                );
                self.load().await
            }
            Err(e) => self
                .ctx
                .report(&ViewError::from(e), "Failed to update insurance clause"),
        }
    }

    pub async fn set_position(&mut self, id: i64, position: i32) {
        let Some(result) = self
            .scope
            .run(self.ctx.client.clauses().set_position(id, position))
            .await
        else {
            return;
        };
        match result {
            Ok(clause) => {
                debug!(
                    id = clause.id,
                    active = clause.active,
                    position = clause.position,
                    "clause updated"
                );
                self.load().await
            }
            Err(e) => self
                .ctx
                .report(&ViewError::from(e), "Failed to update insurance clause"),
        }
    }
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// Editable copy of a clause. Numbers are kept as typed text.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseDraft {
    pub name: String,
    pub tariff_number: String,
    pub has_tariff_number: bool,
    pub tariff_amount: String,
    pub position: String,
    pub active: bool,
}

impl ClauseDraft {
    fn from_clause(clause: &InsuranceClause) -> Self {
        Self {
            name: clause.name.clone(),
            tariff_number: clause.tariff_number.to_string(),
            has_tariff_number: clause.has_tariff_number,
            tariff_amount: clause.tariff_amount.to_string(),
            position: clause.position.to_string(),
            active: effective_active(clause.id, clause.active),
        }
    }
}

pub struct ClauseEditView {
    ctx: ViewContext,
    scope: ViewScope,
    id: i64,
    /// `None` until loaded, and when the clause does not exist.
    pub draft: Option<ClauseDraft>,
    pub loading: bool,
    /// Load failure; blocks the form.
    pub error: Option<ViewError>,
    pub field_errors: FieldErrors,
    pub submit_error: Option<ViewError>,
    pub saving: bool,
}

impl ClauseEditView {
    pub fn new(ctx: ViewContext, id: i64) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            id,
            draft: None,
            loading: true,
            error: None,
            field_errors: FieldErrors::new(),
            submit_error: None,
            saving: false,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self.scope.run(self.ctx.client.clauses().get(self.id)).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(clause) => self.draft = Some(ClauseDraft::from_clause(&clause)),
            Err(e) => self.error = Some(ViewError::from(e)),
        }
    }

    /// The `active` toggle cannot be switched off for this clause.
    pub fn active_locked(&self) -> bool {
        self.id == ALWAYS_ACTIVE_CLAUSE_ID
    }

    pub fn active_notice(&self) -> Option<&'static str> {
        self.active_locked().then_some(ALWAYS_ACTIVE_NOTICE)
    }

    pub fn set_active(&mut self, active: bool) {
        let id = self.id;
        if let Some(draft) = &mut self.draft {
            draft.active = effective_active(id, active);
        }
    }

    /// Switching the tariff number on zeroes the flat amount; switching it
    /// off zeroes the number.
    pub fn set_has_tariff_number(&mut self, on: bool) {
        if let Some(draft) = &mut self.draft {
            draft.has_tariff_number = on;
            if on {
                draft.tariff_amount = "0".into();
            } else {
                draft.tariff_number = "0".into();
            }
        }
    }

    pub fn validate(&mut self) -> bool {
        self.field_errors = FieldErrors::new();
        let Some(draft) = &self.draft else {
            return false;
        };
        self.field_errors
            .check_as("name", &draft.name, &[Rule::Required], "Name is required")
            .check_as(
                "tariff_number",
                &draft.tariff_number,
                &[Rule::Numeric, Rule::Min(0.0)],
                "Tariff number must be a non-negative number",
            )
            .check_as(
                "tariff_amount",
                &draft.tariff_amount,
                &[Rule::Numeric, Rule::Min(0.0)],
                "Tariff amount must be a non-negative number",
            )
            .check_as(
                "position",
                &draft.position,
                &[Rule::Required, Rule::Numeric],
                "Position must be a number",
            );
        self.field_errors.is_empty()
    }

    /// The body that would be sent for the current draft.
    pub fn payload(&self) -> Option<ClauseUpdate> {
        let draft = self.draft.as_ref()?;
        Some(ClauseUpdate {
            name: draft.name.trim().to_string(),
            tariff_number: parse_number(&draft.tariff_number).unwrap_or(0.0),
            has_tariff_number: draft.has_tariff_number,
            tariff_amount: parse_number(&draft.tariff_amount).unwrap_or(0.0),
            position: parse_number(&draft.position).map(|p| p as i32).unwrap_or(0),
            active: effective_active(self.id, draft.active),
        })
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.submit_error = None;
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }
        let Some(payload) = self.payload() else {
            return SubmitOutcome::Invalid;
        };

        self.saving = true;
        debug!(id = self.id, "saving insurance clause");
        let Some(result) = self
            .scope
            .run(self.ctx.client.clauses().update(self.id, &payload))
            .await
        else {
            return SubmitOutcome::Cancelled;
        };
        self.saving = false;

        match result {
            Ok(saved) => {
                debug!(id = saved.id, active = saved.active, "insurance clause saved");
                self.ctx
                    .notifications
                    .success("Insurance clause saved successfully");
                SubmitOutcome::Saved(Route::Clauses)
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to update insurance clause");
                if !err.is_session_expired() {
                    self.submit_error = Some(err.clone());
                }
                SubmitOutcome::Failed(err)
            }
        }
    }
}
