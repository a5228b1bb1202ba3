//! Tariff preset list, create/edit form and read-only preview.

use tracing::{debug, warn};

use propcalc_core::models::{
    ClauseRef, InsuranceClause, TariffPreset, TariffPresetClause, TariffPresetPayload,
};
use propcalc_core::models::clause::sort_by_position;
use propcalc_core::validation::{FieldErrors, Rule, parse_number};

use crate::layout::Layout;
use crate::routes::Route;
use crate::view::{Confirmation, SubmitOutcome, ViewContext, ViewError, ViewScope};

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct TariffPresetListView {
    ctx: ViewContext,
    scope: ViewScope,
    pub presets: Vec<TariffPreset>,
    pub loading: bool,
    pub error: Option<ViewError>,
    pub deleting: bool,
    confirm: Confirmation<TariffPreset>,
}

impl TariffPresetListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            presets: Vec::new(),
            loading: true,
            error: None,
            deleting: false,
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
        let Some(result) = self.scope.run(self.ctx.client.tariff_presets().list()).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(presets) => {
                self.presets = presets;
                self.error = None;
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load tariff presets");
                self.error = Some(err);
            }
        }
    }

    pub fn create_route(&self) -> Route {
        Route::TariffPresetCreate
    }

    pub fn edit_route(&self, id: i64) -> Route {
        Route::TariffPresetEdit(id)
    }

    pub fn preview_route(&self, id: i64) -> Route {
        Route::TariffPresetPreview(id)
    }

    /// Preset awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<&TariffPreset> {
        self.confirm.pending()
    }

    pub fn request_delete(&mut self, preset: TariffPreset) {
        self.confirm.request(preset);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm.cancel();
    }

    pub async fn confirm_delete(&mut self) {
        let Some(preset) = self.confirm.pending().cloned() else {
            return;
        };
        self.deleting = true;
        let Some(result) = self
            .scope
            .run(self.ctx.client.tariff_presets().delete(preset.id))
            .await
        else {
            return;
        };
        self.deleting = false;
        match result {
            Ok(()) => {
                self.confirm.cancel();
                self.ctx
                    .notifications
                    .success("Tariff preset deleted successfully");
                self.load().await;
            }
            Err(e) => self
                .ctx
                .report(&ViewError::from(e), "Failed to delete tariff preset"),
        }
    }
}

// ---------------------------------------------------------------------------
// Create / edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetFormMode {
    Create,
    Edit(i64),
}

/// One clause line of the form. The amount is kept as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetLineDraft {
    /// Set for lines that already exist on the backend.
    pub id: Option<i64>,
    pub clause: ClauseRef,
    pub amount: String,
}

impl PresetLineDraft {
    /// Saved lines keep their clause.
    pub fn clause_editable(&self) -> bool {
        self.id.is_none()
    }
}

impl From<&TariffPresetClause> for PresetLineDraft {
    fn from(line: &TariffPresetClause) -> Self {
        Self {
            id: line.id,
            clause: line.insurance_clause.clone(),
            amount: line.tariff_amount.to_string(),
        }
    }
}

pub struct TariffPresetFormView {
    ctx: ViewContext,
    scope: ViewScope,
    mode: PresetFormMode,
    pub name: String,
    pub active: bool,
    pub lines: Vec<PresetLineDraft>,
    /// Clauses a new line may point at.
    pub available_clauses: Vec<ClauseRef>,
    pub loading: bool,
    pub error: Option<ViewError>,
    pub field_errors: FieldErrors,
    pub submit_error: Option<String>,
    pub saving: bool,
}

impl TariffPresetFormView {
    pub fn new(ctx: ViewContext, mode: PresetFormMode) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            mode,
            name: String::new(),
            active: matches!(mode, PresetFormMode::Create),
            lines: Vec::new(),
            available_clauses: Vec::new(),
            loading: true,
            error: None,
            field_errors: FieldErrors::new(),
            submit_error: None,
            saving: false,
        }
    }

    pub fn mode(&self) -> PresetFormMode {
        self.mode
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Load the preset (edit) and the clause catalogue. A new preset starts
    /// with one line per clause at amount zero.
    pub async fn load(&mut self) {
        self.loading = true;

        if let PresetFormMode::Edit(id) = self.mode {
            let Some(result) = self.scope.run(self.ctx.client.tariff_presets().get(id)).await
            else {
                return;
            };
            match result {
                Ok(preset) => {
                    self.name = preset.name.clone();
                    self.active = preset.active;
                    self.lines = preset
                        .tariff_preset_clauses
                        .iter()
                        .map(PresetLineDraft::from)
                        .collect();
                }
                Err(e) => {
                    self.loading = false;
                    self.error = Some(ViewError::from(e));
                    return;
                }
            }
        }

        let Some(result) = self.scope.run(self.ctx.client.clauses().list()).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(mut clauses) => {
                sort_by_position(&mut clauses);
                self.available_clauses = clauses.iter().map(InsuranceClause::to_ref).collect();
                if self.mode == PresetFormMode::Create {
                    self.lines = self
                        .available_clauses
                        .iter()
                        .map(|clause| PresetLineDraft {
                            id: None,
                            clause: clause.clone(),
                            amount: "0".into(),
                        })
                        .collect();
                }
            }
            Err(e) => self.error = Some(ViewError::from(e)),
        }
    }

    pub fn set_line_amount(&mut self, index: usize, amount: impl Into<String>) {
        if let Some(line) = self.lines.get_mut(index) {
            line.amount = amount.into();
            self.field_errors.clear(&line_field(index));
        }
    }

    /// Point an unsaved line at another clause. Returns `false` when the
    /// line is saved or the clause is unknown.
    pub fn set_line_clause(&mut self, index: usize, clause_id: i64) -> bool {
        let Some(clause) = self.available_clauses.iter().find(|c| c.id == clause_id) else {
            return false;
        };
        match self.lines.get_mut(index) {
            Some(line) if line.clause_editable() => {
                line.clause = clause.clone();
                true
            }
            _ => false,
        }
    }

    /// Sum of the parseable line amounts.
    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .filter_map(|line| parse_number(&line.amount))
            .sum()
    }

    pub fn validate(&mut self) -> bool {
        self.field_errors = FieldErrors::new();
        self.field_errors
            .check_as("name", &self.name, &[Rule::Required], "Name is required");
        for (index, line) in self.lines.iter().enumerate() {
            self.field_errors.check_as(
                &line_field(index),
                &line.amount,
                &[Rule::Required, Rule::Numeric, Rule::Min(0.0)],
                "Amount must be a non-negative number",
            );
        }
        self.field_errors.is_empty()
    }

    pub fn payload(&self) -> TariffPresetPayload {
        TariffPresetPayload {
            name: self.name.trim().to_string(),
            active: self.active,
            tariff_preset_clauses: self
                .lines
                .iter()
                .map(|line| TariffPresetClause {
                    id: line.id,
                    insurance_clause: line.clause.clone(),
                    tariff_amount: parse_number(&line.amount).unwrap_or(0.0),
                })
                .collect(),
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.submit_error = None;
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }
        let payload = self.payload();
        let (success, failure) = match self.mode {
            PresetFormMode::Create => (
                "Tariff preset created successfully",
                "Failed to create tariff preset",
            ),
            PresetFormMode::Edit(_) => (
                "Tariff preset saved successfully",
                "Failed to update tariff preset",
            ),
        };

        self.saving = true;
        debug!(mode = ?self.mode, lines = payload.tariff_preset_clauses.len(), "saving tariff preset");
        let mode = self.mode;
        let presets = self.ctx.client.tariff_presets();
        let request = async {
            match mode {
                PresetFormMode::Create => presets.create(&payload).await,
                PresetFormMode::Edit(id) => presets.update(id, &payload).await,
            }
        };
        let Some(result) = self.scope.run(request).await else {
            return SubmitOutcome::Cancelled;
        };
        self.saving = false;

        match result {
            Ok(saved) => {
                debug!(id = saved.id, name = %saved.name, "tariff preset saved");
                self.ctx.notifications.success(success);
                SubmitOutcome::Saved(Route::TariffPresets)
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, failure);
                if !err.is_session_expired() {
                    self.submit_error = Some(failure.to_string());
                }
                SubmitOutcome::Failed(err)
            }
        }
    }
}

fn line_field(index: usize) -> String {
    format!("lines[{index}].amount")
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// A preset line joined with its clause's tariff number.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLine {
    pub clause_name: String,
    pub tariff_amount: f64,
    /// `None` when the clause is missing from the catalogue.
    pub tariff_number: Option<f64>,
}

pub struct TariffPresetPreviewView {
    ctx: ViewContext,
    scope: ViewScope,
    id: i64,
    pub preset: Option<TariffPreset>,
    pub lines: Vec<PreviewLine>,
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl TariffPresetPreviewView {
    pub fn new(ctx: ViewContext, id: i64) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            id,
            preset: None,
            lines: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self
            .scope
            .run(self.ctx.client.tariff_presets().get(self.id))
            .await
        else {
            return;
        };
        let preset = match result {
            Ok(preset) => preset,
            Err(e) => {
                self.loading = false;
                self.error = Some(ViewError::from(e));
                return;
            }
        };

        let Some(clauses) = self.scope.run(self.ctx.client.clauses().list()).await else {
            return;
        };
        let clauses = clauses.unwrap_or_else(|e| {
            warn!(error = %e, "clause catalogue unavailable, previewing without tariff numbers");
            Vec::new()
        });

        self.lines = preset
            .tariff_preset_clauses
            .iter()
            .map(|line| PreviewLine {
                clause_name: line.insurance_clause.name.clone(),
                tariff_amount: line.tariff_amount,
                tariff_number: clauses
                    .iter()
                    .find(|c| c.id == line.insurance_clause.id)
                    .map(|c| c.tariff_number),
            })
            .collect();
        self.preset = Some(preset);
        self.loading = false;
    }

    pub fn total(&self) -> f64 {
        self.preset.as_ref().map_or(0.0, TariffPreset::total_amount)
    }

    pub fn edit_route(&self) -> Route {
        Route::TariffPresetEdit(self.id)
    }
}
