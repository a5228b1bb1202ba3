//! Application configuration list and value editor.

use tracing::debug;

use propcalc_core::models::{AppConfig, AppConfigUpdate, ClauseRef, ConfigName};
use propcalc_core::validation::{FieldErrors, Rule};

use crate::layout::Layout;
use crate::routes::Route;
use crate::view::{SubmitOutcome, ViewContext, ViewError, ViewScope};

/// Currency symbols offered for `CURRENCY`.
pub const CURRENCIES: [&str; 2] = ["лв.", "€"];

const UPDATE_FAILED: &str = "Failed to update configuration";

/// Label for a config: its localized name when present.
pub fn display_name(config: &AppConfig) -> &str {
    config
        .name_bg
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(config.name.as_str())
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

pub struct AppConfigListView {
    ctx: ViewContext,
    scope: ViewScope,
    /// Clause-reference configs are left out.
    pub configs: Vec<AppConfig>,
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl AppConfigListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            configs: Vec::new(),
            loading: true,
            error: None,
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
        let Some(result) = self.scope.run(self.ctx.client.app_configs().list()).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(configs) => {
                self.configs = configs
                    .into_iter()
                    .filter(|c| !c.name.references_clause())
                    .collect();
                self.error = None;
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load configurations");
                self.error = Some(err);
            }
        }
    }

    pub fn edit_route(&self, id: i64) -> Route {
        Route::AppConfigEdit(id)
    }
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// Input shown for a config value, chosen by its name.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueEditor {
    /// One of [`CURRENCIES`].
    CurrencyChoice(Vec<&'static str>),
    /// Number in `0..=100`.
    Percentage,
    /// Clause id picked from the catalogue.
    ClauseSelect(Vec<ClauseRef>),
    Text,
}

impl ValueEditor {
    fn for_name(name: &ConfigName, clauses: Vec<ClauseRef>) -> Self {
        if *name == ConfigName::Currency {
            ValueEditor::CurrencyChoice(CURRENCIES.to_vec())
        } else if name.is_percentage() {
            ValueEditor::Percentage
        } else if name.references_clause() {
            ValueEditor::ClauseSelect(clauses)
        } else {
            ValueEditor::Text
        }
    }
}

pub struct AppConfigEditView {
    ctx: ViewContext,
    scope: ViewScope,
    id: i64,
    pub config: Option<AppConfig>,
    /// Draft of the value; the name is read-only.
    pub value: String,
    pub editor: ValueEditor,
    pub loading: bool,
    pub error: Option<ViewError>,
    pub field_errors: FieldErrors,
    pub submit_error: Option<String>,
    pub saving: bool,
}

impl AppConfigEditView {
    pub fn new(ctx: ViewContext, id: i64) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            id,
            config: None,
            value: String::new(),
            editor: ValueEditor::Text,
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

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self.scope.run(self.ctx.client.app_configs().get(self.id)).await else {
            return;
        };
        let config = match result {
            Ok(config) => config,
            Err(e) => {
                self.loading = false;
                self.error = Some(ViewError::from(e));
                return;
            }
        };

        let mut clauses = Vec::new();
        if config.name.references_clause() {
            let Some(result) = self
                .scope
                .run(self.ctx.client.app_configs().clause_options())
                .await
            else {
                return;
            };
            match result {
                Ok(options) => clauses = options,
                Err(e) => {
                    self.loading = false;
                    self.error = Some(ViewError::from(e));
                    return;
                }
            }
        }

        self.editor = ValueEditor::for_name(&config.name, clauses);
        self.value = config.value.clone();
        self.config = Some(config);
        self.loading = false;
    }

    /// Field label: the localized name, or a generic one per editor.
    pub fn label(&self) -> &str {
        if let Some(name) = self.config.as_ref().and_then(|c| c.name_bg.as_deref()) {
            if !name.is_empty() {
                return name;
            }
        }
        match self.editor {
            ValueEditor::CurrencyChoice(_) => "Currency",
            ValueEditor::Percentage => "Percentage",
            ValueEditor::ClauseSelect(_) => "Clause",
            ValueEditor::Text => "Value",
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.field_errors.clear("value");
    }

    pub fn validate(&mut self) -> bool {
        self.field_errors = FieldErrors::new();
        self.field_errors
            .check_as("value", &self.value, &[Rule::Required], "Value is required");
        if self.field_errors.has("value") {
            return false;
        }
        match &self.editor {
            ValueEditor::CurrencyChoice(options) => {
                if !options.contains(&self.value.as_str()) {
                    self.field_errors.add("value", "Unsupported currency");
                }
            }
            ValueEditor::Percentage => {
                self.field_errors.check_as(
                    "value",
                    &self.value,
                    &[Rule::Numeric, Rule::Min(0.0), Rule::Max(100.0)],
                    "Value must be between 0 and 100",
                );
            }
            ValueEditor::ClauseSelect(options) => {
                if !options.iter().any(|c| c.id.to_string() == self.value) {
                    self.field_errors.add("value", "Select an insurance clause");
                }
            }
            ValueEditor::Text => {}
        }
        self.field_errors.is_empty()
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.submit_error = None;
        if !self.validate() {
            return SubmitOutcome::Invalid;
        }
        let Some(config) = &self.config else {
            return SubmitOutcome::Invalid;
        };
        let update = AppConfigUpdate {
            name: config.name.clone(),
            value: self.value.trim().to_string(),
            name_bg: config.name_bg.clone(),
        };

        self.saving = true;
        let Some(result) = self
            .scope
            .run(self.ctx.client.app_configs().update(self.id, &update))
            .await
        else {
            return SubmitOutcome::Cancelled;
        };
        self.saving = false;

        match result {
            Ok(saved) => {
                debug!(id = saved.id, name = %saved.name, "configuration saved");
                self.ctx
                    .notifications
                    .success("Configuration saved successfully");
                SubmitOutcome::Saved(Route::AppConfigs)
            }
            Err(e) => {
                let err = ViewError::from(e);
                if !err.is_session_expired() {
                    // Only the first backend message is shown.
                    let message = err
                        .messages()
                        .first()
                        .cloned()
                        .unwrap_or_else(|| UPDATE_FAILED.to_string());
                    self.ctx.notifications.error(message.clone());
                    self.submit_error = Some(message);
                }
                SubmitOutcome::Failed(err)
            }
        }
    }
}
