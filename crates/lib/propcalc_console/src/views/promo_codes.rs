//! Promotional code form, opened inline from the user edit page.
//!
//! The form is pure state: the owning view performs the calls and feeds
//! failures back through [`PromoCodeForm::apply_error`].

use chrono::{DateTime, Utc};

use propcalc_core::models::{PromoOwner, PromotionalCode, UserId};
use propcalc_core::validation::{FieldErrors, Rule, parse_number};

use crate::view::ViewError;

pub const CODE_MAX_LEN: usize = 50;

const SAVE_FAILED: &str = "An error occurred while saving the promotional code";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoFormMode {
    Create,
    Edit,
    /// Read-only.
    View,
}

/// Editable copy of a code. Numbers are kept as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct PromoDraft {
    pub id: Option<i64>,
    pub code: String,
    pub description: String,
    pub discount_percentage: String,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub active: bool,
    /// Blank means unlimited.
    pub usage_limit: String,
    pub usage_count: u32,
}

impl From<&PromotionalCode> for PromoDraft {
    fn from(code: &PromotionalCode) -> Self {
        Self {
            id: code.id,
            code: code.code.clone(),
            description: code.description.clone(),
            discount_percentage: code.discount_percentage.to_string(),
            valid_from: code.valid_from,
            valid_to: code.valid_to,
            active: code.active,
            usage_limit: code.usage_limit.map(|l| l.to_string()).unwrap_or_default(),
            usage_count: code.usage_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromoCodeForm {
    mode: PromoFormMode,
    owner: UserId,
    draft: PromoDraft,
    /// Set once a save was attempted; field errors show from then on.
    pub submitted: bool,
    pub field_errors: FieldErrors,
    /// Messages from the last failed save.
    pub errors: Vec<String>,
    pub saving: bool,
}

impl PromoCodeForm {
    /// Blank code for `owner`, valid from `now`.
    pub fn create(owner: UserId, now: DateTime<Utc>) -> Self {
        let draft = PromoDraft {
            id: None,
            code: String::new(),
            description: String::new(),
            discount_percentage: "0".into(),
            valid_from: Some(now),
            valid_to: None,
            active: true,
            usage_limit: String::new(),
            usage_count: 0,
        };
        Self::with(PromoFormMode::Create, owner, draft)
    }

    pub fn edit(owner: UserId, code: &PromotionalCode) -> Self {
        Self::with(PromoFormMode::Edit, owner, PromoDraft::from(code))
    }

    pub fn view(owner: UserId, code: &PromotionalCode) -> Self {
        Self::with(PromoFormMode::View, owner, PromoDraft::from(code))
    }

    fn with(mode: PromoFormMode, owner: UserId, draft: PromoDraft) -> Self {
        Self {
            mode,
            owner,
            draft,
            submitted: false,
            field_errors: FieldErrors::new(),
            errors: Vec::new(),
            saving: false,
        }
    }

    pub fn mode(&self) -> PromoFormMode {
        self.mode
    }

    pub fn draft(&self) -> &PromoDraft {
        &self.draft
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            PromoFormMode::Create => "Create promotional code",
            PromoFormMode::Edit => "Edit promotional code",
            PromoFormMode::View => "View promotional code",
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == PromoFormMode::View
    }

    /// Code and discount are fixed once the code exists.
    pub fn code_editable(&self) -> bool {
        self.mode == PromoFormMode::Create
    }

    pub fn discount_editable(&self) -> bool {
        self.mode == PromoFormMode::Create
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        if self.code_editable() {
            self.draft.code = code.into();
        }
    }

    pub fn set_discount(&mut self, discount: impl Into<String>) {
        if self.discount_editable() {
            self.draft.discount_percentage = discount.into();
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        if !self.is_read_only() {
            self.draft.description = description.into();
        }
    }

    pub fn set_validity(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        if !self.is_read_only() {
            self.draft.valid_from = from;
            self.draft.valid_to = to;
        }
    }

    pub fn set_usage_limit(&mut self, limit: impl Into<String>) {
        if !self.is_read_only() {
            self.draft.usage_limit = limit.into();
        }
    }

    pub fn set_active(&mut self, active: bool) {
        if !self.is_read_only() {
            self.draft.active = active;
        }
    }

    pub fn validate(&mut self) -> bool {
        self.submitted = true;
        self.field_errors = FieldErrors::new();
        let d = &self.draft;
        self.field_errors
            .check_as("code", &d.code, &[Rule::Required], "Code is required")
            .check_as(
                "code",
                &d.code,
                &[Rule::MaxLength(CODE_MAX_LEN)],
                "Code cannot be longer than 50 characters",
            )
            .check_as(
                "description",
                &d.description,
                &[Rule::Required],
                "Description is required",
            )
            .check_as(
                "discount_percentage",
                &d.discount_percentage,
                &[Rule::Required, Rule::Numeric, Rule::Min(0.0), Rule::Max(100.0)],
                "Discount must be between 0% and 100%",
            );
        if !d.usage_limit.trim().is_empty()
            && d.usage_limit.trim().parse::<u32>().map_or(true, |l| l < 1)
        {
            self.field_errors
                .add("usage_limit", "Usage limit must be a positive whole number");
        }
        self.field_errors.is_empty()
    }

    /// Body to send for the current draft.
    pub fn to_payload(&self) -> PromotionalCode {
        let d = &self.draft;
        PromotionalCode {
            id: d.id,
            code: d.code.trim().to_string(),
            description: d.description.trim().to_string(),
            discount_percentage: parse_number(&d.discount_percentage).unwrap_or(0.0),
            valid_from: d.valid_from,
            valid_to: d.valid_to,
            active: d.active,
            usage_limit: d.usage_limit.trim().parse().ok(),
            usage_count: d.usage_count,
            user: Some(PromoOwner {
                id: self.owner.clone(),
            }),
        }
    }

    /// Show a failed save: every backend message, or a generic one.
    pub fn apply_error(&mut self, err: &ViewError) {
        self.saving = false;
        self.errors = if err.messages().is_empty() {
            vec![SAVE_FAILED.to_string()]
        } else {
            err.messages().to_vec()
        };
    }
}
