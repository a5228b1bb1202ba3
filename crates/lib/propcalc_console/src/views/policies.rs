//! Issued policies: server-paged list with stats, and a details page.

use tracing::{debug, warn};

use propcalc_api_client::services::{PolicyFilter, PolicySortField, SortOrder};
use propcalc_core::format::{format_amount, format_date};
use propcalc_core::models::{Pagination, PolicyDetails, PolicyStats, PolicySummary};

use crate::layout::Layout;
use crate::routes::Route;
use crate::view::{ViewContext, ViewError, ViewScope};

/// Page sizes offered by the list.
pub const LIMIT_OPTIONS: [u32; 4] = [10, 25, 50, 100];

const DEFAULT_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Every filter change goes back to the server; nothing is sorted or
/// filtered locally.
pub struct PolicyListView {
    ctx: ViewContext,
    scope: ViewScope,
    pub search: String,
    pub sort_by: PolicySortField,
    pub sort_order: SortOrder,
    pub limit: u32,
    pub page: u32,
    pub status: Option<String>,
    pub policies: Vec<PolicySummary>,
    pub pagination: Pagination,
    /// `None` until loaded, or when the stats call failed.
    pub stats: Option<PolicyStats>,
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl PolicyListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            search: String::new(),
            sort_by: PolicySortField::default(),
            sort_order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            page: 1,
            status: None,
            policies: Vec::new(),
            pagination: Pagination::default(),
            stats: None,
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

    /// Query for the current filter state.
    pub fn current_filter(&self) -> PolicyFilter {
        PolicyFilter {
            page: Some(self.page),
            limit: Some(self.limit),
            sort_by: Some(self.sort_by),
            sort_order: Some(self.sort_order),
            search: Some(self.search.clone()),
            status: self.status.clone(),
        }
    }

    /// Fetch the current page, then the stats.
    pub async fn refresh(&mut self) {
        self.loading = true;
        let filter = self.current_filter();
        debug!(page = self.page, limit = self.limit, sort_by = self.sort_by.as_str(), "fetching policies");

        let Some(result) = self.scope.run(self.ctx.client.policies().list(&filter)).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(page) => {
                self.policies = page.policies;
                self.pagination = page.pagination;
                self.error = None;
            }
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load insurance policies");
                self.error = Some(err);
            }
        }

        let Some(result) = self.scope.run(self.ctx.client.policies().stats()).await else {
            return;
        };
        match result {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => warn!(error = %e, "failed to load policy stats"),
        }
    }

    pub async fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_sort_by(&mut self, field: PolicySortField) {
        self.sort_by = field;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.refresh().await;
    }

    pub fn details_route(&self, id: i64) -> Route {
        Route::PolicyDetails(id)
    }
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

pub struct PolicyDetailsView {
    ctx: ViewContext,
    scope: ViewScope,
    id: i64,
    pub policy: Option<PolicyDetails>,
    pub loading: bool,
    pub error: Option<ViewError>,
}

impl PolicyDetailsView {
    pub fn new(ctx: ViewContext, id: i64) -> Self {
        Self {
            ctx,
            scope: ViewScope::new(),
            id,
            policy: None,
            loading: true,
            error: None,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let Some(result) = self.scope.run(self.ctx.client.policies().get(self.id)).await else {
            return;
        };
        self.loading = false;
        match result {
            Ok(policy) => self.policy = Some(policy),
            Err(e) => {
                let err = ViewError::from(e);
                self.ctx.report(&err, "Failed to load policy details");
                self.error = Some(err);
            }
        }
    }

    pub fn created_label(&self) -> String {
        format_date(self.policy.as_ref().and_then(|p| p.created_at.as_deref()))
    }

    pub fn total_label(&self) -> String {
        format_amount(self.policy.as_ref().map_or(0.0, |p| p.total))
    }

    pub fn back_route(&self) -> Route {
        Route::Policies
    }
}
