//! # propcalc_console
//!
//! Headless admin console for PropCalc. The auth gate decides what may
//! render, and each page is a view model a UI shell drives.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use propcalc_console::{Console, gate::History, routes::Route};
//! use propcalc_core::config::ConsoleConfig;
//!
//! let mut console = Console::new(&ConsoleConfig::from_env()?, Arc::new(History::new()))?;
//! console.gate.navigate(Route::Clauses);
//! let mut clauses = propcalc_console::views::ClauseListView::new(console.context());
//! clauses.load().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use propcalc_api_client::{ApiClient, ApiResult};
use propcalc_core::config::ConsoleConfig;
use propcalc_core::session::SessionStore;

pub mod gate;
pub mod layout;
pub mod nav;
pub mod notify;
pub mod routes;
pub mod view;
pub mod views;

pub use gate::{AuthGate, GateState, Navigation, Navigator};
pub use notify::{Notifications, Severity, Toast};
pub use routes::Route;
pub use view::{SubmitOutcome, ViewContext, ViewError, ViewScope};

/// Everything a shell wires together once at startup.
pub struct Console {
    pub client: ApiClient,
    pub gate: AuthGate,
    pub notifications: Notifications,
}

impl Console {
    /// Open the configured session store and build the client and gate.
    pub fn new(config: &ConsoleConfig, navigator: Arc<dyn Navigator>) -> ApiResult<Self> {
        let session = SessionStore::from_config(config);
        let client = ApiClient::new(config, session)?;
        Ok(Self::with_client(client, navigator))
    }

    pub fn with_client(client: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        let gate = AuthGate::new(client.clone(), navigator);
        Self {
            client,
            gate,
            notifications: Notifications::new(),
        }
    }

    /// Handles for a new view.
    pub fn context(&self) -> ViewContext {
        ViewContext::new(self.client.clone(), self.notifications.clone())
    }
}

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
