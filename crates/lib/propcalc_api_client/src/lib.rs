//! # propcalc_api_client
//!
//! Authenticated HTTP client for the PropCalc admin API and one typed
//! service per backend resource.
//!
//! ```no_run
//! # async fn run() -> propcalc_api_client::ApiResult<()> {
//! use propcalc_api_client::ApiClient;
//! use propcalc_core::{config::ConsoleConfig, session::SessionStore};
//!
//! let config = ConsoleConfig::from_env()?;
//! let client = ApiClient::new(&config, SessionStore::from_config(&config))?;
//! let _clauses = client.clauses().list().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod services;

pub use client::{ApiClient, AuthFailure};
pub use error::{ApiError, ApiResult, ErrorBody};
