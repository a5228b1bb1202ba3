//! Console routes and their paths.

use std::fmt;

use propcalc_core::models::UserId;

/// Every page the console can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Clauses,
    ClauseEdit(i64),
    TariffPresets,
    TariffPresetCreate,
    TariffPresetEdit(i64),
    TariffPresetPreview(i64),
    AppConfigs,
    AppConfigEdit(i64),
    Policies,
    PolicyDetails(i64),
    Users,
    UserCreate,
    UserEdit(UserId),
    Profile,
    /// Unmatched path, kept for display.
    NotFound(String),
}

impl Route {
    /// Match a path. Trailing slashes and query strings are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["profile"] => Some(Route::Profile),
            ["insurance-clauses"] => Some(Route::Clauses),
            ["insurance-clauses", "edit", n] => parse_id(n).map(Route::ClauseEdit),
            ["tariff-presets"] => Some(Route::TariffPresets),
            ["tariff-presets", "create"] => Some(Route::TariffPresetCreate),
            ["tariff-presets", "edit", n] => parse_id(n).map(Route::TariffPresetEdit),
            ["tariff-presets", "preview", n] => parse_id(n).map(Route::TariffPresetPreview),
            ["app-configs"] => Some(Route::AppConfigs),
            ["app-configs", "edit", n] => parse_id(n).map(Route::AppConfigEdit),
            ["insurance-policies"] => Some(Route::Policies),
            ["insurance-policies", n] => parse_id(n).map(Route::PolicyDetails),
            ["users"] => Some(Route::Users),
            ["users", "create"] => Some(Route::UserCreate),
            ["users", "edit", uid] => Some(Route::UserEdit(UserId::from(*uid))),
            _ => None,
        };
        route.unwrap_or_else(|| Route::NotFound(path.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Home => "/".into(),
            Route::Clauses => "/insurance-clauses".into(),
            Route::ClauseEdit(id) => format!("/insurance-clauses/edit/{id}"),
            Route::TariffPresets => "/tariff-presets".into(),
            Route::TariffPresetCreate => "/tariff-presets/create".into(),
            Route::TariffPresetEdit(id) => format!("/tariff-presets/edit/{id}"),
            Route::TariffPresetPreview(id) => format!("/tariff-presets/preview/{id}"),
            Route::AppConfigs => "/app-configs".into(),
            Route::AppConfigEdit(id) => format!("/app-configs/edit/{id}"),
            Route::Policies => "/insurance-policies".into(),
            Route::PolicyDetails(id) => format!("/insurance-policies/{id}"),
            Route::Users => "/users".into(),
            Route::UserCreate => "/users/create".into(),
            Route::UserEdit(id) => format!("/users/edit/{id}"),
            Route::Profile => "/profile".into(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }
}

fn parse_id(segment: &str) -> Option<i64> {
    segment.parse().ok()
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
