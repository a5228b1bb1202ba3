//! Navigation menu and home page cards.

use crate::routes::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub description: &'static str,
    pub route: Route,
}

impl MenuItem {
    fn new(label: &'static str, description: &'static str, route: Route) -> Self {
        Self {
            label,
            description,
            route,
        }
    }

    pub fn is_active(&self, current_path: &str) -> bool {
        is_active(current_path, &self.route.path())
    }
}

/// Top navigation entries.
pub fn navbar_items() -> Vec<MenuItem> {
    vec![
        MenuItem::new(
            "Insurance clauses",
            "Manage the insurance clauses offered by the property calculator.",
            Route::Clauses,
        ),
        MenuItem::new(
            "Tariff presets",
            "Manage the tariff presets of the property calculator.",
            Route::TariffPresets,
        ),
        MenuItem::new(
            "Configuration",
            "Configure the property calculator settings.",
            Route::AppConfigs,
        ),
        MenuItem::new(
            "Policies",
            "Browse issued insurance policies.",
            Route::Policies,
        ),
        MenuItem::new("Users", "Manage console users and their promo codes.", Route::Users),
    ]
}

/// Entries of the account menu.
pub fn account_items() -> Vec<MenuItem> {
    vec![MenuItem::new("Profile", "Edit your own account.", Route::Profile)]
}

/// Cards shown on the home page.
pub fn home_cards() -> Vec<MenuItem> {
    navbar_items()
        .into_iter()
        .filter(|item| {
            matches!(
                item.route,
                Route::Clauses | Route::TariffPresets | Route::AppConfigs
            )
        })
        .collect()
}

/// `current` is `item` or one of its sub-pages.
pub fn is_active(current: &str, item: &str) -> bool {
    current == item || current.starts_with(&format!("{item}/"))
}
