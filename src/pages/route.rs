//! Route table of the navigation shell

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Dashboard,
    Vehicles,
    Range,
    Knowledge,
    Cost,
    News,
}

impl Route {
    /// Navigation order
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Dashboard,
        Route::Vehicles,
        Route::Range,
        Route::Knowledge,
        Route::Cost,
        Route::News,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Dashboard => "/dashboard",
            Route::Vehicles => "/fahrzeuge",
            Route::Range => "/reichweite",
            Route::Knowledge => "/wissen",
            Route::Cost => "/kosten",
            Route::News => "/news",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Start",
            Route::Dashboard => "Dashboard",
            Route::Vehicles => "Fahrzeuge",
            Route::Range => "Reichweite & Laden",
            Route::Knowledge => "EV-Wissen",
            Route::Cost => "Kostenrechner",
            Route::News => "News",
        }
    }

    /// Page name used in logs and events
    pub fn page_name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Dashboard => "dashboard",
            Route::Vehicles => "vehicles",
            Route::Range => "range",
            Route::Knowledge => "knowledge",
            Route::Cost => "cost",
            Route::News => "news",
        }
    }

    /// Resolve a path; a trailing slash is ignored, unknown paths fall back to home
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
            .unwrap_or(Route::Home)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_back_to_their_route() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_trailing_slash_and_unknown_paths() {
        assert_eq!(Route::from_path("/fahrzeuge/"), Route::Vehicles);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/unbekannt"), Route::Home);
    }

    #[test]
    fn test_nav_order_starts_at_home() {
        assert_eq!(Route::ALL[0], Route::Home);
        assert_eq!(Route::ALL.len(), 7);
        assert_eq!(Route::Range.to_string(), "Reichweite & Laden");
    }
}
