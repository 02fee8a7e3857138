//! Route table. The login redirect compares against [`LOGIN_PATH`].

use crate::models::ResourceKind;

pub const LOGIN_PATH: &str = "/login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Resource(ResourceKind),
}

impl Route {
    /// Screens reachable with the number keys, in key order
    pub const NAVIGABLE: [Route; 8] = [
        Route::Dashboard,
        Route::Resource(ResourceKind::Team),
        Route::Resource(ResourceKind::Action),
        Route::Resource(ResourceKind::Datasource),
        Route::Resource(ResourceKind::Dataset),
        Route::Resource(ResourceKind::Expectation),
        Route::Resource(ResourceKind::Validation),
        Route::Resource(ResourceKind::Suggestion),
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => LOGIN_PATH,
            Route::Dashboard => "/dashboard",
            Route::Resource(ResourceKind::Team) => "/teams/home",
            Route::Resource(ResourceKind::Action) => "/actions/home",
            Route::Resource(ResourceKind::Datasource) => "/data-sources/home",
            Route::Resource(ResourceKind::Dataset) => "/datasets/home",
            Route::Resource(ResourceKind::Expectation) => "/expectations/home",
            Route::Resource(ResourceKind::Validation) => "/validations/home",
            Route::Resource(ResourceKind::Suggestion) => "/suggestions/home",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        if path == LOGIN_PATH {
            return Some(Route::Login);
        }
        Route::NAVIGABLE.into_iter().find(|route| route.path() == path)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Resource(kind) => kind.title(),
        }
    }

    /// Route bound to number key `n` (1-based)
    pub fn for_hotkey(n: usize) -> Option<Route> {
        n.checked_sub(1).and_then(|i| Route::NAVIGABLE.get(i).copied())
    }
}
