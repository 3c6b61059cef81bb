//! Route Guards
//!
//! Navigation targets of the client and the session checks in front of
//! them. Private routes need a credential, public routes are only for
//! signed-out users.

use crate::session::Session;
use std::fmt;

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Group chat
    Home,
    Profile,
    Login,
    Register,
}

impl Route {
    /// Resolve a path; unknown paths fall back to home
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        match path.trim_end_matches('/') {
            "/profile" => Route::Profile,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Profile => "/profile",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    /// Whether the route needs a signed-in user
    pub fn is_private(&self) -> bool {
        matches!(self, Route::Home | Route::Profile)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the requested route
    Allow(Route),
    /// Replace the requested route with another one
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen
    pub fn target(&self) -> Route {
        match self {
            Navigation::Allow(route) | Navigation::Redirect(route) => *route,
        }
    }
}

/// Check `route` against the session
pub fn guard(route: Route, session: &Session) -> Navigation {
    match (route.is_private(), session.is_authenticated()) {
        (true, false) => Navigation::Redirect(Route::Login),
        (false, true) => Navigation::Redirect(Route::Home),
        _ => Navigation::Allow(route),
    }
}

/// Resolve a path and apply the guard in one step
pub fn navigate(path: &str, session: &Session) -> Navigation {
    let nav = guard(Route::from_path(path), session);
    if let Navigation::Redirect(to) = nav {
        tracing::debug!(from = path, to = %to, "Route redirected");
    }
    nav
}
