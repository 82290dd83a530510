//! Route table for the redaction tool and the admin area

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Tool,
    AdminLogin,
    AdminDashboard,
    AdminUsers,
    AdminLogs,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Tool,
        Route::AdminLogin,
        Route::AdminDashboard,
        Route::AdminUsers,
        Route::AdminLogs,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Tool => "/",
            Route::AdminLogin => "/admin/login",
            Route::AdminDashboard => "/admin",
            Route::AdminUsers => "/admin/users",
            Route::AdminLogs => "/admin/logs",
        }
    }

    /// Routes that require a valid admin session
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::AdminDashboard | Route::AdminUsers | Route::AdminLogs
        )
    }

    /// Exact lookup; a single trailing slash is tolerated
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.trim() {
            "" => "/",
            "/" => "/",
            p => p.strip_suffix('/').unwrap_or(p),
        };
        Route::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    /// Resolve any path; unknown paths redirect to the tool
    pub fn resolve(path: &str) -> Navigation {
        match Route::from_path(path) {
            Some(route) => Navigation::Render(route),
            None => Navigation::Redirect(Route::Tool),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of routing a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "route", rename_all = "snake_case")]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    pub fn route(&self) -> Route {
        match self {
            Navigation::Render(r) | Navigation::Redirect(r) => *r,
        }
    }
}
