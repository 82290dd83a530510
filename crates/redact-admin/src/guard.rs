use redact_core::{Navigation, Route, Session};
use time::OffsetDateTime;

/// Decide whether `route` may render for the given session
pub fn guard(route: Route, session: Option<&Session>, now: OffsetDateTime) -> Navigation {
    if !route.is_protected() {
        return Navigation::Render(route);
    }
    match session {
        Some(session) if session.is_valid_at(now) => Navigation::Render(route),
        _ => Navigation::Redirect(Route::AdminLogin),
    }
}

/// Resolve a raw path and then apply the guard
pub fn navigate(path: &str, session: Option<&Session>, now: OffsetDateTime) -> Navigation {
    match Route::resolve(path) {
        Navigation::Render(route) => guard(route, session, now),
        redirect => redirect,
    }
}
