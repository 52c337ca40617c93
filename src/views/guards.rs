//! Route guards.
//!
//! A guard decides whether a route may be entered with the current login
//! state. A refused guard has already redirected when it returns `false`.

use tracing::debug;

use super::{Route, ViewContext};

/// Let logged-in users through, send everyone else to the login page
pub fn auth_guard(ctx: &ViewContext) -> bool {
    if ctx.store.is_logged() {
        return true;
    }
    debug!("Not logged in, redirecting to login");
    ctx.navigate(Route::Login);
    false
}

/// Let logged-out users through, send logged-in users to the sessions list
pub fn unauth_guard(ctx: &ViewContext) -> bool {
    if !ctx.store.is_logged() {
        return true;
    }
    debug!("Already logged in, redirecting to sessions");
    ctx.navigate(Route::Sessions);
    false
}

/// Run the guard protecting `route`, if any
pub fn can_activate(ctx: &ViewContext, route: Route) -> bool {
    match route {
        Route::Login | Route::Register => unauth_guard(ctx),
        Route::Sessions
        | Route::SessionDetail(_)
        | Route::SessionCreate
        | Route::SessionUpdate(_)
        | Route::Me => auth_guard(ctx),
        Route::Root | Route::NotFound => true,
    }
}
