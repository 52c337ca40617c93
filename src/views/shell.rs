//! Top-level application shell: navigation bar state and routing.

use futures::Stream;
use tracing::info;

use super::guards;
use super::{Route, ViewContext};

pub struct AppShell {
    ctx: ViewContext,
}

impl AppShell {
    pub fn new(ctx: ViewContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Login state for the navigation bar, see
    /// [`crate::state::SessionStore::is_logged_in`]
    pub fn is_logged(&self) -> impl Stream<Item = bool> + Send + 'static {
        self.ctx.store.is_logged_in()
    }

    /// Go to `route` if its guard allows it. Returns the route actually shown
    pub fn open(&self, route: Route) -> Route {
        if guards::can_activate(&self.ctx, route) {
            self.ctx.navigate(route);
        }
        self.ctx.navigator.current()
    }

    /// Same as [`AppShell::open`] for a URL path
    pub fn open_path(&self, path: &str) -> Route {
        self.open(Route::parse(path))
    }

    pub fn logout(&self) {
        info!("Logging out");
        self.ctx.store.log_out();
        self.ctx.navigate(Route::Root);
    }
}
