//! Routes and the navigator that views drive.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

/// Every screen of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    Sessions,
    SessionDetail(u64),
    SessionCreate,
    SessionUpdate(u64),
    Me,
    NotFound,
}

impl Route {
    /// Parse a URL path. Leading slashes are optional, unknown paths map to
    /// [`Route::NotFound`]
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Root,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["sessions"] => Route::Sessions,
            ["sessions", "create"] => Route::SessionCreate,
            ["sessions", "detail", id] => id
                .parse()
                .map(Route::SessionDetail)
                .unwrap_or(Route::NotFound),
            ["sessions", "update", id] => id
                .parse()
                .map(Route::SessionUpdate)
                .unwrap_or(Route::NotFound),
            ["me"] => Route::Me,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Sessions => "/sessions".to_string(),
            Route::SessionDetail(id) => format!("/sessions/detail/{}", id),
            Route::SessionCreate => "/sessions/create".to_string(),
            Route::SessionUpdate(id) => format!("/sessions/update/{}", id),
            Route::Me => "/me".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug)]
struct History {
    current: Route,
    previous: Vec<Route>,
}

/// Current route plus back-stack. Clones share the same history.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Arc<Mutex<History>>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: Arc::new(Mutex::new(History {
                current: start,
                previous: Vec::new(),
            })),
        }
    }

    pub fn navigate(&self, route: Route) {
        let mut history = self.history.lock();
        info!(from = %history.current, to = %route, "Navigating");
        let from = std::mem::replace(&mut history.current, route);
        history.previous.push(from);
    }

    /// Return to the previous route. Stays put when there is none
    pub fn back(&self) -> Route {
        let mut history = self.history.lock();
        if let Some(previous) = history.previous.pop() {
            history.current = previous;
        }
        history.current
    }

    pub fn current(&self) -> Route {
        self.history.lock().current
    }

    /// Routes visited so far, oldest first, excluding the current one
    pub fn visited(&self) -> Vec<Route> {
        self.history.lock().previous.clone()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}
