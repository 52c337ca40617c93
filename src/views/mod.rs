//! View controllers.
//!
//! Each view owns the transient state a screen renders (fetched records,
//! loading and error flags, form values) and turns user actions into gateway
//! calls. Views never patch fetched records locally: after a write they show
//! either the write's own response or a fresh read.
//!
//! Views take `&self` and can be shared between tasks. Write actions hold an
//! in-flight guard, so a second click while the first request is pending is
//! rejected with [`ViewError::Busy`] and sends nothing.

pub mod detail;
pub mod form;
pub mod guards;
pub mod list;
pub mod login;
pub mod me;
pub mod navigation;
pub mod notify;
pub mod register;
pub mod shell;
pub mod validation;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{ApiClient, ApiError, AuthGateway, SessionGateway, TeacherGateway, UserGateway};
use crate::state::SessionStore;

pub use navigation::{Navigator, Route};
pub use notify::{Notifier, Toast, ToastLog, CLOSE_ACTION};
pub use validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("another request is already in flight")]
    Busy,

    #[error("form is invalid: {0}")]
    InvalidForm(FieldErrors),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("admin access required")]
    Forbidden,

    #[error("nothing loaded yet")]
    NotLoaded,
}

/// Everything a view needs: the store, the gateways, navigation and toasts.
///
/// Cheap to clone; clones share the same store, navigator and notifier.
#[derive(Clone)]
pub struct ViewContext {
    pub store: Arc<SessionStore>,
    pub auth: AuthGateway,
    pub sessions: SessionGateway,
    pub teachers: TeacherGateway,
    pub users: UserGateway,
    pub navigator: Navigator,
    notifier: Arc<dyn Notifier>,
    toast_duration: Duration,
}

impl ViewContext {
    pub fn new(client: ApiClient, notifier: Arc<dyn Notifier>, toast_duration: Duration) -> Self {
        Self {
            store: client.store().clone(),
            auth: AuthGateway::new(client.clone()),
            sessions: SessionGateway::new(client.clone()),
            teachers: TeacherGateway::new(client.clone()),
            users: UserGateway::new(client),
            navigator: Navigator::default(),
            notifier,
            toast_duration,
        }
    }

    /// Show a transient message with the standard "Close" action
    pub fn toast(&self, message: impl Into<String>) {
        self.notifier.open(Toast {
            message: message.into(),
            action: CLOSE_ACTION.to_string(),
            duration: self.toast_duration,
        });
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}

/// Flag marking a write request as pending
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    /// Claim the flag, or fail with [`ViewError::Busy`] if already claimed.
    /// The flag is released when the returned guard drops.
    pub(crate) fn begin(&self) -> Result<InFlightGuard<'_>, ViewError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard(&self.0))
            .map_err(|_| ViewError::Busy)
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
