//! Account page.

use parking_lot::Mutex;
use tracing::{info, warn};

use super::{InFlight, Route, ViewContext, ViewError};
use crate::models::User;

pub struct MeView {
    ctx: ViewContext,
    user: Mutex<Option<User>>,
    error: Mutex<Option<String>>,
    in_flight: InFlight,
}

impl MeView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            user: Mutex::new(None),
            error: Mutex::new(None),
            in_flight: InFlight::default(),
        }
    }

    /// Load the logged-in user's account
    pub async fn init(&self) -> Result<(), ViewError> {
        let user_id = self.ctx.store.user_id().ok_or(ViewError::NotLoggedIn)?;

        match self.ctx.users.get_by_id(user_id).await {
            Ok(user) => {
                *self.user.lock() = Some(user);
                *self.error.lock() = None;
                Ok(())
            }
            Err(e) => {
                warn!(user_id, error = %e, "Loading account failed");
                *self.error.lock() = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user.lock().clone()
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    /// Delete the account, then log out and go to the root page
    pub async fn delete(&self) -> Result<(), ViewError> {
        let user_id = self.ctx.store.user_id().ok_or(ViewError::NotLoggedIn)?;
        let _guard = self.in_flight.begin()?;

        if let Err(e) = self.ctx.users.delete(user_id).await {
            warn!(user_id, error = %e, "Deleting account failed");
            self.ctx.toast(e.user_message());
            return Err(e.into());
        }

        info!(user_id, "Account deleted");
        self.ctx.toast("Your account has been deleted !");
        self.ctx.store.log_out();
        self.ctx.navigate(Route::Root);
        Ok(())
    }

    pub fn back(&self) -> Route {
        self.ctx.navigator.back()
    }
}
