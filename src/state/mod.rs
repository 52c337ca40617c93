//! Authentication state shared by every gateway and view.
//!
//! There is exactly one [`SessionStore`] per application. It is created logged
//! out, handed around as `Arc<SessionStore>`, and is the only writer of the
//! current identity. Observers subscribe through [`SessionStore::is_logged_in`].

use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::models::SessionInformation;

/// Pending login/logout transitions kept per observer before it lags
const CHANGE_CAPACITY: usize = 32;

pub struct SessionStore {
    information: RwLock<Option<SessionInformation>>,
    changes: broadcast::Sender<bool>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            information: RwLock::new(None),
            changes,
        }
    }

    /// Store the identity and notify observers
    pub fn log_in(&self, information: SessionInformation) {
        let mut current = self.information.write();
        info!(
            user_id = information.id,
            admin = information.admin,
            "User logged in"
        );
        *current = Some(information);
        // Nobody listening is fine
        let _ = self.changes.send(true);
    }

    /// Drop the identity and notify observers
    pub fn log_out(&self) {
        let mut current = self.information.write();
        if let Some(previous) = current.take() {
            info!(user_id = previous.id, "User logged out");
        }
        let _ = self.changes.send(false);
    }

    /// Current login state, without subscribing
    pub fn is_logged(&self) -> bool {
        self.information.read().is_some()
    }

    pub fn session_information(&self) -> Option<SessionInformation> {
        self.information.read().clone()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.information.read().as_ref().map(|info| info.id)
    }

    pub fn is_admin(&self) -> bool {
        self.information
            .read()
            .as_ref()
            .map(|info| info.admin)
            .unwrap_or(false)
    }

    /// `Authorization` header value for the logged-in identity
    pub fn bearer(&self) -> Option<String> {
        self.information
            .read()
            .as_ref()
            .and_then(|info| info.authorization())
    }

    /// Stream of login states.
    ///
    /// Nothing happens until the stream is first polled. It then yields the
    /// state at that moment, followed by one value per later `log_in` or
    /// `log_out`. Every call returns an independent stream.
    pub fn is_logged_in(self: &Arc<Self>) -> impl Stream<Item = bool> + Send + 'static {
        let store = Arc::clone(self);
        stream! {
            // Snapshot and subscribe under the same lock so no transition is
            // missed or seen twice
            let (current, mut changes) = {
                let information = store.information.read();
                (information.is_some(), store.changes.subscribe())
            };
            yield current;

            loop {
                match changes.recv().await {
                    Ok(logged) => yield logged,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Login state observer lagged, resyncing");
                        // Drop the stale backlog and resync from the current
                        // state, under the lock like the first subscription
                        let current = {
                            let information = store.information.read();
                            changes = changes.resubscribe();
                            information.is_some()
                        };
                        yield current;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
