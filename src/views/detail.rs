//! Session detail page: teacher, attendees, participation and admin delete.

use parking_lot::Mutex;
use tracing::warn;

use super::{InFlight, Route, ViewContext, ViewError};
use crate::api::ApiError;
use crate::models::{Teacher, YogaSession};

#[derive(Debug, Default)]
struct DetailState {
    session: Option<YogaSession>,
    teacher: Option<Teacher>,
    loading: bool,
    error: Option<String>,
}

pub struct DetailView {
    ctx: ViewContext,
    session_id: u64,
    state: Mutex<DetailState>,
    in_flight: InFlight,
}

impl DetailView {
    pub fn new(ctx: ViewContext, session_id: u64) -> Self {
        Self {
            ctx,
            session_id,
            state: Mutex::new(DetailState::default()),
            in_flight: InFlight::default(),
        }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Load the session, then its teacher
    pub async fn init(&self) -> Result<(), ViewError> {
        self.state.lock().loading = true;
        let result = self.fetch_session().await;
        self.state.lock().loading = false;
        result
    }

    /// Read the session again and replace local state with what the server
    /// returned. The teacher is only re-read when the session points at a
    /// different one. Session and teacher are replaced together or not at all.
    async fn fetch_session(&self) -> Result<(), ViewError> {
        let session = match self.ctx.sessions.detail(self.session_id).await {
            Ok(session) => session,
            Err(e) => return Err(self.fail(e)),
        };

        let known_teacher = self
            .state
            .lock()
            .teacher
            .as_ref()
            .filter(|t| t.id == session.teacher_id)
            .cloned();
        let teacher = match known_teacher {
            Some(teacher) => teacher,
            None => match self.ctx.teachers.detail(session.teacher_id).await {
                Ok(teacher) => teacher,
                // Keep the previous session and teacher together
                Err(e) => return Err(self.fail(e)),
            },
        };

        let mut state = self.state.lock();
        state.session = Some(session);
        state.teacher = Some(teacher);
        state.error = None;
        Ok(())
    }

    fn fail(&self, err: ApiError) -> ViewError {
        warn!(session_id = self.session_id, error = %err, "Session detail failed");
        self.state.lock().error = Some(err.user_message());
        ViewError::Api(err)
    }

    pub fn session(&self) -> Option<YogaSession> {
        self.state.lock().session.clone()
    }

    pub fn teacher(&self) -> Option<Teacher> {
        self.state.lock().teacher.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Whether a participation or delete request is pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_set()
    }

    pub fn is_admin(&self) -> bool {
        self.ctx.store.is_admin()
    }

    /// Whether the logged-in user is among the participants of the last read
    pub fn is_participate(&self) -> bool {
        let Some(user_id) = self.ctx.store.user_id() else {
            return false;
        };
        self.state
            .lock()
            .session
            .as_ref()
            .map(|s| s.has_participant(user_id))
            .unwrap_or(false)
    }

    pub fn attendees_label(&self) -> String {
        let count = self
            .state
            .lock()
            .session
            .as_ref()
            .map(YogaSession::attendee_count)
            .unwrap_or(0);
        format!("{} attendees", count)
    }

    /// Label of the participation toggle
    pub fn participation_action(&self) -> &'static str {
        if self.is_participate() {
            "Do not participate"
        } else {
            "Participate"
        }
    }

    pub async fn participate(&self) -> Result<(), ViewError> {
        let user_id = self.ctx.store.user_id().ok_or(ViewError::NotLoggedIn)?;
        let _guard = self.in_flight.begin()?;

        if let Err(e) = self.ctx.sessions.participate(self.session_id, user_id).await {
            self.ctx.toast(e.user_message());
            return Err(self.fail(e));
        }
        self.fetch_session().await
    }

    pub async fn un_participate(&self) -> Result<(), ViewError> {
        let user_id = self.ctx.store.user_id().ok_or(ViewError::NotLoggedIn)?;
        let _guard = self.in_flight.begin()?;

        if let Err(e) = self.ctx.sessions.un_participate(self.session_id, user_id).await {
            self.ctx.toast(e.user_message());
            return Err(self.fail(e));
        }
        self.fetch_session().await
    }

    pub async fn delete(&self) -> Result<(), ViewError> {
        let _guard = self.in_flight.begin()?;

        if let Err(e) = self.ctx.sessions.delete(self.session_id).await {
            self.ctx.toast(e.user_message());
            return Err(self.fail(e));
        }
        self.ctx.toast("Session deleted !");
        self.ctx.navigate(Route::Sessions);
        Ok(())
    }

    pub fn back(&self) -> Route {
        self.ctx.navigator.back()
    }
}
