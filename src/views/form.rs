//! Admin form for creating and editing sessions.

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{info, warn};

use super::validation::{self, FieldErrors};
use super::{InFlight, Route, ViewContext, ViewError};
use crate::models::{SessionPayload, Teacher, YogaSession};

/// Maximum description length accepted by the form
const DESCRIPTION_MAX_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(u64),
}

impl FormMode {
    /// Mode for a form route, `None` for any other route
    pub fn from_route(route: Route) -> Option<Self> {
        match route {
            Route::SessionCreate => Some(FormMode::Create),
            Route::SessionUpdate(id) => Some(FormMode::Update(id)),
            _ => None,
        }
    }
}

/// Raw form values as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionForm {
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub teacher_id: Option<u64>,
    pub description: String,
}

impl SessionForm {
    pub fn from_session(session: &YogaSession) -> Self {
        Self {
            name: session.name.clone(),
            date: session.form_date(),
            teacher_id: Some(session.teacher_id),
            description: session.description.clone(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        self.parse().err().unwrap_or_default()
    }

    fn parse(&self) -> Result<(NaiveDate, u64), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("name", validation::required(&self.name));
        errors.check("description", validation::required(&self.description));
        errors.check(
            "description",
            validation::length(&self.description, 0, DESCRIPTION_MAX_LEN),
        );

        let date = match validation::form_date(&self.date) {
            Ok(date) => Some(date),
            Err(message) => {
                errors.add("date", message);
                None
            }
        };
        if self.teacher_id.is_none() {
            errors.add("teacher_id", "is required");
        }

        match (date, self.teacher_id) {
            (Some(date), Some(teacher_id)) if errors.is_empty() => Ok((date, teacher_id)),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default)]
struct FormState {
    form: SessionForm,
    teachers: Vec<Teacher>,
    /// The record being edited, as last read
    session: Option<YogaSession>,
    loading: bool,
    error: Option<String>,
}

pub struct FormView {
    ctx: ViewContext,
    mode: FormMode,
    state: Mutex<FormState>,
    in_flight: InFlight,
}

impl FormView {
    pub fn new(ctx: ViewContext, mode: FormMode) -> Self {
        Self {
            ctx,
            mode,
            state: Mutex::new(FormState::default()),
            in_flight: InFlight::default(),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_update(&self) -> bool {
        matches!(self.mode, FormMode::Update(_))
    }

    /// Prepare the form.
    ///
    /// Non-admins are sent to the sessions list and nothing is fetched. In
    /// update mode the session is read and copied into the form.
    pub async fn init(&self) -> Result<(), ViewError> {
        if !self.ctx.store.is_admin() {
            info!("Session form requires admin, redirecting");
            self.ctx.navigate(Route::Sessions);
            return Err(ViewError::Forbidden);
        }

        self.state.lock().loading = true;
        let result = self.load().await;
        let mut state = self.state.lock();
        state.loading = false;
        if let Err(ViewError::Api(e)) = &result {
            state.error = Some(e.user_message());
        }
        result
    }

    async fn load(&self) -> Result<(), ViewError> {
        if let FormMode::Update(id) = self.mode {
            let session = self.ctx.sessions.detail(id).await?;
            let mut state = self.state.lock();
            state.form = SessionForm::from_session(&session);
            state.session = Some(session);
        }

        let teachers = self.ctx.teachers.all().await?;
        self.state.lock().teachers = teachers;
        Ok(())
    }

    pub fn form(&self) -> SessionForm {
        self.state.lock().form.clone()
    }

    pub fn set_form(&self, form: SessionForm) {
        self.state.lock().form = form;
    }

    /// Change some of the form values in place
    pub fn edit(&self, change: impl FnOnce(&mut SessionForm)) {
        change(&mut self.state.lock().form);
    }

    pub fn teachers(&self) -> Vec<Teacher> {
        self.state.lock().teachers.clone()
    }

    /// `(id, label)` pairs for the teacher picker
    pub fn teacher_options(&self) -> Vec<(u64, String)> {
        self.state
            .lock()
            .teachers
            .iter()
            .map(|t| (t.id, t.option_label()))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.state.lock().form.validate()
    }

    pub fn can_submit(&self) -> bool {
        self.errors().is_empty() && !self.in_flight.is_set()
    }

    /// Create or update the session from the current form values.
    ///
    /// Invalid forms are rejected before anything is sent.
    pub async fn submit(&self) -> Result<YogaSession, ViewError> {
        let payload = self.payload()?;
        let _guard = self.in_flight.begin()?;

        let (result, message) = match self.mode {
            FormMode::Create => (self.ctx.sessions.create(&payload).await, "Session created !"),
            FormMode::Update(id) => (
                self.ctx.sessions.update(id, &payload).await,
                "Session updated !",
            ),
        };

        match result {
            Ok(session) => {
                info!(session_id = session.id, "Session saved");
                self.ctx.toast(message);
                self.ctx.navigate(Route::Sessions);
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Saving session failed");
                self.ctx.toast(e.user_message());
                self.state.lock().error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    fn payload(&self) -> Result<SessionPayload, ViewError> {
        let state = self.state.lock();
        let (date, teacher_id) = state.form.parse().map_err(ViewError::InvalidForm)?;

        // Updates replace the whole record, keep the participants
        let users = match self.mode {
            FormMode::Create => Vec::new(),
            FormMode::Update(_) => state
                .session
                .as_ref()
                .map(|s| s.users.clone())
                .ok_or(ViewError::NotLoaded)?,
        };

        Ok(SessionPayload {
            name: state.form.name.trim().to_string(),
            date,
            teacher_id,
            description: state.form.description.trim().to_string(),
            users,
        })
    }
}
