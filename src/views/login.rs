//! Login form.

use parking_lot::Mutex;
use tracing::warn;

use super::validation::{self, FieldErrors};
use super::{InFlight, Route, ViewContext, ViewError};
use crate::models::{LoginRequest, SessionInformation};

const PASSWORD_MIN_LEN: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("email", validation::email(&self.email));
        errors.check("password", validation::required(&self.password));
        if errors.get("password").is_none() {
            errors.check(
                "password",
                validation::length(&self.password, PASSWORD_MIN_LEN, usize::MAX),
            );
        }
        errors
    }
}

pub struct LoginView {
    ctx: ViewContext,
    form: Mutex<LoginForm>,
    on_error: Mutex<bool>,
    in_flight: InFlight,
}

impl LoginView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            form: Mutex::new(LoginForm::default()),
            on_error: Mutex::new(false),
            in_flight: InFlight::default(),
        }
    }

    pub fn form(&self) -> LoginForm {
        self.form.lock().clone()
    }

    pub fn set_form(&self, form: LoginForm) {
        *self.form.lock() = form;
    }

    /// Whether the last attempt failed
    pub fn on_error(&self) -> bool {
        *self.on_error.lock()
    }

    pub fn can_submit(&self) -> bool {
        self.form.lock().validate().is_empty() && !self.in_flight.is_set()
    }

    /// Exchange the form's credentials for an identity.
    ///
    /// On success the identity goes into the store and the sessions list
    /// opens. On failure the store is left alone and [`LoginView::on_error`]
    /// turns true.
    pub async fn submit(&self) -> Result<SessionInformation, ViewError> {
        let form = self.form();
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(ViewError::InvalidForm(errors));
        }
        let _guard = self.in_flight.begin()?;

        let request = LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password,
        };
        match self.ctx.auth.login(&request).await {
            Ok(information) => {
                *self.on_error.lock() = false;
                self.ctx.store.log_in(information.clone());
                self.ctx.navigate(Route::Sessions);
                Ok(information)
            }
            Err(e) => {
                warn!(email = %request.email, error = %e, "Login failed");
                *self.on_error.lock() = true;
                Err(e.into())
            }
        }
    }
}
