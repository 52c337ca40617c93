//! Account registration form.

use parking_lot::Mutex;
use tracing::{info, warn};

use super::validation::{self, FieldErrors};
use super::{InFlight, Route, ViewContext, ViewError};
use crate::models::RegisterRequest;

const NAME_LEN: (usize, usize) = (3, 20);
const PASSWORD_LEN: (usize, usize) = (3, 40);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("email", validation::email(&self.email));
        for (field, value, (min, max)) in [
            ("first_name", &self.first_name, NAME_LEN),
            ("last_name", &self.last_name, NAME_LEN),
            ("password", &self.password, PASSWORD_LEN),
        ] {
            let result = validation::required(value).and_then(|_| validation::length(value, min, max));
            errors.check(field, result);
        }
        errors
    }

    fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

pub struct RegisterView {
    ctx: ViewContext,
    form: Mutex<RegisterForm>,
    /// Server message of the last failed attempt
    on_error: Mutex<Option<String>>,
    in_flight: InFlight,
}

impl RegisterView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            form: Mutex::new(RegisterForm::default()),
            on_error: Mutex::new(None),
            in_flight: InFlight::default(),
        }
    }

    pub fn form(&self) -> RegisterForm {
        self.form.lock().clone()
    }

    pub fn set_form(&self, form: RegisterForm) {
        *self.form.lock() = form;
    }

    pub fn on_error(&self) -> bool {
        self.on_error.lock().is_some()
    }

    pub fn error_message(&self) -> Option<String> {
        self.on_error.lock().clone()
    }

    pub fn can_submit(&self) -> bool {
        self.form.lock().validate().is_empty() && !self.in_flight.is_set()
    }

    /// Create the account and open the login page
    pub async fn submit(&self) -> Result<(), ViewError> {
        let form = self.form();
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(ViewError::InvalidForm(errors));
        }
        let _guard = self.in_flight.begin()?;

        let request = form.to_request();
        match self.ctx.auth.register(&request).await {
            Ok(()) => {
                info!(email = %request.email, "Account registered");
                *self.on_error.lock() = None;
                self.ctx.navigate(Route::Login);
                Ok(())
            }
            Err(e) => {
                warn!(email = %request.email, error = %e, "Registration failed");
                *self.on_error.lock() = Some(e.user_message());
                Err(e.into())
            }
        }
    }
}
