use std::sync::Arc;

use crate::domain::auth::{AuthErrorKind, FormData, SignInError, CREDENTIALS_PROVIDER};
use crate::domain::errors::DomainError;
use crate::domain::ports::Authenticator;

pub const DEFAULT_LOGIN_REDIRECT: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Redirect(String),
    /// Sign-in was refused; the message is shown on the login form.
    Rejected(&'static str),
}

pub struct AuthService {
    authenticator: Arc<dyn Authenticator>,
}

impl AuthService {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Sign in with the credentials provider. Failures the authenticator does
    /// not classify are returned as errors rather than shown on the form.
    pub fn authenticate(&self, form: &FormData) -> Result<LoginOutcome, DomainError> {
        match self.authenticator.sign_in(CREDENTIALS_PROVIDER, form) {
            Ok(()) => Ok(LoginOutcome::Redirect(redirect_target(form))),
            Err(SignInError::Auth(e)) => {
                log::info!("sign-in rejected: {:?}", e.kind);
                Ok(LoginOutcome::Rejected(match e.kind {
                    AuthErrorKind::CredentialsSignin => "Invalid credentials.",
                    _ => "Something went wrong.",
                }))
            }
            Err(SignInError::Unexpected(e)) => Err(DomainError::Internal(e)),
        }
    }
}

/// The form's `redirectTo`, when it names a path on this site.
fn redirect_target(form: &FormData) -> String {
    match form.get("redirectTo") {
        Some(target) if target.starts_with('/') && !target.starts_with("//") => target.clone(),
        _ => DEFAULT_LOGIN_REDIRECT.to_string(),
    }
}
