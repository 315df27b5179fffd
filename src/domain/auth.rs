use std::collections::HashMap;

use thiserror::Error;

/// Submitted form fields, passed through to the authenticator untouched.
pub type FormData = HashMap<String, String>;

/// Provider name used by the sign-in form.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The submitted credentials were rejected.
    CredentialsSignin,
    /// The provider failed while checking the credentials.
    CallbackRouteError,
    AccessDenied,
    InvalidProvider,
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authentication failed ({kind:?})")]
pub struct AuthError {
    pub kind: AuthErrorKind,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Error)]
pub enum SignInError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Anything the sign-in flow does not classify; never shown to the user.
    #[error("unexpected sign-in failure: {0}")]
    Unexpected(String),
}
