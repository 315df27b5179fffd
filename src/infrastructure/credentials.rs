use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::auth::{AuthError, AuthErrorKind, FormData, SignInError, CREDENTIALS_PROVIDER};
use crate::domain::errors::DomainError;
use crate::domain::ports::Authenticator;
use crate::schema::users;

use super::models::{NewUserRow, UserRow};
use super::password::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 6;

/// Email/password sign-in against the `users` table.
pub struct DieselCredentialsProvider {
    pool: DbPool,
}

impl DieselCredentialsProvider {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the user, or reset name and password if the email exists.
    pub fn ensure_user(&self, name: &str, email: &str, password: &str) -> Result<(), DomainError> {
        let hashed = hash_password(password)?;
        let mut conn = self.pool.get()?;
        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                password: hashed.clone(),
            })
            .on_conflict(users::email)
            .do_update()
            .set((users::name.eq(name), users::password.eq(&hashed)))
            .execute(&mut conn)?;
        Ok(())
    }
}

impl Authenticator for DieselCredentialsProvider {
    fn sign_in(&self, provider: &str, form: &FormData) -> Result<(), SignInError> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(AuthError::new(AuthErrorKind::InvalidProvider).into());
        }
        let (email, password) = parse_credentials(form).ok_or_else(rejected)?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| SignInError::Unexpected(e.to_string()))?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| {
                log::error!("failed to look up user: {}", e);
                AuthError::new(AuthErrorKind::CallbackRouteError)
            })?;

        match user {
            Some(user) if verify_password(password, &user.password) => {
                log::info!("user {} signed in", user.id);
                Ok(())
            }
            _ => Err(rejected()),
        }
    }
}

fn rejected() -> SignInError {
    AuthError::new(AuthErrorKind::CredentialsSignin).into()
}

/// Email and password from the form, if both are plausible.
fn parse_credentials(form: &FormData) -> Option<(&str, &str)> {
    let email = form.get("email")?.as_str();
    let password = form.get("password")?.as_str();

    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
        return None;
    }
    Some((email, password))
}
