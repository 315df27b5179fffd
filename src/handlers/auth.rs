use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::application::auth_service::{AuthService, LoginOutcome};
use crate::domain::auth::FormData;
use crate::errors::AppError;

use super::invoices::see_other;

/// POST /login
///
/// Credentials sign-in. Refused sign-ins come back as a message for the
/// login form; unexpected failures surface as a generic 500.
#[utoipa::path(
    post,
    path = "/login",
    request_body(
        content = HashMap<String, String>,
        content_type = "application/x-www-form-urlencoded",
        description = "`email`, `password` and an optional local `redirectTo` path"
    ),
    responses(
        (status = 303, description = "Signed in; redirect to `redirectTo` or /dashboard"),
        (status = 401, description = "Sign-in refused"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "auth"
)]
pub async fn authenticate(
    service: web::Data<AuthService>,
    form: web::Form<FormData>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let outcome = web::block(move || service.authenticate(&form)).await??;

    Ok(match outcome {
        LoginOutcome::Redirect(location) => see_other(&location),
        LoginOutcome::Rejected(message) => {
            HttpResponse::Unauthorized().json(json!({ "message": message }))
        }
    })
}
