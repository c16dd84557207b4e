use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::InternalError;
use actix_web::http::header::{self, HeaderMap};
use actix_web::{web, HttpResponse};
use actix_web_lab::middleware::Next;
use anyhow::Context;

use crate::config::AdminSettings;

pub fn bearer_token(headers: &HeaderMap) -> Result<String, anyhow::Error> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .context("The 'Authorization' header was missing")?
        .to_str()
        .context("The 'Authorization' header was not a valid UTF8 string.")?;

    let token = header_value
        .strip_prefix("Bearer ")
        .context("The authorization scheme was not 'Bearer'.")?
        .trim();

    if token.is_empty() {
        anyhow::bail!("The bearer token was empty.");
    }

    Ok(token.to_string())
}

fn unauthorized(err: anyhow::Error, message: &str) -> actix_web::Error {
    let response = HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, r#"Bearer realm="admin""#))
        .json(serde_json::json!({ "error": message }));

    InternalError::from_response(err, response).into()
}

/// Lets a request through only when it carries the configured admin token.
pub async fn require_admin_token(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let admin = req
        .app_data::<web::Data<AdminSettings>>()
        .cloned()
        .ok_or_else(|| {
            actix_web::error::ErrorInternalServerError("Admin settings are not configured")
        })?;

    if admin.skip_auth {
        return next.call(req).await;
    }

    let token = bearer_token(req.headers()).map_err(|err| {
        tracing::warn!(error.cause_chain = ?err, "Rejected admin request");
        unauthorized(err, "Missing token")
    })?;

    if !admin.accepts(&token) {
        tracing::warn!("Rejected admin request with an invalid token");
        return Err(unauthorized(
            anyhow::anyhow!("The bearer token did not match."),
            "Invalid token",
        ));
    }

    next.call(req).await
}
