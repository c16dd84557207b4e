use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::domain::publish_event::PublishEvent;
use crate::notifier::{Notifier, StoreError};
use crate::routes::errors::{error_chain_fmt, error_response};

#[derive(thiserror::Error)]
#[error("Notification failed")]
pub struct NotifyError(#[from] StoreError);

impl std::fmt::Debug for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for NotifyError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self.status_code(), &self.to_string())
    }
}

/// Sends an admin-composed event to every subscriber and waits for the fan-out
/// to finish. Only a failure to read the subscriber list is reported back.
#[tracing::instrument(
    name = "Manual notification",
    skip(event, notifier),
    fields(
        kind = ?event.kind,
        title = %event.title
    )
)]
pub async fn notify_subscribers(
    event: web::Json<PublishEvent>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, NotifyError> {
    notifier.notify_all(&event).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
