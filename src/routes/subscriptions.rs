use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::new_subscriber::{NewSubscriber, NewSubscriberBody};
use crate::routes::errors::{error_chain_fmt, error_response};

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to subscribe")]
    DatabaseError(#[source] sqlx::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self.status_code(), &self.to_string())
    }
}

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, db_pool),
    fields(
        subscriber_email = ?body.email,
        subscriber_name = ?body.name
    )
)]
pub async fn handle_create_subscription(
    body: web::Json<NewSubscriberBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body.try_into().map_err(|err: String| {
        tracing::error!("Validation error: {:?}", err);
        SubscribeError::ValidationError(err)
    })?;

    let subscriber_id = create_subscription(&new_subscriber, &db_pool)
        .await
        .map_err(SubscribeError::DatabaseError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "id": subscriber_id })))
}

#[tracing::instrument(
    name = "Insert a new subscriber into the database",
    skip(new_subscriber, db_pool)
)]
async fn create_subscription(
    new_subscriber: &NewSubscriber,
    db_pool: &PgPool,
) -> Result<Uuid, sqlx::Error> {
    let subscriber_id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO subscribers (id, name, email, whatsapp, telegram, subscribed_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(subscriber_id)
    .bind(new_subscriber.name.as_ref().map(|name| name.as_ref()))
    .bind(new_subscriber.email.as_ref().map(|email| email.as_ref()))
    .bind(&new_subscriber.whatsapp)
    .bind(&new_subscriber.telegram)
    .bind(Utc::now())
    .execute(db_pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to execute query: {:?}", err);
        err
    })?;

    Ok(subscriber_id)
}
