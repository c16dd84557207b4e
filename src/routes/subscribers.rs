use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::routes::errors::ContentError;
use crate::subscriber_store::{subscriber_from_row, SUBSCRIBER_COLUMNS};

#[tracing::instrument(name = "Listing subscribers for the admin", skip(db_pool))]
pub async fn list_subscribers(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ContentError> {
    let subscribers = sqlx::query(&format!(
        "SELECT {} FROM subscribers ORDER BY subscribed_at DESC",
        SUBSCRIBER_COLUMNS
    ))
    .map(subscriber_from_row)
    .fetch_all(db_pool.get_ref())
    .await
    .map_err(|err| ContentError::DatabaseError("fetch subscribers", err))?;

    Ok(HttpResponse::Ok().json(subscribers))
}
