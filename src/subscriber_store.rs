use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::subscriber::Subscriber;
use crate::notifier::{StoreError, SubscriberStore};

pub const SUBSCRIBER_COLUMNS: &str = "id, name, email, whatsapp, telegram, subscribed_at";

pub fn subscriber_from_row(row: PgRow) -> Subscriber {
    Subscriber {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        whatsapp: row.get("whatsapp"),
        telegram: row.get("telegram"),
        subscribed_at: row.get("subscribed_at"),
    }
}

/// Subscriber list backed by the `subscribers` table.
pub struct PgSubscriberStore {
    db_pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Fetching every subscriber", skip(self))]
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        let subscribers = sqlx::query(&format!(
            "SELECT {} FROM subscribers ORDER BY subscribed_at ASC",
            SUBSCRIBER_COLUMNS
        ))
        .map(subscriber_from_row)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(subscribers)
    }
}
