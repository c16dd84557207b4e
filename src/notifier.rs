use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::domain::publish_event::PublishEvent;
use crate::domain::subscriber::Subscriber;

/// Read access to the people who asked to be notified.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError>;
}

/// Outbound transport able to deliver one message to one address.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        plain_body: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to read subscribers from the database.")]
    Database(#[from] sqlx::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("{0} is not a deliverable address.")]
    InvalidRecipient(String),
    #[error("The email API rejected or did not answer the request.")]
    Transport(#[from] reqwest::Error),
}

/// Fans a publish event out to every subscriber with an email address.
///
/// Built once at start-up and shared by every request. Each invocation reads
/// the whole subscriber list, sends at most one message per distinct address
/// and keeps going when a single delivery fails.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn SubscriberStore>,
    channel: Arc<dyn DeliveryChannel>,
}

impl Notifier {
    pub fn new(store: Arc<dyn SubscriberStore>, channel: Arc<dyn DeliveryChannel>) -> Self {
        Self { store, channel }
    }

    #[tracing::instrument(
        name = "Notifying subscribers about a publish event",
        skip(self, event),
        fields(
            kind = ?event.kind,
            title = %event.title
        )
    )]
    pub async fn notify_all(&self, event: &PublishEvent) -> Result<(), StoreError> {
        let subscribers = self.store.list_subscribers().await?;
        let message = event.render();
        let mut seen_emails: HashSet<&str> = HashSet::new();

        for subscriber in &subscribers {
            let Some(email) = subscriber.notification_email() else {
                continue;
            };

            // Addresses are compared verbatim, case included.
            if !seen_emails.insert(email) {
                continue;
            }

            if let Err(err) = self
                .channel
                .send(
                    email,
                    &message.subject,
                    &message.plain_body,
                    &message.html_body,
                )
                .await
            {
                tracing::error!(
                    subscriber_id = %subscriber.id,
                    error.cause_chain = ?err,
                    "Failed to notify subscriber"
                );
            }
        }

        tracing::info!(recipients = seen_emails.len(), "Notification fan-out finished");

        Ok(())
    }

    /// Runs `notify_all` on a detached task. Whatever happens there is only
    /// logged, the caller never hears about it.
    pub fn spawn_notify_all(&self, event: PublishEvent) -> JoinHandle<()> {
        let notifier = self.clone();
        let span = tracing::info_span!(
            "Background notification",
            kind = ?event.kind,
            title = %event.title
        );

        tokio::spawn(
            async move {
                if let Err(err) = notifier.notify_all(&event).await {
                    tracing::error!(error.cause_chain = ?err, "Failed to notify subscribers");
                }
            }
            .instrument(span),
        )
    }
}
