use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored subscriber record. Contact fields are kept as they were entered,
/// so consumers must tolerate blank values.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub telegram: Option<String>,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscriber {
    /// The email address to notify, if the subscriber left a non-empty one.
    pub fn notification_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}
