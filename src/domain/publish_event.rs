use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Video,
    Job,
    #[default]
    #[serde(other)]
    Manual,
}

/// Something that was just published and that subscribers should hear about.
///
/// Events are never persisted: they are rendered once by the notifier and then
/// dropped. Optional fields that a kind does not use are simply left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEvent {
    #[serde(rename = "type", default, deserialize_with = "deserialize_kind")]
    pub kind: EventKind,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub title: String,
    pub link: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub apply_link: Option<String>,
}

/// Only the exact strings `"video"` and `"job"` select a template; `null`,
/// numbers and unknown names all fall back to a manual notification.
fn deserialize_kind<'de, D>(deserializer: D) -> Result<EventKind, D::Error>
where
    D: Deserializer<'de>,
{
    let kind = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(name) if name == "video" => EventKind::Video,
        serde_json::Value::String(name) if name == "job" => EventKind::Job,
        _ => EventKind::Manual,
    };
    Ok(kind)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
}

impl PublishEvent {
    pub fn video(title: &str, link: &str, language: Option<&str>) -> Self {
        Self {
            kind: EventKind::Video,
            title: title.to_string(),
            link: Some(link.to_string()),
            language: language.map(String::from),
            ..Default::default()
        }
    }

    pub fn job(title: &str, description: Option<&str>, apply_link: Option<&str>) -> Self {
        Self {
            kind: EventKind::Job,
            title: title.to_string(),
            description: description.map(String::from),
            apply_link: apply_link.map(String::from),
            ..Default::default()
        }
    }

    /// Renders the subject and both bodies of the notification email.
    ///
    /// Only videos get the video template; jobs, manual notifications and any
    /// unrecognised kind all use the job template.
    pub fn render(&self) -> RenderedMessage {
        let title = self.title.as_str();
        let description = self.description.as_deref().unwrap_or_default();

        let (subject, plain_body) = match self.kind {
            EventKind::Video => (
                format!("New Video: {}", title),
                format!("{}\n{}", title, self.link.as_deref().unwrap_or_default()),
            ),
            EventKind::Job | EventKind::Manual => (
                format!("New Job: {}", title),
                format!(
                    "{}\n\n{}\nApply: {}",
                    title,
                    description,
                    self.apply_link.as_deref().unwrap_or_default()
                ),
            ),
        };

        let target = self
            .apply_link
            .as_deref()
            .filter(|link| !link.is_empty())
            .or_else(|| self.link.as_deref().filter(|link| !link.is_empty()))
            .unwrap_or("#");

        let html_body = format!(
            r#"<b>{}</b><br/><p>{}</p><p><a href="{}">Open</a></p>"#,
            htmlescape::encode_minimal(title),
            htmlescape::encode_minimal(description),
            htmlescape::encode_minimal(target)
        );

        RenderedMessage {
            subject,
            plain_body,
            html_body,
        }
    }
}
