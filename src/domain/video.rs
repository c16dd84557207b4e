use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::content_title::ContentTitle;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub language: Option<String>,
    pub category: Option<String>,
    pub link: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewVideo {
    pub title: ContentTitle,
    pub language: Option<String>,
    pub category: Option<String>,
    pub link: String,
}

#[derive(Deserialize, Debug)]
pub struct NewVideoBody {
    pub title: String,
    pub language: Option<String>,
    pub category: Option<String>,
    pub link: String,
}

/// Partial update: absent fields keep their stored value.
#[derive(Deserialize, Debug, Default)]
pub struct VideoChanges {
    pub title: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub link: Option<String>,
}

impl TryFrom<NewVideoBody> for NewVideo {
    type Error = String;

    fn try_from(body: NewVideoBody) -> Result<Self, Self::Error> {
        let title = ContentTitle::parse(body.title)?;
        let link = body.link.trim().to_string();

        if link.is_empty() {
            return Err(String::from("video link cannot be empty"));
        }

        Ok(NewVideo {
            title,
            language: body.language,
            category: body.category,
            link,
        })
    }
}

impl VideoChanges {
    pub fn validate(self) -> Result<Self, String> {
        let title = self
            .title
            .map(ContentTitle::parse)
            .transpose()?
            .map(|title| title.as_ref().to_string());

        if matches!(self.link.as_deref().map(str::trim), Some("")) {
            return Err(String::from("video link cannot be empty"));
        }

        Ok(Self { title, ..self })
    }
}
