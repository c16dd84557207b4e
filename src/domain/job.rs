use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::content_title::ContentTitle;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub apply_link: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewJob {
    pub title: ContentTitle,
    pub company: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub apply_link: Option<String>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewJobBody {
    pub title: String,
    pub company: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub apply_link: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub apply_link: Option<String>,
    pub deadline: Option<NaiveDate>,
}

impl TryFrom<NewJobBody> for NewJob {
    type Error = String;

    fn try_from(body: NewJobBody) -> Result<Self, Self::Error> {
        let title = ContentTitle::parse(body.title)?;

        Ok(NewJob {
            title,
            company: body.company.unwrap_or_default(),
            category: body.category,
            description: body.description,
            apply_link: body.apply_link,
            deadline: body.deadline,
        })
    }
}

impl JobChanges {
    pub fn validate(self) -> Result<Self, String> {
        let title = self
            .title
            .map(ContentTitle::parse)
            .transpose()?
            .map(|title| title.as_ref().to_string());

        Ok(Self { title, ..self })
    }
}
