use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::email_address::EmailAddress;
use crate::notifier::{DeliveryChannel, DeliveryError};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: EmailAddress,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
pub struct SendEmailBody {
    personalizations: Vec<MailPersonalization>,
    from: MailAddress,
    subject: String,
    content: Vec<MailContent>,
}

#[derive(serde::Serialize)]
struct MailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(serde::Serialize)]
struct MailPersonalization {
    to: Vec<MailAddress>,
}

#[derive(serde::Serialize)]
struct MailContent {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: EmailAddress,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            api_key,
        })
    }

    #[tracing::instrument(
        name = "Sending an email",
        skip(self, plain_content, html_content),
        fields(recipient = %recipient)
    )]
    pub async fn send_email(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        plain_content: &str,
        html_content: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/mail/send", self.base_url);
        let body = SendEmailBody {
            from: MailAddress {
                email: String::from(self.sender.as_ref()),
                name: Some(String::from("Tube2Career")),
            },
            personalizations: vec![MailPersonalization {
                to: vec![MailAddress {
                    email: String::from(recipient.as_ref()),
                    name: None,
                }],
            }],
            subject: String::from(subject),
            // The plain text part must come first for the API to accept the request
            content: vec![
                MailContent {
                    content_type: String::from("text/plain"),
                    value: String::from(plain_content),
                },
                MailContent {
                    content_type: String::from("text/html"),
                    value: String::from(html_content),
                },
            ],
        };

        self.http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?; // return an error when server response status code is 4xx or 5xx

        Ok(())
    }
}

#[async_trait]
impl DeliveryChannel for EmailClient {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        plain_body: &str,
        html_body: &str,
    ) -> Result<(), DeliveryError> {
        let recipient = EmailAddress::parse(to.to_string())
            .map_err(|_| DeliveryError::InvalidRecipient(to.to_string()))?;

        self.send_email(&recipient, subject, plain_body, html_body)
            .await
            .map_err(DeliveryError::Transport)
    }
}
