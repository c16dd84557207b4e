use actix_web::web;
use serde::Deserialize;

use crate::domain::email_address::EmailAddress;
use crate::domain::non_blank;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug)]
pub struct NewSubscriber {
    pub name: Option<SubscriberName>,
    pub email: Option<EmailAddress>,
    pub whatsapp: Option<String>,
    pub telegram: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NewSubscriberBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    pub telegram: Option<String>,
}

impl TryFrom<NewSubscriberBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: NewSubscriberBody) -> Result<Self, Self::Error> {
        let email = non_blank(&body.email).map(EmailAddress::parse).transpose()?;
        let whatsapp = non_blank(&body.whatsapp);
        let telegram = non_blank(&body.telegram);

        if email.is_none() && whatsapp.is_none() && telegram.is_none() {
            return Err(String::from("Provide at least one contact"));
        }

        let name = non_blank(&body.name).map(SubscriberName::parse).transpose()?;

        Ok(NewSubscriber {
            name,
            email,
            whatsapp,
            telegram,
        })
    }
}

impl TryFrom<web::Json<NewSubscriberBody>> for NewSubscriber {
    type Error = String;

    fn try_from(body: web::Json<NewSubscriberBody>) -> Result<Self, Self::Error> {
        body.into_inner().try_into()
    }
}
