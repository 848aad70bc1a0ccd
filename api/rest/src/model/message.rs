use chrono::{DateTime, Utc};
use pp_dao::message::MessageDao;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::not_blank;

#[derive(Deserialize, Validate)]
pub struct InsertOneMessageReqJson {
    #[validate(
        length(max = 200, message = "name is too long"),
        custom(function = "not_blank", message = "name must not be empty")
    )]
    name: String,
    #[validate(email(message = "email is not a valid address"))]
    email: String,
    #[validate(
        length(max = 200, message = "subject is too long"),
        custom(function = "not_blank", message = "subject must not be empty")
    )]
    subject: String,
    #[validate(
        length(max = 5000, message = "body must be at most 5000 characters"),
        custom(function = "not_blank", message = "body must not be empty")
    )]
    body: String,
}

impl InsertOneMessageReqJson {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[derive(Serialize)]
pub struct InsertOneMessageResJson {
    id: Uuid,
}

impl InsertOneMessageResJson {
    pub fn new(id: &Uuid) -> Self {
        Self { id: *id }
    }
}

#[derive(Deserialize)]
pub struct FindManyMessageReqQuery {
    unread: Option<bool>,
    page: Option<i64>,
    limit: Option<i64>,
}

impl FindManyMessageReqQuery {
    pub fn unread(&self) -> &Option<bool> {
        &self.unread
    }

    pub fn page(&self) -> &Option<i64> {
        &self.page
    }

    pub fn limit(&self) -> &Option<i64> {
        &self.limit
    }
}

#[derive(Deserialize)]
pub struct MessageReqPath {
    message_id: Uuid,
}

impl MessageReqPath {
    pub fn message_id(&self) -> &Uuid {
        &self.message_id
    }
}

#[derive(Deserialize)]
pub struct UpdateOneMessageReqJson {
    is_read: bool,
}

impl UpdateOneMessageReqJson {
    pub fn is_read(&self) -> &bool {
        &self.is_read
    }
}

#[derive(Serialize)]
pub struct MessageResJson {
    id: Uuid,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    subject: String,
    body: String,
    is_read: bool,
}

impl MessageResJson {
    pub fn from_dao(message: &MessageDao) -> Self {
        Self {
            id: *message.id(),
            created_at: *message.created_at(),
            name: message.name().to_owned(),
            email: message.email().to_owned(),
            subject: message.subject().to_owned(),
            body: message.body().to_owned(),
            is_read: *message.is_read(),
        }
    }
}
