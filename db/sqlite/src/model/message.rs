use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct MessageModel {
    id: Uuid,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    subject: String,
    body: String,
    is_read: bool,
}

impl MessageModel {
    pub fn new(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        name: &str,
        email: &str,
        subject: &str,
        body: &str,
        is_read: &bool,
    ) -> Self {
        Self {
            id: *id,
            created_at: *created_at,
            name: name.to_owned(),
            email: email.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
            is_read: *is_read,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

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

    pub fn is_read(&self) -> &bool {
        &self.is_read
    }
}
