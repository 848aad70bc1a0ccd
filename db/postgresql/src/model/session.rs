use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct SessionModel {
    id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    user_id: Uuid,
}

impl SessionModel {
    pub fn new(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        expires_at: &DateTime<Utc>,
        user_id: &Uuid,
    ) -> Self {
        Self {
            id: *id,
            created_at: *created_at,
            expires_at: *expires_at,
            user_id: *user_id,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn expires_at(&self) -> &DateTime<Utc> {
        &self.expires_at
    }

    pub fn user_id(&self) -> &Uuid {
        &self.user_id
    }
}
