use chrono::{DateTime, Utc};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(FromRow)]
pub struct ActivityLogModel {
    id: Uuid,
    created_at: DateTime<Utc>,
    user_id: Option<Uuid>,
    action: String,
    detail: String,
}

impl ActivityLogModel {
    pub fn new(
        id: &Uuid,
        created_at: &DateTime<Utc>,
        user_id: &Option<Uuid>,
        action: &str,
        detail: &str,
    ) -> Self {
        Self {
            id: *id,
            created_at: *created_at,
            user_id: *user_id,
            action: action.to_owned(),
            detail: detail.to_owned(),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn user_id(&self) -> &Option<Uuid> {
        &self.user_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
