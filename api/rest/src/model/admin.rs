use chrono::{DateTime, Utc};
use pp_dao::activity_log::ActivityLogDao;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct FindManyActivityLogReqQuery {
    before_id: Option<Uuid>,
    limit: Option<i64>,
}

impl FindManyActivityLogReqQuery {
    pub fn before_id(&self) -> &Option<Uuid> {
        &self.before_id
    }

    pub fn limit(&self) -> &Option<i64> {
        &self.limit
    }
}

#[derive(Serialize)]
pub struct ActivityLogResJson {
    id: Uuid,
    created_at: DateTime<Utc>,
    user_id: Option<Uuid>,
    action: String,
    detail: String,
}

impl ActivityLogResJson {
    pub fn from_dao(log: &ActivityLogDao) -> Self {
        Self {
            id: *log.id(),
            created_at: *log.created_at(),
            user_id: *log.user_id(),
            action: log.action().to_string(),
            detail: log.detail().to_owned(),
        }
    }
}
