use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, Utc};
use pp_db_postgresql::model::activity_log::ActivityLogModel as ActivityLogPostgresModel;
use pp_db_sqlite::model::activity_log::ActivityLogModel as ActivityLogSqliteModel;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::Db;

pub struct ActivityLogDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    user_id: Option<Uuid>,
    action: ActivityAction,
    detail: String,
}

impl ActivityLogDao {
    pub fn new(user_id: &Option<Uuid>, action: &ActivityAction, detail: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            user_id: *user_id,
            action: *action,
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

    pub fn action(&self) -> &ActivityAction {
        &self.action
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Entries older than the database's log ttl are dropped before writing.
    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.insert_activity_log(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.insert_activity_log(&self.to_sqlitedb_model()).await,
        }
    }

    /// Newest first. `before_id` continues from the last entry of a previous page.
    pub async fn db_select_many(
        db: &Db,
        before_id: &Option<Uuid>,
        limit: &i64,
    ) -> Result<(Vec<Self>, i64)> {
        match db {
            Db::PostgresqlDb(db) => {
                let (logs, total) = tokio::try_join!(
                    db.select_many_activity_logs(before_id, limit),
                    db.count_activity_logs()
                )?;
                Ok((
                    logs.iter()
                        .map(Self::from_postgresdb_model)
                        .collect::<Result<_>>()?,
                    total,
                ))
            }
            Db::SqliteDb(db) => {
                let (logs, total) = tokio::try_join!(
                    db.select_many_activity_logs(before_id, limit),
                    db.count_activity_logs()
                )?;
                Ok((
                    logs.iter()
                        .map(Self::from_sqlitedb_model)
                        .collect::<Result<_>>()?,
                    total,
                ))
            }
        }
    }

    fn from_postgresdb_model(model: &ActivityLogPostgresModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            user_id: *model.user_id(),
            action: ActivityAction::from_str(model.action())?,
            detail: model.detail().to_owned(),
        })
    }

    fn to_postgresdb_model(&self) -> ActivityLogPostgresModel {
        ActivityLogPostgresModel::new(
            &self.id,
            &self.created_at,
            &self.user_id,
            &self.action.to_string(),
            &self.detail,
        )
    }

    fn from_sqlitedb_model(model: &ActivityLogSqliteModel) -> Result<Self> {
        Ok(Self {
            id: *model.id(),
            created_at: *model.created_at(),
            user_id: *model.user_id(),
            action: ActivityAction::from_str(model.action())?,
            detail: model.detail().to_owned(),
        })
    }

    fn to_sqlitedb_model(&self) -> ActivityLogSqliteModel {
        ActivityLogSqliteModel::new(
            &self.id,
            &self.created_at,
            &self.user_id,
            &self.action.to_string(),
            &self.detail,
        )
    }
}

#[derive(EnumString, Display, PartialEq, Eq, Clone, Copy, Debug)]
pub enum ActivityAction {
    #[strum(serialize = "user.register")]
    UserRegister,
    #[strum(serialize = "user.verify_email")]
    UserVerifyEmail,
    #[strum(serialize = "user.login")]
    UserLogin,
    #[strum(serialize = "user.logout")]
    UserLogout,
    #[strum(serialize = "user.reset_password")]
    UserResetPassword,
    #[strum(serialize = "account.update")]
    AccountUpdate,
    #[strum(serialize = "account.change_password")]
    AccountChangePassword,
    #[strum(serialize = "application.submit")]
    ApplicationSubmit,
    #[strum(serialize = "application.update")]
    ApplicationUpdate,
    #[strum(serialize = "application.review")]
    ApplicationReview,
    #[strum(serialize = "message.submit")]
    MessageSubmit,
    #[strum(serialize = "message.update")]
    MessageUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[test]
    fn action_names_are_dotted() {
        assert_eq!(ActivityAction::UserRegister.to_string(), "user.register");
        assert_eq!(
            ActivityAction::from_str("application.review").unwrap(),
            ActivityAction::ApplicationReview
        );
    }

    #[tokio::test]
    async fn pages_backwards_from_newest() {
        let db = test_db::sqlite().await;
        let user_id = Some(Uuid::now_v7());
        for action in [
            ActivityAction::UserRegister,
            ActivityAction::UserVerifyEmail,
            ActivityAction::UserLogin,
        ] {
            ActivityLogDao::new(&user_id, &action, "")
                .db_insert(&db)
                .await
                .unwrap();
        }

        let (first, total) = ActivityLogDao::db_select_many(&db, &None, &2)
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].action(), &ActivityAction::UserLogin);

        let (rest, _) = ActivityLogDao::db_select_many(&db, &Some(*first[1].id()), &2)
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].action(), &ActivityAction::UserRegister);
    }
}
