use std::time::Duration;

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use pp_db_postgresql::model::session::SessionModel as SessionPostgresModel;
use pp_db_sqlite::model::session::SessionModel as SessionSqliteModel;
use uuid::Uuid;

use crate::Db;

pub struct SessionDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    user_id: Uuid,
}

impl SessionDao {
    pub fn new(user_id: &Uuid, ttl: &Duration) -> Result<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            created_at: now,
            expires_at: expires_from(&now, ttl)?,
            user_id: *user_id,
        })
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

    /// Pushes the expiry to `ttl` from now.
    pub fn extend(&mut self, ttl: &Duration) -> Result<()> {
        self.expires_at = expires_from(&Utc::now(), ttl)?;
        Ok(())
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.insert_session(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.insert_session(&self.to_sqlitedb_model()).await,
        }
    }

    /// Expired sessions are reported as missing.
    pub async fn db_select(db: &Db, id: &Uuid) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_session(id)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))),
            Db::SqliteDb(db) => Ok(db
                .select_session(id)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))),
        }
    }

    pub async fn db_update(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.update_session(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.update_session(&self.to_sqlitedb_model()).await,
        }
    }

    pub async fn db_delete(db: &Db, id: &Uuid) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.delete_session(id).await,
            Db::SqliteDb(db) => db.delete_session(id).await,
        }
    }

    pub async fn db_delete_many_by_user_id(db: &Db, user_id: &Uuid) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.delete_many_sessions_by_user_id(user_id).await,
            Db::SqliteDb(db) => db.delete_many_sessions_by_user_id(user_id).await,
        }
    }

    fn from_postgresdb_model(model: &SessionPostgresModel) -> Self {
        Self {
            id: *model.id(),
            created_at: *model.created_at(),
            expires_at: *model.expires_at(),
            user_id: *model.user_id(),
        }
    }

    fn to_postgresdb_model(&self) -> SessionPostgresModel {
        SessionPostgresModel::new(&self.id, &self.created_at, &self.expires_at, &self.user_id)
    }

    fn from_sqlitedb_model(model: &SessionSqliteModel) -> Self {
        Self {
            id: *model.id(),
            created_at: *model.created_at(),
            expires_at: *model.expires_at(),
            user_id: *model.user_id(),
        }
    }

    fn to_sqlitedb_model(&self) -> SessionSqliteModel {
        SessionSqliteModel::new(&self.id, &self.created_at, &self.expires_at, &self.user_id)
    }
}

fn expires_from(now: &DateTime<Utc>, ttl: &Duration) -> Result<DateTime<Utc>> {
    now.checked_add_signed(chrono::Duration::from_std(*ttl)?)
        .ok_or_else(|| Error::msg("Session ttl is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    #[tokio::test]
    async fn expired_session_is_not_found() {
        let db = test_db::sqlite().await;
        let session = SessionDao::new(&Uuid::now_v7(), &Duration::from_secs(0)).unwrap();
        session.db_insert(&db).await.unwrap();

        assert!(SessionDao::db_select(&db, session.id())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn deletes_every_session_of_a_user() {
        let db = test_db::sqlite().await;
        let user_id = Uuid::now_v7();
        let ttl = Duration::from_secs(3600);
        let first = SessionDao::new(&user_id, &ttl).unwrap();
        let second = SessionDao::new(&user_id, &ttl).unwrap();
        let other = SessionDao::new(&Uuid::now_v7(), &ttl).unwrap();
        for session in [&first, &second, &other] {
            session.db_insert(&db).await.unwrap();
        }

        SessionDao::db_delete_many_by_user_id(&db, &user_id)
            .await
            .unwrap();

        assert!(SessionDao::db_select(&db, first.id()).await.unwrap().is_none());
        assert!(SessionDao::db_select(&db, second.id()).await.unwrap().is_none());
        assert!(SessionDao::db_select(&db, other.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn extend_persists_new_expiry() {
        let db = test_db::sqlite().await;
        let mut session = SessionDao::new(&Uuid::now_v7(), &Duration::from_secs(60)).unwrap();
        session.db_insert(&db).await.unwrap();

        session.extend(&Duration::from_secs(7200)).unwrap();
        session.db_update(&db).await.unwrap();

        let loaded = SessionDao::db_select(&db, session.id())
            .await
            .unwrap()
            .unwrap();
        assert!(*loaded.expires_at() > Utc::now() + chrono::Duration::hours(1));
        SessionDao::db_delete(&db, session.id()).await.unwrap();
        assert!(SessionDao::db_select(&db, session.id())
            .await
            .unwrap()
            .is_none());
    }
}
