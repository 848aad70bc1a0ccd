use anyhow::Result;
use chrono::{DateTime, Utc};
use pp_db_postgresql::model::message::MessageModel as MessagePostgresModel;
use pp_db_sqlite::model::message::MessageModel as MessageSqliteModel;
use uuid::Uuid;

use crate::{dto::pagination::Pagination, user::normalize_email, Db};

pub struct MessageDao {
    id: Uuid,
    created_at: DateTime<Utc>,
    name: String,
    email: String,
    subject: String,
    body: String,
    is_read: bool,
}

impl MessageDao {
    pub fn new(name: &str, email: &str, subject: &str, body: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            name: name.trim().to_owned(),
            email: normalize_email(email),
            subject: subject.trim().to_owned(),
            body: body.trim().to_owned(),
            is_read: false,
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

    pub fn set_is_read(&mut self, is_read: &bool) {
        self.is_read = *is_read;
    }

    pub async fn db_insert(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.insert_message(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.insert_message(&self.to_sqlitedb_model()).await,
        }
    }

    pub async fn db_select(db: &Db, id: &Uuid) -> Result<Option<Self>> {
        match db {
            Db::PostgresqlDb(db) => Ok(db
                .select_message(id)
                .await?
                .map(|model| Self::from_postgresdb_model(&model))),
            Db::SqliteDb(db) => Ok(db
                .select_message(id)
                .await?
                .map(|model| Self::from_sqlitedb_model(&model))),
        }
    }

    pub async fn db_select_many(
        db: &Db,
        unread_only: &bool,
        pagination: &Pagination,
    ) -> Result<(Vec<Self>, i64)> {
        let offset = pagination.offset();
        match db {
            Db::PostgresqlDb(db) => {
                let (messages, total) = tokio::try_join!(
                    db.select_many_messages(unread_only, pagination.limit(), &offset),
                    db.count_messages(unread_only)
                )?;
                Ok((
                    messages.iter().map(Self::from_postgresdb_model).collect(),
                    total,
                ))
            }
            Db::SqliteDb(db) => {
                let (messages, total) = tokio::try_join!(
                    db.select_many_messages(unread_only, pagination.limit(), &offset),
                    db.count_messages(unread_only)
                )?;
                Ok((
                    messages.iter().map(Self::from_sqlitedb_model).collect(),
                    total,
                ))
            }
        }
    }

    pub async fn db_update(&self, db: &Db) -> Result<()> {
        match db {
            Db::PostgresqlDb(db) => db.update_message(&self.to_postgresdb_model()).await,
            Db::SqliteDb(db) => db.update_message(&self.to_sqlitedb_model()).await,
        }
    }

    fn from_postgresdb_model(model: &MessagePostgresModel) -> Self {
        Self {
            id: *model.id(),
            created_at: *model.created_at(),
            name: model.name().to_owned(),
            email: model.email().to_owned(),
            subject: model.subject().to_owned(),
            body: model.body().to_owned(),
            is_read: *model.is_read(),
        }
    }

    fn to_postgresdb_model(&self) -> MessagePostgresModel {
        MessagePostgresModel::new(
            &self.id,
            &self.created_at,
            &self.name,
            &self.email,
            &self.subject,
            &self.body,
            &self.is_read,
        )
    }

    fn from_sqlitedb_model(model: &MessageSqliteModel) -> Self {
        Self {
            id: *model.id(),
            created_at: *model.created_at(),
            name: model.name().to_owned(),
            email: model.email().to_owned(),
            subject: model.subject().to_owned(),
            body: model.body().to_owned(),
            is_read: *model.is_read(),
        }
    }

    fn to_sqlitedb_model(&self) -> MessageSqliteModel {
        MessageSqliteModel::new(
            &self.id,
            &self.created_at,
            &self.name,
            &self.email,
            &self.subject,
            &self.body,
            &self.is_read,
        )
    }
}
