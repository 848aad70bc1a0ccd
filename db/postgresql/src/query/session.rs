use anyhow::Result;
use chrono::Utc;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::session::SessionModel};

const INSERT: &str = "INSERT INTO \"sessions\" (\"id\", \"created_at\", \"expires_at\", \"user_id\") VALUES ($1, $2, $3, $4)";
const SELECT: &str = "SELECT \"id\", \"created_at\", \"expires_at\", \"user_id\" FROM \"sessions\" WHERE \"id\" = $1 AND \"expires_at\" > $2";
const UPDATE: &str = "UPDATE \"sessions\" SET \"expires_at\" = $1 WHERE \"id\" = $2";
const DELETE: &str = "DELETE FROM \"sessions\" WHERE \"id\" = $1";
const DELETE_MANY_BY_USER_ID: &str = "DELETE FROM \"sessions\" WHERE \"user_id\" = $1";
const DELETE_EXPIRE: &str = "DELETE FROM \"sessions\" WHERE \"expires_at\" <= $1";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    pp_log::info(Some("🔧"), "[PostgreSQL] Setting up sessions table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"sessions\" (\"id\" uuid, \"created_at\" timestamptz(6), \"expires_at\" timestamptz(6), \"user_id\" uuid, PRIMARY KEY (\"id\"))").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(SELECT),
        pool.prepare(UPDATE),
        pool.prepare(DELETE),
        pool.prepare(DELETE_MANY_BY_USER_ID),
        pool.prepare(DELETE_EXPIRE),
    )?;

    Ok(())
}

impl PostgresDb {
    pub async fn insert_session(&self, value: &SessionModel) -> Result<()> {
        self.delete_expired_sessions().await?;

        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.created_at())
                .bind(value.expires_at())
                .bind(value.user_id()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_session(&self, id: &Uuid) -> Result<Option<SessionModel>> {
        Ok(self
            .fetch_optional(sqlx::query_as(SELECT).bind(id).bind(Utc::now()))
            .await?)
    }

    pub async fn update_session(&self, value: &SessionModel) -> Result<()> {
        self.execute(
            sqlx::query(UPDATE)
                .bind(value.expires_at())
                .bind(value.id()),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_session(&self, id: &Uuid) -> Result<()> {
        self.execute(sqlx::query(DELETE).bind(id)).await?;
        Ok(())
    }

    pub async fn delete_many_sessions_by_user_id(&self, user_id: &Uuid) -> Result<()> {
        self.execute(sqlx::query(DELETE_MANY_BY_USER_ID).bind(user_id))
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> Result<()> {
        self.execute(sqlx::query(DELETE_EXPIRE).bind(Utc::now()))
            .await?;
        Ok(())
    }
}
