use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::message::MessageModel};

const INSERT: &str = "INSERT INTO \"messages\" (\"id\", \"created_at\", \"name\", \"email\", \"subject\", \"body\", \"is_read\") VALUES ($1, $2, $3, $4, $5, $6, $7)";
const SELECT: &str = "SELECT \"id\", \"created_at\", \"name\", \"email\", \"subject\", \"body\", \"is_read\" FROM \"messages\" WHERE \"id\" = $1";
const SELECT_MANY: &str = "SELECT \"id\", \"created_at\", \"name\", \"email\", \"subject\", \"body\", \"is_read\" FROM \"messages\"";
const COUNT: &str = "SELECT COUNT(1) FROM \"messages\"";
const UPDATE: &str = "UPDATE \"messages\" SET \"is_read\" = $1 WHERE \"id\" = $2";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    pp_log::info(Some("🔧"), "[PostgreSQL] Setting up messages table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"messages\" (\"id\" uuid, \"created_at\" timestamptz(6), \"name\" text, \"email\" text, \"subject\" text, \"body\" text, \"is_read\" boolean, PRIMARY KEY (\"id\"))").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(SELECT),
        pool.prepare(UPDATE),
    )?;

    Ok(())
}

impl PostgresDb {
    pub async fn insert_message(&self, value: &MessageModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.created_at())
                .bind(value.name())
                .bind(value.email())
                .bind(value.subject())
                .bind(value.body())
                .bind(value.is_read()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_message(&self, id: &Uuid) -> Result<Option<MessageModel>> {
        Ok(self.fetch_optional(sqlx::query_as(SELECT).bind(id)).await?)
    }

    pub async fn select_many_messages(
        &self,
        unread_only: &bool,
        limit: &i64,
        offset: &i64,
    ) -> Result<Vec<MessageModel>> {
        let mut sql = SELECT_MANY.to_owned();
        if *unread_only {
            sql += " WHERE \"is_read\" = FALSE";
        }
        sql += " ORDER BY \"id\" DESC LIMIT $1 OFFSET $2";

        Ok(self
            .fetch_all(sqlx::query_as(&sql).bind(limit).bind(offset))
            .await?)
    }

    pub async fn count_messages(&self, unread_only: &bool) -> Result<i64> {
        let mut sql = COUNT.to_owned();
        if *unread_only {
            sql += " WHERE \"is_read\" = FALSE";
        }

        Ok(self.fetch_one::<(i64,)>(sqlx::query_as(&sql)).await?.0)
    }

    pub async fn update_message(&self, value: &MessageModel) -> Result<()> {
        self.execute(sqlx::query(UPDATE).bind(value.is_read()).bind(value.id()))
            .await?;
        Ok(())
    }
}
