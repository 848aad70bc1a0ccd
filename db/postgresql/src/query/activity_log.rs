use anyhow::{Error, Result};
use chrono::{Duration, Utc};
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{db::PostgresDb, model::activity_log::ActivityLogModel};

const INSERT: &str = "INSERT INTO \"activity_logs\" (\"id\", \"created_at\", \"user_id\", \"action\", \"detail\") VALUES ($1, $2, $3, $4, $5)";
const SELECT_MANY: &str = "SELECT \"id\", \"created_at\", \"user_id\", \"action\", \"detail\" FROM \"activity_logs\"";
const COUNT: &str = "SELECT COUNT(1) FROM \"activity_logs\"";
const DELETE_EXPIRE: &str = "DELETE FROM \"activity_logs\" WHERE \"created_at\" < $1";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    pp_log::info(Some("🔧"), "[PostgreSQL] Setting up activity_logs table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"activity_logs\" (\"id\" uuid, \"created_at\" timestamptz(6), \"user_id\" uuid, \"action\" text, \"detail\" text, PRIMARY KEY (\"id\"))").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(COUNT),
        pool.prepare(DELETE_EXPIRE),
    )?;

    Ok(())
}

impl PostgresDb {
    pub async fn insert_activity_log(&self, value: &ActivityLogModel) -> Result<()> {
        self.delete_expired_activity_logs().await?;

        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.created_at())
                .bind(value.user_id())
                .bind(value.action())
                .bind(value.detail()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_many_activity_logs(
        &self,
        before_id: &Option<Uuid>,
        limit: &i64,
    ) -> Result<Vec<ActivityLogModel>> {
        let mut sql = SELECT_MANY.to_owned();
        if before_id.is_some() {
            sql += " WHERE \"id\" < $1 ORDER BY \"id\" DESC LIMIT $2";
        } else {
            sql += " ORDER BY \"id\" DESC LIMIT $1";
        }

        let mut query = sqlx::query_as(&sql);
        if let Some(before_id) = before_id {
            query = query.bind(before_id);
        }
        query = query.bind(limit);

        Ok(self.fetch_all(query).await?)
    }

    pub async fn count_activity_logs(&self) -> Result<i64> {
        Ok(self.fetch_one::<(i64,)>(sqlx::query_as(COUNT)).await?.0)
    }

    async fn delete_expired_activity_logs(&self) -> Result<()> {
        self.execute(
            sqlx::query(DELETE_EXPIRE).bind(
                Utc::now()
                    .checked_sub_signed(
                        Duration::try_seconds(*self.table_log_ttl())
                            .ok_or_else(|| Error::msg("table_log_ttl is out of range"))?,
                    )
                    .ok_or_else(|| Error::msg("table_log_ttl is out of range"))?,
            ),
        )
        .await?;
        Ok(())
    }
}
