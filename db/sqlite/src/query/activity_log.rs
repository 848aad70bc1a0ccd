use anyhow::{Error, Result};
use chrono::{Duration, Utc};
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{db::SqliteDb, model::activity_log::ActivityLogModel};

const INSERT: &str = "INSERT INTO \"activity_logs\" (\"id\", \"created_at\", \"user_id\", \"action\", \"detail\") VALUES (?, ?, ?, ?, ?)";
const SELECT_MANY: &str = "SELECT \"id\", \"created_at\", \"user_id\", \"action\", \"detail\" FROM \"activity_logs\"";
const COUNT: &str = "SELECT COUNT(1) FROM \"activity_logs\"";
const DELETE_EXPIRE: &str = "DELETE FROM \"activity_logs\" WHERE \"created_at\" < ?";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    pp_log::info(Some("🔧"), "[SQLite] Setting up activity_logs table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"activity_logs\" (\"id\" blob, \"created_at\" datetime, \"user_id\" blob, \"action\" text, \"detail\" text, PRIMARY KEY (\"id\"))").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(COUNT),
        pool.prepare(DELETE_EXPIRE),
    )?;

    Ok(())
}

impl SqliteDb {
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
            sql += " WHERE \"id\" < ? ORDER BY \"id\" DESC LIMIT ?";
        } else {
            sql += " ORDER BY \"id\" DESC LIMIT ?";
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

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::{model::activity_log::ActivityLogModel, test_db};

    #[tokio::test]
    async fn insert_purges_logs_older_than_ttl() {
        let db = test_db::sqlite(&3600).await;

        let stale = ActivityLogModel::new(
            &Uuid::now_v7(),
            &(Utc::now() - Duration::days(1)),
            &None,
            "user.login",
            "stale",
        );
        db.insert_activity_log(&stale).await.unwrap();
        assert_eq!(db.count_activity_logs().await.unwrap(), 1);

        let fresh = ActivityLogModel::new(
            &Uuid::now_v7(),
            &Utc::now(),
            &None,
            "user.login",
            "fresh",
        );
        db.insert_activity_log(&fresh).await.unwrap();

        let logs = db.select_many_activity_logs(&None, &10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id(), fresh.id());
        assert_eq!(db.count_activity_logs().await.unwrap(), 1);
    }
}
