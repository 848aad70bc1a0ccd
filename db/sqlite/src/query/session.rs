use anyhow::Result;
use chrono::Utc;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{db::SqliteDb, model::session::SessionModel};

const INSERT: &str = "INSERT INTO \"sessions\" (\"id\", \"created_at\", \"expires_at\", \"user_id\") VALUES (?, ?, ?, ?)";
const SELECT: &str = "SELECT \"id\", \"created_at\", \"expires_at\", \"user_id\" FROM \"sessions\" WHERE \"id\" = ? AND \"expires_at\" > ?";
const UPDATE: &str = "UPDATE \"sessions\" SET \"expires_at\" = ? WHERE \"id\" = ?";
const DELETE: &str = "DELETE FROM \"sessions\" WHERE \"id\" = ?";
const DELETE_MANY_BY_USER_ID: &str = "DELETE FROM \"sessions\" WHERE \"user_id\" = ?";
const DELETE_EXPIRE: &str = "DELETE FROM \"sessions\" WHERE \"expires_at\" <= ?";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    pp_log::info(Some("🔧"), "[SQLite] Setting up sessions table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"sessions\" (\"id\" blob, \"created_at\" datetime, \"expires_at\" datetime, \"user_id\" blob, PRIMARY KEY (\"id\"))").await?;

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

impl SqliteDb {
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

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::{model::session::SessionModel, test_db};

    async fn count(db: &crate::db::SqliteDb) -> i64 {
        db.fetch_one::<(i64,)>(sqlx::query_as("SELECT COUNT(1) FROM \"sessions\""))
            .await
            .unwrap()
            .0
    }

    #[tokio::test]
    async fn insert_purges_expired_sessions() {
        let db = test_db::sqlite(&86400).await;
        let user_id = Uuid::now_v7();
        let now = Utc::now();

        let stale = SessionModel::new(
            &Uuid::now_v7(),
            &(now - Duration::days(2)),
            &(now - Duration::days(1)),
            &user_id,
        );
        db.insert_session(&stale).await.unwrap();
        assert_eq!(count(&db).await, 1);
        assert!(db.select_session(stale.id()).await.unwrap().is_none());

        let fresh = SessionModel::new(
            &Uuid::now_v7(),
            &now,
            &(now + Duration::days(1)),
            &user_id,
        );
        db.insert_session(&fresh).await.unwrap();

        assert_eq!(count(&db).await, 1);
        assert!(db.select_session(fresh.id()).await.unwrap().is_some());
    }
}
