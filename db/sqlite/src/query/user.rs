use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{db::SqliteDb, model::user::UserModel};

const COLUMNS: &str = "\"id\", \"created_at\", \"updated_at\", \"name\", \"email\", \"password_hash\", \"role\", \"country\", \"organization\", \"is_verified\", \"verification_token\", \"verification_expires_at\", \"reset_token\", \"reset_expires_at\", \"two_factor_enabled\", \"two_factor_code\", \"two_factor_expires_at\", \"two_factor_attempts\"";

const INSERT: &str = "INSERT INTO \"users\" (\"id\", \"created_at\", \"updated_at\", \"name\", \"email\", \"password_hash\", \"role\", \"country\", \"organization\", \"is_verified\", \"verification_token\", \"verification_expires_at\", \"reset_token\", \"reset_expires_at\", \"two_factor_enabled\", \"two_factor_code\", \"two_factor_expires_at\", \"two_factor_attempts\") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE \"users\" SET \"updated_at\" = ?, \"name\" = ?, \"password_hash\" = ?, \"role\" = ?, \"country\" = ?, \"organization\" = ?, \"is_verified\" = ?, \"verification_token\" = ?, \"verification_expires_at\" = ?, \"reset_token\" = ?, \"reset_expires_at\" = ?, \"two_factor_enabled\" = ?, \"two_factor_code\" = ?, \"two_factor_expires_at\" = ?, \"two_factor_attempts\" = ? WHERE \"id\" = ?";
const COUNT: &str = "SELECT COUNT(1) FROM \"users\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    pp_log::info(Some("🔧"), "[SQLite] Setting up users table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"users\" (\"id\" blob, \"created_at\" datetime, \"updated_at\" datetime, \"name\" text, \"email\" text UNIQUE, \"password_hash\" text, \"role\" text, \"country\" text, \"organization\" text, \"is_verified\" boolean, \"verification_token\" text, \"verification_expires_at\" datetime, \"reset_token\" text, \"reset_expires_at\" datetime, \"two_factor_enabled\" boolean, \"two_factor_code\" text, \"two_factor_expires_at\" datetime, \"two_factor_attempts\" integer, PRIMARY KEY (\"id\"))").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(UPDATE),
        pool.prepare(COUNT),
    )?;

    Ok(())
}

impl SqliteDb {
    pub async fn insert_user(&self, value: &UserModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.created_at())
                .bind(value.updated_at())
                .bind(value.name())
                .bind(value.email())
                .bind(value.password_hash())
                .bind(value.role())
                .bind(value.country())
                .bind(value.organization())
                .bind(value.is_verified())
                .bind(value.verification_token())
                .bind(value.verification_expires_at())
                .bind(value.reset_token())
                .bind(value.reset_expires_at())
                .bind(value.two_factor_enabled())
                .bind(value.two_factor_code())
                .bind(value.two_factor_expires_at())
                .bind(value.two_factor_attempts()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_user(&self, id: &Uuid) -> Result<Option<UserModel>> {
        let sql = format!("SELECT {COLUMNS} FROM \"users\" WHERE \"id\" = ?");
        Ok(self.fetch_optional(sqlx::query_as(&sql).bind(id)).await?)
    }

    pub async fn select_user_by_email(&self, email: &str) -> Result<Option<UserModel>> {
        let sql = format!("SELECT {COLUMNS} FROM \"users\" WHERE \"email\" = ?");
        Ok(self.fetch_optional(sqlx::query_as(&sql).bind(email)).await?)
    }

    pub async fn select_user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<UserModel>> {
        let sql = format!("SELECT {COLUMNS} FROM \"users\" WHERE \"verification_token\" = ?");
        Ok(self.fetch_optional(sqlx::query_as(&sql).bind(token)).await?)
    }

    pub async fn select_user_by_reset_token(&self, token: &str) -> Result<Option<UserModel>> {
        let sql = format!("SELECT {COLUMNS} FROM \"users\" WHERE \"reset_token\" = ?");
        Ok(self.fetch_optional(sqlx::query_as(&sql).bind(token)).await?)
    }

    pub async fn select_many_users(&self, limit: &i64, offset: &i64) -> Result<Vec<UserModel>> {
        let sql =
            format!("SELECT {COLUMNS} FROM \"users\" ORDER BY \"id\" DESC LIMIT ? OFFSET ?");
        Ok(self
            .fetch_all(sqlx::query_as(&sql).bind(limit).bind(offset))
            .await?)
    }

    pub async fn count_users(&self) -> Result<i64> {
        Ok(self.fetch_one::<(i64,)>(sqlx::query_as(COUNT)).await?.0)
    }

    pub async fn update_user(&self, value: &UserModel) -> Result<()> {
        self.execute(
            sqlx::query(UPDATE)
                .bind(value.updated_at())
                .bind(value.name())
                .bind(value.password_hash())
                .bind(value.role())
                .bind(value.country())
                .bind(value.organization())
                .bind(value.is_verified())
                .bind(value.verification_token())
                .bind(value.verification_expires_at())
                .bind(value.reset_token())
                .bind(value.reset_expires_at())
                .bind(value.two_factor_enabled())
                .bind(value.two_factor_code())
                .bind(value.two_factor_expires_at())
                .bind(value.two_factor_attempts())
                .bind(value.id()),
        )
        .await?;
        Ok(())
    }
}
