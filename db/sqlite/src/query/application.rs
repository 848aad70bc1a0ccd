use anyhow::Result;
use sqlx::{Executor, Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::SqliteDb,
    model::application::{ApplicationModel, ApplicationStatsModel},
};

const COLUMNS: &str = "\"id\", \"created_at\", \"updated_at\", \"user_id\", \"title\", \"country\", \"national_commission\", \"sector\", \"summary\", \"objectives\", \"beneficiaries\", \"start_date\", \"end_date\", \"budget\", \"other_funding\", \"total_budget\", \"status\", \"marks\", \"feedback\", \"reviewed_by\", \"reviewed_at\"";

const INSERT: &str = "INSERT INTO \"applications\" (\"id\", \"created_at\", \"updated_at\", \"user_id\", \"title\", \"country\", \"national_commission\", \"sector\", \"summary\", \"objectives\", \"beneficiaries\", \"start_date\", \"end_date\", \"budget\", \"other_funding\", \"total_budget\", \"status\", \"marks\", \"feedback\", \"reviewed_by\", \"reviewed_at\") VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE \"applications\" SET \"updated_at\" = ?, \"title\" = ?, \"country\" = ?, \"national_commission\" = ?, \"sector\" = ?, \"summary\" = ?, \"objectives\" = ?, \"beneficiaries\" = ?, \"start_date\" = ?, \"end_date\" = ?, \"budget\" = ?, \"other_funding\" = ?, \"total_budget\" = ?, \"status\" = ?, \"marks\" = ?, \"feedback\" = ?, \"reviewed_by\" = ?, \"reviewed_at\" = ? WHERE \"id\" = ?";
const STATS: &str = "SELECT \"status\", COUNT(1) AS \"total\", COUNT(\"marks\") AS \"scored\", COALESCE(SUM(\"marks\"), 0) AS \"marks_sum\", MIN(\"marks\") AS \"marks_min\", MAX(\"marks\") AS \"marks_max\", COALESCE(SUM(\"total_budget\"), 0) AS \"budget_sum\" FROM \"applications\" GROUP BY \"status\"";

pub async fn init(pool: &Pool<Sqlite>) -> Result<()> {
    pp_log::info(Some("🔧"), "[SQLite] Setting up applications table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"applications\" (\"id\" blob, \"created_at\" datetime, \"updated_at\" datetime, \"user_id\" blob, \"title\" text, \"country\" text, \"national_commission\" text, \"sector\" text, \"summary\" text, \"objectives\" text, \"beneficiaries\" text, \"start_date\" date, \"end_date\" date, \"budget\" text, \"other_funding\" bigint, \"total_budget\" bigint, \"status\" text, \"marks\" integer, \"feedback\" text, \"reviewed_by\" blob, \"reviewed_at\" datetime, PRIMARY KEY (\"id\"))").await?;
    pool.execute("CREATE INDEX IF NOT EXISTS \"applications_user_id\" ON \"applications\" (\"user_id\")").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(UPDATE),
        pool.prepare(STATS),
    )?;

    Ok(())
}

impl SqliteDb {
    pub async fn insert_application(&self, value: &ApplicationModel) -> Result<()> {
        self.execute(
            sqlx::query(INSERT)
                .bind(value.id())
                .bind(value.created_at())
                .bind(value.updated_at())
                .bind(value.user_id())
                .bind(value.title())
                .bind(value.country())
                .bind(value.national_commission())
                .bind(value.sector())
                .bind(value.summary())
                .bind(value.objectives())
                .bind(value.beneficiaries())
                .bind(value.start_date())
                .bind(value.end_date())
                .bind(value.budget())
                .bind(value.other_funding())
                .bind(value.total_budget())
                .bind(value.status())
                .bind(value.marks())
                .bind(value.feedback())
                .bind(value.reviewed_by())
                .bind(value.reviewed_at()),
        )
        .await?;
        Ok(())
    }

    pub async fn select_application(&self, id: &Uuid) -> Result<Option<ApplicationModel>> {
        let sql = format!("SELECT {COLUMNS} FROM \"applications\" WHERE \"id\" = ?");
        Ok(self.fetch_optional(sqlx::query_as(&sql).bind(id)).await?)
    }

    pub async fn select_many_applications_by_user_id(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ApplicationModel>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM \"applications\" WHERE \"user_id\" = ? ORDER BY \"id\" DESC"
        );
        Ok(self.fetch_all(sqlx::query_as(&sql).bind(user_id)).await?)
    }

    pub async fn select_many_applications(
        &self,
        status: &Option<&str>,
        limit: &i64,
        offset: &i64,
    ) -> Result<Vec<ApplicationModel>> {
        let mut sql = format!("SELECT {COLUMNS} FROM \"applications\"");
        if status.is_some() {
            sql += " WHERE \"status\" = ?";
        }
        sql += " ORDER BY \"id\" DESC LIMIT ? OFFSET ?";

        let mut query = sqlx::query_as(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }
        query = query.bind(limit).bind(offset);

        Ok(self.fetch_all(query).await?)
    }

    pub async fn count_applications(&self, status: &Option<&str>) -> Result<i64> {
        let mut sql = "SELECT COUNT(1) FROM \"applications\"".to_owned();
        if status.is_some() {
            sql += " WHERE \"status\" = ?";
        }

        let mut query = sqlx::query_as(&sql);
        if let Some(status) = status {
            query = query.bind(status);
        }

        Ok(self.fetch_one::<(i64,)>(query).await?.0)
    }

    pub async fn select_applications_stats(&self) -> Result<Vec<ApplicationStatsModel>> {
        Ok(self.fetch_all(sqlx::query_as(STATS)).await?)
    }

    pub async fn update_application(&self, value: &ApplicationModel) -> Result<()> {
        self.execute(
            sqlx::query(UPDATE)
                .bind(value.updated_at())
                .bind(value.title())
                .bind(value.country())
                .bind(value.national_commission())
                .bind(value.sector())
                .bind(value.summary())
                .bind(value.objectives())
                .bind(value.beneficiaries())
                .bind(value.start_date())
                .bind(value.end_date())
                .bind(value.budget())
                .bind(value.other_funding())
                .bind(value.total_budget())
                .bind(value.status())
                .bind(value.marks())
                .bind(value.feedback())
                .bind(value.reviewed_by())
                .bind(value.reviewed_at())
                .bind(value.id()),
        )
        .await?;
        Ok(())
    }
}
