use anyhow::Result;
use sqlx::{Executor, Pool, Postgres};
use uuid::Uuid;

use crate::{
    db::PostgresDb,
    model::application::{ApplicationModel, ApplicationStatsModel},
};

const COLUMNS: &str = "\"id\", \"created_at\", \"updated_at\", \"user_id\", \"title\", \"country\", \"national_commission\", \"sector\", \"summary\", \"objectives\", \"beneficiaries\", \"start_date\", \"end_date\", \"budget\", \"other_funding\", \"total_budget\", \"status\", \"marks\", \"feedback\", \"reviewed_by\", \"reviewed_at\"";

const INSERT: &str = "INSERT INTO \"applications\" (\"id\", \"created_at\", \"updated_at\", \"user_id\", \"title\", \"country\", \"national_commission\", \"sector\", \"summary\", \"objectives\", \"beneficiaries\", \"start_date\", \"end_date\", \"budget\", \"other_funding\", \"total_budget\", \"status\", \"marks\", \"feedback\", \"reviewed_by\", \"reviewed_at\") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)";
const UPDATE: &str = "UPDATE \"applications\" SET \"updated_at\" = $1, \"title\" = $2, \"country\" = $3, \"national_commission\" = $4, \"sector\" = $5, \"summary\" = $6, \"objectives\" = $7, \"beneficiaries\" = $8, \"start_date\" = $9, \"end_date\" = $10, \"budget\" = $11, \"other_funding\" = $12, \"total_budget\" = $13, \"status\" = $14, \"marks\" = $15, \"feedback\" = $16, \"reviewed_by\" = $17, \"reviewed_at\" = $18 WHERE \"id\" = $19";
const STATS: &str = "SELECT \"status\", COUNT(1) AS \"total\", COUNT(\"marks\") AS \"scored\", COALESCE(SUM(\"marks\"), 0)::bigint AS \"marks_sum\", MIN(\"marks\") AS \"marks_min\", MAX(\"marks\") AS \"marks_max\", COALESCE(SUM(\"total_budget\"), 0)::bigint AS \"budget_sum\" FROM \"applications\" GROUP BY \"status\"";

pub async fn init(pool: &Pool<Postgres>) -> Result<()> {
    pp_log::info(Some("🔧"), "[PostgreSQL] Setting up applications table");

    pool.execute("CREATE TABLE IF NOT EXISTS \"applications\" (\"id\" uuid, \"created_at\" timestamptz(6), \"updated_at\" timestamptz(6), \"user_id\" uuid, \"title\" text, \"country\" text, \"national_commission\" text, \"sector\" text, \"summary\" text, \"objectives\" text, \"beneficiaries\" text, \"start_date\" date, \"end_date\" date, \"budget\" text, \"other_funding\" bigint, \"total_budget\" bigint, \"status\" text, \"marks\" integer, \"feedback\" text, \"reviewed_by\" uuid, \"reviewed_at\" timestamptz(6), PRIMARY KEY (\"id\"))").await?;
    pool.execute("CREATE INDEX IF NOT EXISTS \"applications_user_id\" ON \"applications\" (\"user_id\")").await?;

    tokio::try_join!(
        pool.prepare(INSERT),
        pool.prepare(UPDATE),
        pool.prepare(STATS),
    )?;

    Ok(())
}

impl PostgresDb {
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
        let sql = format!("SELECT {COLUMNS} FROM \"applications\" WHERE \"id\" = $1");
        Ok(self.fetch_optional(sqlx::query_as(&sql).bind(id)).await?)
    }

    pub async fn select_many_applications_by_user_id(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<ApplicationModel>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM \"applications\" WHERE \"user_id\" = $1 ORDER BY \"id\" DESC"
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
        let mut index = 1;
        if status.is_some() {
            sql += &format!(" WHERE \"status\" = ${index}");
            index += 1;
        }
        sql += &format!(
            " ORDER BY \"id\" DESC LIMIT ${} OFFSET ${}",
            index,
            index + 1
        );

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
            sql += " WHERE \"status\" = $1";
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
