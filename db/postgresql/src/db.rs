use anyhow::Result;
use sqlx::{
    postgres::{PgArguments, PgPoolOptions, PgQueryResult, PgRow},
    query::{Query, QueryAs},
    Error, Pool, Postgres,
};

use crate::query::{activity_log, application, message, session, user};

pub struct PostgresDb {
    pool: Pool<Postgres>,
    table_log_ttl: i64,
}

impl PostgresDb {
    pub async fn new(
        user: &str,
        password: &str,
        host: &str,
        port: &u16,
        db_name: &str,
        max_connections: &u32,
        table_log_ttl: &i64,
    ) -> Result<Self> {
        pp_log::info(Some("⚡"), "[PostgreSQL] Initializing component");

        let url = format!("postgres://{user}:{password}@{host}:{port}/{db_name}");
        let pool = PgPoolOptions::new()
            .max_connections(*max_connections)
            .connect(&url)
            .await?;

        Self::init(&pool).await?;

        Ok(Self {
            pool,
            table_log_ttl: *table_log_ttl,
        })
    }

    pub async fn execute(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, Error> {
        query.execute(&self.pool).await
    }

    pub async fn fetch_one<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<T, Error> {
        query.fetch_one(&self.pool).await
    }

    pub async fn fetch_optional<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<Option<T>, Error> {
        query.fetch_optional(&self.pool).await
    }

    pub async fn fetch_all<T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>>(
        &self,
        query: QueryAs<'_, Postgres, T, PgArguments>,
    ) -> Result<Vec<T>, Error> {
        query.fetch_all(&self.pool).await
    }

    pub fn table_log_ttl(&self) -> &i64 {
        &self.table_log_ttl
    }

    async fn init(pool: &Pool<Postgres>) -> Result<()> {
        user::init(pool).await?;
        session::init(pool).await?;
        application::init(pool).await?;
        message::init(pool).await?;
        activity_log::init(pool).await?;
        Ok(())
    }
}
