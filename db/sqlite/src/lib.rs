pub mod db;
pub mod model;
pub mod query;

#[cfg(test)]
pub(crate) mod test_db {
    use uuid::Uuid;

    use crate::db::SqliteDb;

    pub async fn sqlite(table_log_ttl: &i64) -> SqliteDb {
        let path = std::env::temp_dir().join(format!("pp_db_sqlite_{}.db", Uuid::now_v7()));
        SqliteDb::new(&path.to_string_lossy(), &1, table_log_ttl)
            .await
            .unwrap()
    }
}
