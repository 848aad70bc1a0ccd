use pp_db_postgresql::db::PostgresDb;
use pp_db_sqlite::db::SqliteDb;

pub mod activity_log;
pub mod application;
pub mod dto;
pub mod message;
pub mod session;
pub mod user;
mod util;

pub enum Db {
    PostgresqlDb(PostgresDb),
    SqliteDb(SqliteDb),
}

#[cfg(test)]
pub(crate) mod test_db {
    use pp_db_sqlite::db::SqliteDb;
    use uuid::Uuid;

    use crate::Db;

    pub async fn sqlite() -> Db {
        let path = std::env::temp_dir().join(format!("pp_dao_{}.db", Uuid::now_v7()));
        Db::SqliteDb(
            SqliteDb::new(&path.to_string_lossy(), &1, &86400)
                .await
                .unwrap(),
        )
    }
}
