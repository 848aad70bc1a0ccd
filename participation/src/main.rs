use pp_api_rest::{
    context::{
        ApiRestApplicationCtx, ApiRestAuthCtx, ApiRestCtx, ApiRestDaoCtx, ApiRestHashCtx,
        ApiRestMailerCtx, ApiRestTokenCtx,
    },
    ApiRestServer,
};
use pp_dao::Db;
use pp_db_postgresql::db::PostgresDb;
use pp_db_sqlite::db::SqliteDb;
use pp_hash_argon2::argon2::Argon2Hash;
use pp_mailer::Mailer;
use pp_token_jwt::token::JwtToken;
use tokio_util::sync::CancellationToken;

mod config_path;

#[tokio::main]
async fn main() {
    let config_path = config_path::get();
    let config = pp_config::from_path(&config_path);

    pp_log::init(config.log().display_level(), config.log().level_filter());

    pp_log::info(Some("🚀"), "[Participation] Starting");

    let argon2_hash = match Argon2Hash::new(
        config.hash().argon2().algorithm(),
        config.hash().argon2().version(),
        config.hash().argon2().salt(),
        config.hash().argon2().memory_cost(),
        config.hash().argon2().time_cost(),
    ) {
        Ok(hash) => hash,
        Err(err) => pp_log::panic(
            None,
            format!("[Participation] Invalid argon2 configuration: {err}"),
        ),
    };

    let jwt_token = JwtToken::new(
        config.token().jwt().secret(),
        config.token().jwt().expiry_duration(),
    );

    let (mailer, mailer_sender) = match config.mailer() {
        Some(config_mailer) => match Mailer::new(
            config_mailer.smtp_host(),
            config_mailer.smtp_port(),
            config_mailer.smtp_username(),
            config_mailer.smtp_password(),
            &config_mailer.sender(),
            config_mailer.reply_to(),
        ) {
            Ok((mailer, mailer_sender)) => (Some(mailer), Some(mailer_sender)),
            Err(err) => pp_log::panic(
                None,
                format!("[Participation] Invalid mailer configuration: {err}"),
            ),
        },
        None => {
            pp_log::warn(
                None,
                "[Participation] No mailer configured, outgoing mail will be skipped",
            );
            (None, None)
        }
    };

    let log_ttl = i64::try_from(config.log().db_ttl().as_secs()).unwrap_or(i64::MAX);

    let db = if let Some(postgres) = config.db().postgres() {
        match PostgresDb::new(
            postgres.user(),
            postgres.password(),
            postgres.host(),
            postgres.port(),
            postgres.db_name(),
            postgres.max_connections(),
            &log_ttl,
        )
        .await
        {
            Ok(db) => Db::PostgresqlDb(db),
            Err(err) => pp_log::panic(
                None,
                format!("[Participation] Connecting to PostgreSQL failed: {err}"),
            ),
        }
    } else if let Some(sqlite) = config.db().sqlite() {
        match SqliteDb::new(sqlite.path(), sqlite.max_connections(), &log_ttl).await {
            Ok(db) => Db::SqliteDb(db),
            Err(err) => pp_log::panic(
                None,
                format!("[Participation] Opening SQLite database failed: {err}"),
            ),
        }
    } else {
        pp_log::panic(None, "[Participation] No database configuration is specified")
    };

    let api_rest_server = ApiRestServer::new(
        config.app().mode(),
        config.api().rest().host(),
        config.api().rest().port(),
        config.api().rest().allowed_origin(),
        ApiRestCtx::new(
            ApiRestHashCtx::new(argon2_hash),
            ApiRestTokenCtx::new(jwt_token),
            mailer_sender.map(ApiRestMailerCtx::new),
            ApiRestDaoCtx::new(db),
            ApiRestAuthCtx::new(
                config.auth().verification_ttl(),
                config.auth().reset_password_ttl(),
                config.auth().two_factor_ttl(),
                config.auth().session_ttl(),
                config.auth().admin_emails(),
            ),
            ApiRestApplicationCtx::new(
                config.application().max_budget(),
                config.application().page_size(),
            ),
            config.app().public_url(),
        ),
    );

    let cancel_token = CancellationToken::new();

    match tokio::try_join!(
        async {
            match mailer {
                Some(mailer) => mailer.run(cancel_token.clone()).await,
                None => Mailer::run_none().await,
            }
        },
        api_rest_server.run(cancel_token.clone())
    ) {
        Ok(_) => pp_log::info(Some("👋"), "[Participation] Turned off"),
        Err(err) => {
            pp_log::warn(None, "[Participation] Shutting down all running components");
            cancel_token.cancel();
            pp_log::warn(
                Some("👋"),
                format!("[Participation] Turned off with error: {err}"),
            );
        }
    }
}
