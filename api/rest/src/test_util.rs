use std::time::Duration;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    middleware::ErrorHandlers,
    web, App,
};
use pp_dao::{
    user::{UserDao, UserRole},
    Db,
};
use pp_db_sqlite::db::SqliteDb;
use pp_hash_argon2::argon2::Argon2Hash;
use pp_token_jwt::token::JwtToken;
use uuid::Uuid;

use crate::{
    configure::configure,
    context::{
        ApiRestApplicationCtx, ApiRestAuthCtx, ApiRestCtx, ApiRestDaoCtx, ApiRestHashCtx,
        ApiRestTokenCtx,
    },
    error_handler::default_error_handler,
    util::auth,
};

pub const PASSWORD: &str = "correct horse battery";
pub const MAX_BUDGET: i64 = 26_000;

pub async fn ctx() -> web::Data<ApiRestCtx> {
    let path = std::env::temp_dir().join(format!("pp_api_rest_{}.db", Uuid::now_v7()));
    let db = SqliteDb::new(&path.to_string_lossy(), &1, &86400)
        .await
        .unwrap();

    web::Data::new(ApiRestCtx::new(
        ApiRestHashCtx::new(
            Argon2Hash::new(
                "Argon2id",
                "V0x13",
                "c29tZXNhbHRzb21lc2FsdA",
                &Some(1024),
                &Some(1),
            )
            .unwrap(),
        ),
        ApiRestTokenCtx::new(JwtToken::new("test-secret", &Duration::from_secs(3600))),
        None,
        ApiRestDaoCtx::new(Db::SqliteDb(db)),
        ApiRestAuthCtx::new(
            &Duration::from_secs(86400),
            &Duration::from_secs(3600),
            &Duration::from_secs(600),
            &Duration::from_secs(7200),
            &["secretariat@example.org".to_owned()],
        ),
        ApiRestApplicationCtx::new(&MAX_BUDGET, &20),
        "https://portal.example.org/",
    ))
}

pub fn app(
    ctx: &web::Data<ApiRestCtx>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(ErrorHandlers::new().default_handler(default_error_handler))
        .app_data(ctx.clone())
        .configure(configure)
}

/// Sends a request and decodes the JSON envelope, yielding `(status, Response)`.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let res = actix_web::test::call_service($app, $req.to_request()).await;
        let status = res.status();
        let body: crate::model::Response = actix_web::test::read_body_json(res).await;
        (status, body)
    }};
}
pub(crate) use call;

async fn user(ctx: &ApiRestCtx, email: &str, role: &UserRole, verified: bool) -> UserDao {
    let password_hash = ctx.hash().argon2().hash_password(PASSWORD).unwrap();
    let mut user = UserDao::new("Test User", email, &password_hash, role, "Senegal", "NatCom");
    if verified {
        let token = user
            .issue_verification_token(&Duration::from_secs(60))
            .unwrap();
        assert!(user.verify_email(&token));
    }
    user.db_insert(ctx.dao().db()).await.unwrap();
    user
}

pub async fn applicant(ctx: &ApiRestCtx, email: &str, verified: bool) -> UserDao {
    user(ctx, email, &UserRole::Applicant, verified).await
}

pub async fn admin(ctx: &ApiRestCtx, email: &str) -> UserDao {
    user(ctx, email, &UserRole::Admin, true).await
}

/// Signs `user` in without going through the login endpoint.
pub async fn token_for(ctx: &ApiRestCtx, user: &UserDao) -> String {
    auth::open_session(ctx, user.id()).await.unwrap()
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
