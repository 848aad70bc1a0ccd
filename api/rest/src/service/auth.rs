use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::{
    activity_log::ActivityAction,
    session::SessionDao,
    user::{UserDao, UserRole},
};
use pp_error::Error;
use pp_mailer::template;
use validator::Validate;

use crate::{
    context::ApiRestCtx,
    model::{
        auth::{
            EmailReqJson, LoginReqJson, LoginResJson, LoginTwoFactorReqJson, RegisterReqJson,
            RegisterResJson, ResetPasswordReqJson, VerifyEmailReqJson,
        },
        NoticeResJson, Response,
    },
    util::{activity, auth, mail},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/verify-email", web::post().to(verify_email))
        .route(
            "/resend-verification",
            web::post().to(resend_verification),
        )
        .route("/login", web::post().to(login))
        .route("/login/two-factor", web::post().to(login_two_factor))
        .route("/logout", web::post().to(logout))
        .route("/forgot-password", web::post().to(forgot_password))
        .route("/reset-password", web::post().to(reset_password));
}

async fn register(ctx: web::Data<ApiRestCtx>, data: web::Json<RegisterReqJson>) -> HttpResponse {
    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    match UserDao::db_select_by_email(ctx.dao().db(), data.email()).await {
        Ok(Some(_)) => {
            return Response::error_raw(&StatusCode::CONFLICT, "Email is already registered")
        }
        Ok(None) => (),
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }

    let password_hash = match ctx.hash().argon2().hash_password(data.password()) {
        Ok(hash) => hash,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    let role = if ctx.auth().is_admin_email(data.email()) {
        UserRole::Admin
    } else {
        UserRole::Applicant
    };

    let mut user_data = UserDao::new(
        data.name(),
        data.email(),
        &password_hash,
        &role,
        data.country(),
        data.organization(),
    );
    let token = match user_data.issue_verification_token(ctx.auth().verification_ttl()) {
        Ok(token) => token,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    if let Err(err) = user_data.db_insert(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    mail::send(
        &ctx,
        template::verification(
            user_data.email(),
            user_data.name(),
            &mail::link(&ctx, "verify-email", &token),
            &ctx.auth().verification_ttl().as_secs(),
        ),
    );
    activity::record(
        &ctx,
        &Some(*user_data.id()),
        &ActivityAction::UserRegister,
        &format!("Registered as {}", user_data.role().to_str()),
    )
    .await;

    Response::data(
        &StatusCode::CREATED,
        &None,
        &RegisterResJson::new(user_data.id()),
    )
}

async fn verify_email(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<VerifyEmailReqJson>,
) -> HttpResponse {
    let mut user_data =
        match UserDao::db_select_by_verification_token(ctx.dao().db(), data.token()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                return Response::error_raw(
                    &StatusCode::BAD_REQUEST,
                    "Invalid or expired verification token",
                )
            }
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    if !user_data.verify_email(data.token()) {
        return Response::error_raw(
            &StatusCode::BAD_REQUEST,
            "Invalid or expired verification token",
        );
    }

    if let Err(err) = user_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    activity::record(
        &ctx,
        &Some(*user_data.id()),
        &ActivityAction::UserVerifyEmail,
        "",
    )
    .await;

    Response::data(
        &StatusCode::OK,
        &None,
        &NoticeResJson::new("Email address verified"),
    )
}

async fn resend_verification(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<EmailReqJson>,
) -> HttpResponse {
    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    let mut user_data = match UserDao::db_select_by_email(ctx.dao().db(), data.email()).await {
        Ok(Some(user)) if !user.is_verified() => Some(user),
        Ok(_) => None,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    if let Some(user_data) = &mut user_data {
        let token = match user_data.issue_verification_token(ctx.auth().verification_ttl()) {
            Ok(token) => token,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };
        if let Err(err) = user_data.db_update(ctx.dao().db()).await {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
        mail::send(
            &ctx,
            template::verification(
                user_data.email(),
                user_data.name(),
                &mail::link(&ctx, "verify-email", &token),
                &ctx.auth().verification_ttl().as_secs(),
            ),
        );
    }

    Response::data(
        &StatusCode::OK,
        &None,
        &NoticeResJson::new("If the account exists and is unverified, a new link has been sent"),
    )
}

async fn login(ctx: web::Data<ApiRestCtx>, data: web::Json<LoginReqJson>) -> HttpResponse {
    let mut user_data = match UserDao::db_select_by_email(ctx.dao().db(), data.email()).await {
        Ok(Some(user)) => user,
        Ok(None) => return Response::error_raw(&StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS),
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    if ctx
        .hash()
        .argon2()
        .verify_password(data.password(), user_data.password_hash())
        .is_err()
    {
        return Response::error_raw(&StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    }

    if !user_data.is_verified() {
        return Response::error_raw(
            &StatusCode::FORBIDDEN,
            "Email address has not been verified",
        );
    }

    if *user_data.two_factor_enabled() {
        let code = match user_data.issue_two_factor_code(ctx.auth().two_factor_ttl()) {
            Ok(code) => code,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };
        if let Err(err) = user_data.db_update(ctx.dao().db()).await {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
        }
        mail::send(
            &ctx,
            template::two_factor_code(
                user_data.email(),
                user_data.name(),
                &code,
                &ctx.auth().two_factor_ttl().as_secs(),
            ),
        );

        return Response::data(
            &StatusCode::OK,
            &None,
            &LoginResJson::two_factor_required(user_data.id()),
        );
    }

    let token = match auth::open_session(&ctx, user_data.id()).await {
        Ok(token) => token,
        Err(err) => return Response::error(&err),
    };

    activity::record(&ctx, &Some(*user_data.id()), &ActivityAction::UserLogin, "").await;

    Response::data(&StatusCode::OK, &None, &LoginResJson::token(&token))
}

async fn login_two_factor(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<LoginTwoFactorReqJson>,
) -> HttpResponse {
    let mut user_data = match UserDao::db_select(ctx.dao().db(), data.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Response::error_raw(&StatusCode::UNAUTHORIZED, "Invalid or expired code")
        }
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    let is_valid = user_data.consume_two_factor_code(data.code().trim());

    if let Err(err) = user_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    if !is_valid {
        return Response::error_raw(&StatusCode::UNAUTHORIZED, "Invalid or expired code");
    }

    let token = match auth::open_session(&ctx, user_data.id()).await {
        Ok(token) => token,
        Err(err) => return Response::error(&err),
    };

    activity::record(
        &ctx,
        &Some(*user_data.id()),
        &ActivityAction::UserLogin,
        "two-factor",
    )
    .await;

    Response::data(&StatusCode::OK, &None, &LoginResJson::token(&token))
}

async fn logout(ctx: web::Data<ApiRestCtx>, auth: BearerAuth) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    if let Err(err) = SessionDao::db_delete(ctx.dao().db(), caller.session().id()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::UserLogout,
        "",
    )
    .await;

    Response::data(&StatusCode::OK, &None, &NoticeResJson::new("Signed out"))
}

async fn forgot_password(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<EmailReqJson>,
) -> HttpResponse {
    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    let user_data = match UserDao::db_select_by_email(ctx.dao().db(), data.email()).await {
        Ok(user) => user,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    if let Some(mut user_data) = user_data {
        if let Err(err) = issue_reset_link(&ctx, &mut user_data).await {
            return Response::error(&err);
        }
    }

    Response::data(
        &StatusCode::OK,
        &None,
        &NoticeResJson::new("If the account exists, a password reset link has been sent"),
    )
}

async fn issue_reset_link(ctx: &ApiRestCtx, user_data: &mut UserDao) -> Result<(), Error> {
    let token = user_data
        .issue_reset_token(ctx.auth().reset_password_ttl())
        .map_err(|err| Error::InternalServerError(err.to_string()))?;
    user_data
        .db_update(ctx.dao().db())
        .await
        .map_err(|err| Error::InternalServerError(err.to_string()))?;

    mail::send(
        ctx,
        template::password_reset(
            user_data.email(),
            user_data.name(),
            &mail::link(ctx, "reset-password", &token),
            &ctx.auth().reset_password_ttl().as_secs(),
        ),
    );

    Ok(())
}

async fn reset_password(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<ResetPasswordReqJson>,
) -> HttpResponse {
    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    let mut user_data = match UserDao::db_select_by_reset_token(ctx.dao().db(), data.token()).await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Response::error_raw(&StatusCode::BAD_REQUEST, "Invalid or expired reset token")
        }
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    if !user_data.consume_reset_token(data.token()) {
        return Response::error_raw(&StatusCode::BAD_REQUEST, "Invalid or expired reset token");
    }

    let password_hash = match ctx.hash().argon2().hash_password(data.password()) {
        Ok(hash) => hash,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };
    user_data.set_password_hash(&password_hash);

    if let Err(err) = user_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    if let Err(err) = SessionDao::db_delete_many_by_user_id(ctx.dao().db(), user_data.id()).await
    {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    mail::send(
        &ctx,
        template::password_reset_done(user_data.email(), user_data.name()),
    );
    activity::record(
        &ctx,
        &Some(*user_data.id()),
        &ActivityAction::UserResetPassword,
        "",
    )
    .await;

    Response::data(
        &StatusCode::OK,
        &None,
        &NoticeResJson::new("Password has been reset"),
    )
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use pp_dao::user::{UserDao, MAX_TWO_FACTOR_ATTEMPTS};
    use serde_json::json;

    use crate::test_util::{self, call};

    #[actix_web::test]
    async fn registration_creates_one_user_with_hashed_password() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/register").set_json(json!({
                "name": "Amina Diallo",
                "email": "Amina@Example.org",
                "password": "correct horse",
                "country": "Senegal",
                "organization": "National Commission"
            }))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.into_data()["id"].is_string());

        assert_eq!(UserDao::db_count(ctx.dao().db()).await.unwrap(), 1);
        let user = UserDao::db_select_by_email(ctx.dao().db(), "amina@example.org")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash(), "correct horse");
        assert!(user.password_hash().starts_with("$argon2"));
        assert!(!user.is_verified());

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/register").set_json(json!({
                "name": "Someone Else",
                "email": "amina@example.org",
                "password": "another password",
                "country": "Mali"
            }))
        );
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error_message(), Some("Email is already registered"));
        assert_eq!(UserDao::db_count(ctx.dao().db()).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn registration_rejects_short_password() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;

        let (status, _) = call!(
            &app,
            test::TestRequest::post().uri("/api/register").set_json(json!({
                "name": "Amina",
                "email": "amina@example.org",
                "password": "short",
                "country": "Senegal"
            }))
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(UserDao::db_count(ctx.dao().db()).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn registration_rejects_blank_name_and_country() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/register").set_json(json!({
                "name": "   ",
                "email": "amina@example.org",
                "password": "correct horse",
                "country": "  "
            }))
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body.error_message().unwrap();
        assert!(message.contains("name must not be empty"));
        assert!(message.contains("country must not be empty"));
        assert_eq!(UserDao::db_count(ctx.dao().db()).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn login_requires_verified_email_and_right_password() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        test_util::applicant(&ctx, "amina@example.org", false).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/login").set_json(json!({
                "email": "amina@example.org",
                "password": "wrong password"
            }))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error_message(), Some(super::INVALID_CREDENTIALS));

        let (status, _) = call!(
            &app,
            test::TestRequest::post().uri("/api/login").set_json(json!({
                "email": "amina@example.org",
                "password": test_util::PASSWORD
            }))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn verified_user_logs_in_and_out() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        test_util::applicant(&ctx, "amina@example.org", true).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/login").set_json(json!({
                "email": "AMINA@example.org",
                "password": test_util::PASSWORD
            }))
        );
        assert_eq!(status, StatusCode::OK);
        let data = body.into_data();
        assert_eq!(data["two_factor_required"], json!(false));
        let token = data["token"].as_str().unwrap().to_owned();

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/me")
                .insert_header(test_util::bearer(&token))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/logout")
                .insert_header(test_util::bearer(&token))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/me")
                .insert_header(test_util::bearer(&token))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn two_factor_login_needs_the_mailed_code() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let mut user = test_util::applicant(&ctx, "amina@example.org", true).await;
        user.set_two_factor_enabled(&true);
        user.db_update(ctx.dao().db()).await.unwrap();

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/login").set_json(json!({
                "email": "amina@example.org",
                "password": test_util::PASSWORD
            }))
        );
        assert_eq!(status, StatusCode::OK);
        let data = body.into_data();
        assert_eq!(data["two_factor_required"], json!(true));
        assert!(data.get("token").is_none());

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/login/two-factor")
                .set_json(json!({ "user_id": user.id(), "code": "not-a-code" }))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // The code only travels by mail, so issue a fresh one directly.
        let mut stored = UserDao::db_select(ctx.dao().db(), user.id())
            .await
            .unwrap()
            .unwrap();
        let code = stored
            .issue_two_factor_code(&std::time::Duration::from_secs(600))
            .unwrap();
        stored.db_update(ctx.dao().db()).await.unwrap();

        let (status, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/login/two-factor")
                .set_json(json!({ "user_id": user.id(), "code": code }))
        );
        assert_eq!(status, StatusCode::OK);
        assert!(body.into_data()["token"].is_string());
    }

    #[actix_web::test]
    async fn two_factor_code_is_dropped_after_repeated_misses() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let mut user = test_util::applicant(&ctx, "amina@example.org", true).await;
        user.set_two_factor_enabled(&true);
        let code = user
            .issue_two_factor_code(ctx.auth().two_factor_ttl())
            .unwrap();
        user.db_update(ctx.dao().db()).await.unwrap();

        for _ in 0..MAX_TWO_FACTOR_ATTEMPTS {
            let (status, _) = call!(
                &app,
                test::TestRequest::post()
                    .uri("/api/login/two-factor")
                    .set_json(json!({ "user_id": user.id(), "code": "000000" }))
            );
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let (status, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/login/two-factor")
                .set_json(json!({ "user_id": user.id(), "code": code }))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error_message(), Some("Invalid or expired code"));
    }

    #[actix_web::test]
    async fn verify_and_reset_with_stored_tokens() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let mut user = test_util::applicant(&ctx, "amina@example.org", false).await;
        let token = user
            .issue_verification_token(ctx.auth().verification_ttl())
            .unwrap();
        user.db_update(ctx.dao().db()).await.unwrap();

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/verify-email")
                .set_json(json!({ "token": "unknown" }))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/verify-email")
                .set_json(json!({ "token": token }))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/forgot-password")
                .set_json(json!({ "email": "nobody@example.org" }))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/forgot-password")
                .set_json(json!({ "email": "amina@example.org" }))
        );
        assert_eq!(status, StatusCode::OK);

        let mut stored = UserDao::db_select(ctx.dao().db(), user.id())
            .await
            .unwrap()
            .unwrap();
        let reset_token = stored
            .issue_reset_token(ctx.auth().reset_password_ttl())
            .unwrap();
        stored.db_update(ctx.dao().db()).await.unwrap();

        let (status, _) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/reset-password")
                .set_json(json!({ "token": reset_token, "password": "a brand new secret" }))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(
            &app,
            test::TestRequest::post().uri("/api/login").set_json(json!({
                "email": "amina@example.org",
                "password": "a brand new secret"
            }))
        );
        assert_eq!(status, StatusCode::OK);
    }
}
