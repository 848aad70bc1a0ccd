use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{
    context::ApiRestCtx,
    model::{token::TokenResJson, Response},
    util::auth,
};

pub fn token_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/token", web::get().to(token));
}

/// Extends the caller's session and reissues the bearer token once it is past half its lifetime.
async fn token(ctx: web::Data<ApiRestCtx>, auth: BearerAuth) -> HttpResponse {
    let mut caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    if let Err(err) = caller.session_mut().extend(ctx.auth().session_ttl()) {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }
    if let Err(err) = caller.session().db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    let token = match ctx.token().jwt().need_renew(caller.claim()) {
        Ok(true) => match ctx.token().jwt().renew(caller.claim()) {
            Ok(token) => token,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        },
        Ok(false) => auth.token().to_owned(),
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    Response::data(&StatusCode::OK, &None, &TokenResJson::new(&token))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{http::StatusCode, test};
    use pp_dao::session::SessionDao;
    use pp_token_jwt::token::JwtToken;

    use crate::test_util::{self, call};

    #[actix_web::test]
    async fn refresh_keeps_fresh_token() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let user = test_util::applicant(&ctx, "amina@example.org", true).await;
        let token = test_util::token_for(&ctx, &user).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/token")
                .insert_header(test_util::bearer(&token))
        );

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.into_data()["token"].as_str(), Some(token.as_str()));
    }

    #[actix_web::test]
    async fn refresh_renews_token_near_expiry() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let user = test_util::applicant(&ctx, "amina@example.org", true).await;

        let session = SessionDao::new(user.id(), ctx.auth().session_ttl()).unwrap();
        session.db_insert(ctx.dao().db()).await.unwrap();
        let old = JwtToken::new("test-secret", &Duration::from_secs(60))
            .encode(session.id(), user.id())
            .unwrap();

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/token")
                .insert_header(test_util::bearer(&old))
        );
        assert_eq!(status, StatusCode::OK);
        let renewed = body.into_data()["token"].as_str().unwrap().to_owned();
        assert_ne!(renewed, old);

        let claim = ctx.token().jwt().decode(&renewed).unwrap();
        assert_eq!(claim.id(), session.id());
        assert_eq!(claim.user_id(), user.id());
    }

    #[actix_web::test]
    async fn refresh_requires_bearer() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;

        let (status, body) = call!(&app, test::TestRequest::get().uri("/api/token"));

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.error_message().is_some());
    }
}
