use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::{activity_log::ActivityLogDao, dto::pagination::Pagination, user::UserDao};

use crate::{
    context::ApiRestCtx,
    model::{
        account::UserResJson,
        admin::{ActivityLogResJson, FindManyActivityLogReqQuery},
        PageReqQuery, PaginationRes, Response,
    },
    util::auth,
};

const MAX_LOG_LIMIT: i64 = 100;

pub fn admin_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/users", web::get().to(find_many_user))
        .route("/admin/activity-logs", web::get().to(find_many_activity_log));
}

async fn find_many_user(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    query: web::Query<PageReqQuery>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    let pagination = Pagination::new(query.page(), query.limit(), ctx.application().page_size());
    let (users_data, total) = match UserDao::db_select_many(ctx.dao().db(), &pagination).await {
        Ok(data) => data,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    Response::data(
        &StatusCode::OK,
        &Some(PaginationRes::new(&users_data.len(), &total)),
        &users_data
            .iter()
            .map(UserResJson::from_dao)
            .collect::<Vec<_>>(),
    )
}

async fn find_many_activity_log(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    query: web::Query<FindManyActivityLogReqQuery>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    let limit = query
        .limit()
        .unwrap_or(*ctx.application().page_size())
        .clamp(1, MAX_LOG_LIMIT);
    let (logs_data, total) =
        match ActivityLogDao::db_select_many(ctx.dao().db(), query.before_id(), &limit).await {
            Ok(data) => data,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    Response::data(
        &StatusCode::OK,
        &Some(PaginationRes::new(&logs_data.len(), &total)),
        &logs_data
            .iter()
            .map(ActivityLogResJson::from_dao)
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{http::StatusCode, test};
    use pp_dao::activity_log::{ActivityAction, ActivityLogDao};
    use serde_json::json;

    use crate::{
        model::PaginationRes,
        test_util::{self, call},
    };

    #[actix_web::test]
    async fn lists_users_for_admins_only() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let applicant = test_util::applicant(&ctx, "amina@example.org", true).await;
        test_util::applicant(&ctx, "jean@example.org", false).await;
        let admin = test_util::admin(&ctx, "secretariat@example.org").await;

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/users")
                .insert_header(test_util::bearer(
                    &test_util::token_for(&ctx, &applicant).await
                ))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin_token = test_util::token_for(&ctx, &admin).await;
        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/users?page=2&limit=2")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pagination(), &Some(PaginationRes::new(&1, &3)));
        let data = body.into_data();
        assert!(data[0].get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn pages_activity_logs_backwards() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let admin = test_util::admin(&ctx, "secretariat@example.org").await;
        let admin_token = test_util::token_for(&ctx, &admin).await;

        for detail in ["first", "second", "third"] {
            ActivityLogDao::new(&Some(*admin.id()), &ActivityAction::UserLogin, detail)
                .db_insert(ctx.dao().db())
                .await
                .unwrap();
            std::thread::sleep(Duration::from_millis(2));
        }

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/activity-logs?limit=2")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pagination(), &Some(PaginationRes::new(&2, &3)));
        let data = body.into_data();
        assert_eq!(data[0]["detail"], json!("third"));
        assert_eq!(data[0]["action"], json!("user.login"));
        let last = data[1]["id"].as_str().unwrap().to_owned();

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/admin/activity-logs?limit=2&before_id={last}"))
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        let data = body.into_data();
        assert_eq!(data.as_array().map(|logs| logs.len()), Some(1));
        assert_eq!(data[0]["detail"], json!("first"));
    }
}
