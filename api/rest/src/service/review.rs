use std::str::FromStr;

use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::{
    activity_log::ActivityAction,
    application::{ApplicationDao, ApplicationStatus},
    dto::pagination::Pagination,
    user::UserDao,
};
use pp_mailer::template;
use validator::Validate;

use crate::{
    context::ApiRestCtx,
    model::{
        application::{ApplicationReqPath, ApplicationResJson},
        review::{ApplicationStatsResJson, FindManyApplicationReqQuery, ReviewApplicationReqJson},
        PaginationRes, Response,
    },
    util::{activity, auth, mail},
};

pub fn review_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/applications", web::get().to(find_many))
        .route(
            "/admin/application/{application_id}",
            web::get().to(find_one),
        )
        .route(
            "/admin/application/{application_id}",
            web::patch().to(review_one),
        )
        .route("/admin/stats", web::get().to(stats));
}

fn parse_status(status: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::from_str(status.trim()).map_err(|_| {
        format!("Unknown status '{status}', expected one of pending, approved, rejected")
    })
}

async fn find_many(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    query: web::Query<FindManyApplicationReqQuery>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    let status = match query.status().as_deref().map(parse_status).transpose() {
        Ok(status) => status,
        Err(err) => return Response::error_raw(&StatusCode::BAD_REQUEST, &err),
    };
    let pagination = Pagination::new(query.page(), query.limit(), ctx.application().page_size());

    let (applications_data, total) =
        match ApplicationDao::db_select_many(ctx.dao().db(), &status, &pagination).await {
            Ok(data) => data,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    Response::data(
        &StatusCode::OK,
        &Some(PaginationRes::new(&applications_data.len(), &total)),
        &applications_data
            .iter()
            .map(ApplicationResJson::from_dao)
            .collect::<Vec<_>>(),
    )
}

async fn find_one(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    path: web::Path<ApplicationReqPath>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    match ApplicationDao::db_select(ctx.dao().db(), path.application_id()).await {
        Ok(Some(data)) => Response::data(
            &StatusCode::OK,
            &None,
            &ApplicationResJson::from_dao(&data),
        ),
        Ok(None) => Response::error_raw(&StatusCode::NOT_FOUND, "Application not found"),
        Err(err) => Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

async fn review_one(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    path: web::Path<ApplicationReqPath>,
    data: web::Json<ReviewApplicationReqJson>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }
    if data.is_all_none() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, "Nothing to update");
    }

    let status = match data.status().as_deref().map(parse_status).transpose() {
        Ok(status) => status,
        Err(err) => return Response::error_raw(&StatusCode::BAD_REQUEST, &err),
    };

    let mut application_data =
        match ApplicationDao::db_select(ctx.dao().db(), path.application_id()).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                return Response::error_raw(&StatusCode::NOT_FOUND, "Application not found")
            }
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    let status_changed = match application_data.set_review(
        caller.user().id(),
        &status,
        data.marks(),
        data.feedback(),
    ) {
        Ok(changed) => changed,
        Err(err) => return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string()),
    };

    if let Err(err) = application_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    if status_changed && application_data.status().is_decision() {
        notify_decision(&ctx, &application_data).await;
    }

    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::ApplicationReview,
        &format!(
            "{} -> {}",
            application_data.id(),
            application_data.status()
        ),
    )
    .await;

    Response::data(
        &StatusCode::OK,
        &None,
        &ApplicationResJson::from_dao(&application_data),
    )
}

async fn notify_decision(ctx: &ApiRestCtx, application_data: &ApplicationDao) {
    let applicant = match UserDao::db_select(ctx.dao().db(), application_data.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            pp_log::warn(
                None,
                format!(
                    "[ApiRestServer] Applicant {} of application {} no longer exists",
                    application_data.user_id(),
                    application_data.id()
                ),
            );
            return;
        }
        Err(err) => {
            pp_log::error(
                None,
                format!("[ApiRestServer] Failed to load applicant for decision mail: {err}"),
            );
            return;
        }
    };

    mail::send(
        ctx,
        template::application_decision(
            applicant.email(),
            applicant.name(),
            application_data.title(),
            *application_data.status() == ApplicationStatus::Approved,
            application_data.marks(),
            application_data.feedback(),
        ),
    );
}

async fn stats(ctx: web::Data<ApiRestCtx>, auth: BearerAuth) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    match futures::try_join!(
        ApplicationDao::db_stats(ctx.dao().db()),
        UserDao::db_count(ctx.dao().db())
    ) {
        Ok((stats, users)) => Response::data(
            &StatusCode::OK,
            &None,
            &ApplicationStatsResJson::from_dao(&stats, &users),
        ),
        Err(err) => Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::{
        service::application::tests::form,
        test_util::{self, call},
    };

    #[actix_web::test]
    async fn approval_is_visible_on_next_fetch() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let applicant = test_util::applicant(&ctx, "amina@example.org", true).await;
        let admin = test_util::admin(&ctx, "secretariat@example.org").await;
        let applicant_token = test_util::token_for(&ctx, &applicant).await;
        let admin_token = test_util::token_for(&ctx, &admin).await;

        let (_, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/application")
                .insert_header(test_util::bearer(&applicant_token))
                .set_json(form())
        );
        let id = body.into_data()["id"].as_str().unwrap().to_owned();

        let (status, _) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/application/{id}"))
                .insert_header(test_util::bearer(&applicant_token))
                .set_json(json!({ "status": "approved" }))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/application/{id}"))
                .insert_header(test_util::bearer(&admin_token))
                .set_json(json!({ "marks": 101 }))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/application/{id}"))
                .insert_header(test_util::bearer(&admin_token))
                .set_json(json!({ "status": "approved", "marks": 87, "feedback": "Strong proposal" }))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/application/{id}"))
                .insert_header(test_util::bearer(&applicant_token))
        );
        assert_eq!(status, StatusCode::OK);
        let data = body.into_data();
        assert_eq!(data["status"], json!("approved"));
        assert_eq!(data["marks"], json!(87));
        assert_eq!(data["reviewed_by"], json!(admin.id()));

        let (status, _) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/application/{id}"))
                .insert_header(test_util::bearer(&applicant_token))
                .set_json(json!({ "budget": form()["budget"] }))
        );
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn lists_by_status_and_aggregates() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let applicant = test_util::applicant(&ctx, "amina@example.org", true).await;
        let admin = test_util::admin(&ctx, "secretariat@example.org").await;
        let applicant_token = test_util::token_for(&ctx, &applicant).await;
        let admin_token = test_util::token_for(&ctx, &admin).await;

        let mut ids = Vec::new();
        for _ in 0..3 {
            let (_, body) = call!(
                &app,
                test::TestRequest::post()
                    .uri("/api/application")
                    .insert_header(test_util::bearer(&applicant_token))
                    .set_json(form())
            );
            ids.push(body.into_data()["id"].as_str().unwrap().to_owned());
        }
        for (id, review) in ids.iter().zip([
            json!({ "status": "approved", "marks": 90 }),
            json!({ "status": "rejected", "marks": 40 }),
        ]) {
            let (status, _) = call!(
                &app,
                test::TestRequest::patch()
                    .uri(&format!("/api/admin/application/{id}"))
                    .insert_header(test_util::bearer(&admin_token))
                    .set_json(review)
            );
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/applications?status=pending&limit=10")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.pagination(),
            &Some(crate::model::PaginationRes::new(&1, &1))
        );

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/applications?status=archived")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/applications?page=9223372036854775807&limit=100")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.pagination(),
            &Some(crate::model::PaginationRes::new(&0, &3))
        );

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/stats")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        let data = body.into_data();
        assert_eq!(data["users"], json!(2));
        assert_eq!(data["total"], json!(3));
        assert_eq!(data["approved"], json!(1));
        assert_eq!(data["rejected"], json!(1));
        assert_eq!(data["pending"], json!(1));
        assert_eq!(data["average_marks"], json!(65.0));
        assert_eq!(data["approved_budget"], json!(25_000));
    }
}
