use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::{activity_log::ActivityAction, application::ApplicationDao};
use pp_mailer::template;

use crate::{
    context::ApiRestCtx,
    model::{
        application::{
            ApplicationReqPath, ApplicationResJson, InsertOneApplicationReqJson,
            UpdateOneApplicationReqJson,
        },
        Response,
    },
    util::{activity, auth, mail},
};

pub fn application_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/application", web::post().to(insert_one))
        .route("/applications", web::get().to(find_many))
        .route("/application/{application_id}", web::get().to(find_one))
        .route("/application/{application_id}", web::patch().to(update_one));
}

async fn insert_one(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    data: web::Json<InsertOneApplicationReqJson>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    if caller.user().is_admin() {
        return Response::error_raw(
            &StatusCode::FORBIDDEN,
            "Only applicants can submit applications",
        );
    }

    let application_data = match ApplicationDao::new(
        caller.user().id(),
        &data.project().to_section(),
        &data.budget().to_section(),
        ctx.application().max_budget(),
    ) {
        Ok(data) => data,
        Err(err) => return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string()),
    };

    if let Err(err) = application_data.db_insert(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    mail::send(
        &ctx,
        template::application_received(
            caller.user().email(),
            caller.user().name(),
            application_data.title(),
            &application_data.id().to_string(),
            application_data.total_budget(),
        ),
    );
    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::ApplicationSubmit,
        &application_data.id().to_string(),
    )
    .await;

    Response::data(
        &StatusCode::CREATED,
        &None,
        &ApplicationResJson::from_dao(&application_data),
    )
}

async fn find_many(ctx: web::Data<ApiRestCtx>, auth: BearerAuth) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    let applications_data =
        match ApplicationDao::db_select_many_by_user_id(ctx.dao().db(), caller.user().id()).await
        {
            Ok(data) => data,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    Response::data(
        &StatusCode::OK,
        &None,
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

    let application_data =
        match ApplicationDao::db_select(ctx.dao().db(), path.application_id()).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                return Response::error_raw(&StatusCode::NOT_FOUND, "Application not found")
            }
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    if application_data.user_id() != caller.user().id() && !caller.user().is_admin() {
        return Response::error_raw(
            &StatusCode::FORBIDDEN,
            "Not allowed to view this application",
        );
    }

    Response::data(
        &StatusCode::OK,
        &None,
        &ApplicationResJson::from_dao(&application_data),
    )
}

async fn update_one(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    path: web::Path<ApplicationReqPath>,
    data: web::Json<UpdateOneApplicationReqJson>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    if data.is_all_none() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, "Nothing to update");
    }

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

    if application_data.user_id() != caller.user().id() {
        return Response::error_raw(
            &StatusCode::FORBIDDEN,
            "Only the applicant can edit this application",
        );
    }

    if !application_data.is_editable() {
        return Response::error_raw(
            &StatusCode::CONFLICT,
            "Application has already been reviewed and can no longer be edited",
        );
    }

    if let Some(project) = data.project() {
        if let Err(err) = application_data.set_project(&project.to_section()) {
            return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
        }
    }
    if let Some(budget) = data.budget() {
        if let Err(err) =
            application_data.set_budget(&budget.to_section(), ctx.application().max_budget())
        {
            return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
        }
    }

    if let Err(err) = application_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::ApplicationUpdate,
        &application_data.id().to_string(),
    )
    .await;

    Response::data(
        &StatusCode::OK,
        &None,
        &ApplicationResJson::from_dao(&application_data),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_util::{self, call};

    pub fn form() -> Value {
        json!({
            "project": {
                "title": "Literacy workshops in rural schools",
                "country": "Senegal",
                "national_commission": "Senegal National Commission for UNESCO",
                "sector": "education",
                "summary": "Training 200 primary school tutors",
                "objectives": "Improve literacy outcomes",
                "beneficiaries": "Pupils in 40 schools",
                "start_date": "2026-01-01",
                "end_date": "2026-12-31"
            },
            "budget": {
                "lines": [
                    { "description": "Workshops", "quantity": 4, "unit_cost": 5000 },
                    { "description": "Materials", "quantity": 200, "unit_cost": 25 }
                ],
                "other_funding": 1000
            }
        })
    }

    #[actix_web::test]
    async fn submits_and_lists_own_application() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let user = test_util::applicant(&ctx, "amina@example.org", true).await;
        let token = test_util::token_for(&ctx, &user).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/application")
                .insert_header(test_util::bearer(&token))
                .set_json(form())
        );
        assert_eq!(status, StatusCode::CREATED);
        let data = body.into_data();
        assert_eq!(data["status"], json!("pending"));
        assert_eq!(data["total_budget"], json!(25_000));

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/applications")
                .insert_header(test_util::bearer(&token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.into_data().as_array().map(|list| list.len()), Some(1));
    }

    #[actix_web::test]
    async fn admins_cannot_submit() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let admin = test_util::admin(&ctx, "secretariat@example.org").await;
        let token = test_util::token_for(&ctx, &admin).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/application")
                .insert_header(test_util::bearer(&token))
                .set_json(form())
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body.error_message(),
            Some("Only applicants can submit applications")
        );

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/applications")
                .insert_header(test_util::bearer(&token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.into_data().as_array().map(|list| list.len()), Some(0));
    }

    #[actix_web::test]
    async fn reports_failing_step() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let user = test_util::applicant(&ctx, "amina@example.org", true).await;
        let token = test_util::token_for(&ctx, &user).await;

        let mut over_budget = form();
        over_budget["budget"]["lines"][0]["quantity"] = json!(100);
        let (status, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/application")
                .insert_header(test_util::bearer(&token))
                .set_json(over_budget)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error_message().unwrap().starts_with("budget: "));

        let mut bad_dates = form();
        bad_dates["project"]["end_date"] = json!("2025-06-01");
        let (status, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/application")
                .insert_header(test_util::bearer(&token))
                .set_json(bad_dates)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.error_message(),
            Some("project: end_date must be after start_date")
        );
    }

    #[actix_web::test]
    async fn other_applicants_cannot_read_or_edit() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let owner = test_util::applicant(&ctx, "amina@example.org", true).await;
        let other = test_util::applicant(&ctx, "jean@example.org", true).await;
        let owner_token = test_util::token_for(&ctx, &owner).await;
        let other_token = test_util::token_for(&ctx, &other).await;

        let (_, body) = call!(
            &app,
            test::TestRequest::post()
                .uri("/api/application")
                .insert_header(test_util::bearer(&owner_token))
                .set_json(form())
        );
        let id = body.into_data()["id"].as_str().unwrap().to_owned();

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/application/{id}"))
                .insert_header(test_util::bearer(&other_token))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/application/{id}"))
                .insert_header(test_util::bearer(&other_token))
                .set_json(json!({ "budget": form()["budget"] }))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let mut project = form()["project"].clone();
        project["title"] = json!("Literacy workshops, phase two");
        let (status, body) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/application/{id}"))
                .insert_header(test_util::bearer(&owner_token))
                .set_json(json!({ "project": project }))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.into_data()["title"], json!("Literacy workshops, phase two"));

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/application/018f2d3c-0000-7000-8000-000000000000")
                .insert_header(test_util::bearer(&owner_token))
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
