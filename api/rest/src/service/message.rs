use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::{activity_log::ActivityAction, dto::pagination::Pagination, message::MessageDao};
use pp_mailer::template;
use validator::Validate;

use crate::{
    context::ApiRestCtx,
    model::{
        message::{
            FindManyMessageReqQuery, InsertOneMessageReqJson, InsertOneMessageResJson,
            MessageReqPath, MessageResJson, UpdateOneMessageReqJson,
        },
        PaginationRes, Response,
    },
    util::{activity, auth, mail},
};

pub fn message_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/message", web::post().to(insert_one))
        .route("/admin/messages", web::get().to(find_many))
        .route("/admin/message/{message_id}", web::patch().to(update_one));
}

async fn insert_one(
    ctx: web::Data<ApiRestCtx>,
    data: web::Json<InsertOneMessageReqJson>,
) -> HttpResponse {
    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    let message_data = MessageDao::new(data.name(), data.email(), data.subject(), data.body());
    if let Err(err) = message_data.db_insert(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    mail::send(
        &ctx,
        template::message_received(
            message_data.email(),
            message_data.name(),
            message_data.subject(),
        ),
    );
    activity::record(
        &ctx,
        &None,
        &ActivityAction::MessageSubmit,
        &format!("{} from {}", message_data.id(), message_data.email()),
    )
    .await;

    Response::data(
        &StatusCode::CREATED,
        &None,
        &InsertOneMessageResJson::new(message_data.id()),
    )
}

async fn find_many(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    query: web::Query<FindManyMessageReqQuery>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    let pagination = Pagination::new(query.page(), query.limit(), ctx.application().page_size());
    let unread_only = query.unread().unwrap_or(false);

    let (messages_data, total) =
        match MessageDao::db_select_many(ctx.dao().db(), &unread_only, &pagination).await {
            Ok(data) => data,
            Err(err) => {
                return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        };

    Response::data(
        &StatusCode::OK,
        &Some(PaginationRes::new(&messages_data.len(), &total)),
        &messages_data
            .iter()
            .map(MessageResJson::from_dao)
            .collect::<Vec<_>>(),
    )
}

async fn update_one(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    path: web::Path<MessageReqPath>,
    data: web::Json<UpdateOneMessageReqJson>,
) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };
    if let Err(err) = caller.require_admin() {
        return Response::error(&err);
    }

    let mut message_data = match MessageDao::db_select(ctx.dao().db(), path.message_id()).await {
        Ok(Some(data)) => data,
        Ok(None) => return Response::error_raw(&StatusCode::NOT_FOUND, "Message not found"),
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    message_data.set_is_read(data.is_read());
    if let Err(err) = message_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::MessageUpdate,
        &format!("{} is_read={}", message_data.id(), message_data.is_read()),
    )
    .await;

    Response::data(
        &StatusCode::OK,
        &None,
        &MessageResJson::from_dao(&message_data),
    )
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    use crate::{
        model::PaginationRes,
        test_util::{self, call},
    };

    fn message() -> serde_json::Value {
        json!({
            "name": "Fatou Diop",
            "email": "fatou@example.org",
            "subject": "Eligibility",
            "body": "Can a regional office apply directly?"
        })
    }

    #[actix_web::test]
    async fn anyone_can_send_a_message() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;

        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/message").set_json(message())
        );
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.into_data()["id"].is_string());

        let mut invalid = message();
        invalid["email"] = json!("not-an-email");
        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/message").set_json(invalid)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error_message().unwrap().contains("email"));

        let mut blank = message();
        blank["subject"] = json!("   ");
        let (status, body) = call!(
            &app,
            test::TestRequest::post().uri("/api/message").set_json(blank)
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_message(), Some("subject: subject must not be empty"));
    }

    #[actix_web::test]
    async fn admin_marks_messages_read() {
        let ctx = test_util::ctx().await;
        let app = test::init_service(test_util::app(&ctx)).await;
        let admin = test_util::admin(&ctx, "secretariat@example.org").await;
        let applicant = test_util::applicant(&ctx, "amina@example.org", true).await;
        let admin_token = test_util::token_for(&ctx, &admin).await;

        let mut ids = Vec::new();
        for _ in 0..2 {
            let (_, body) = call!(
                &app,
                test::TestRequest::post().uri("/api/message").set_json(message())
            );
            ids.push(body.into_data()["id"].as_str().unwrap().to_owned());
        }

        let (status, _) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/messages")
                .insert_header(test_util::bearer(
                    &test_util::token_for(&ctx, &applicant).await
                ))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call!(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/message/{}", ids[0]))
                .insert_header(test_util::bearer(&admin_token))
                .set_json(json!({ "is_read": true }))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.into_data()["is_read"], json!(true));

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/messages?unread=true")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pagination(), &Some(PaginationRes::new(&1, &1)));
        assert_eq!(body.into_data()[0]["id"], json!(ids[1]));

        let (status, body) = call!(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/messages")
                .insert_header(test_util::bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.pagination(), &Some(PaginationRes::new(&2, &2)));
    }
}
