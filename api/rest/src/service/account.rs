use actix_web::{http::StatusCode, web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use pp_dao::activity_log::ActivityAction;
use validator::Validate;

use crate::{
    context::ApiRestCtx,
    model::{
        account::{ChangePasswordReqJson, UpdateAccountReqJson, UserResJson},
        NoticeResJson, Response,
    },
    util::{activity, auth},
};

pub fn account_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(find_one))
        .route("/me", web::patch().to(update_one))
        .route("/me/password", web::post().to(change_password));
}

async fn find_one(ctx: web::Data<ApiRestCtx>, auth: BearerAuth) -> HttpResponse {
    let caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    Response::data(&StatusCode::OK, &None, &UserResJson::from_dao(caller.user()))
}

async fn update_one(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    data: web::Json<UpdateAccountReqJson>,
) -> HttpResponse {
    let mut caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    if data.is_all_none() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, "Nothing to update");
    }

    let user_data = caller.user_mut();
    if let Some(name) = data.name() {
        user_data.set_name(name);
    }
    if let Some(country) = data.country() {
        user_data.set_country(country);
    }
    if let Some(organization) = data.organization() {
        user_data.set_organization(organization);
    }
    if let Some(two_factor_enabled) = data.two_factor_enabled() {
        user_data.set_two_factor_enabled(two_factor_enabled);
    }

    if let Err(err) = user_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::AccountUpdate,
        "",
    )
    .await;

    Response::data(&StatusCode::OK, &None, &UserResJson::from_dao(caller.user()))
}

async fn change_password(
    ctx: web::Data<ApiRestCtx>,
    auth: BearerAuth,
    data: web::Json<ChangePasswordReqJson>,
) -> HttpResponse {
    let mut caller = match auth::authenticate(&ctx, &auth).await {
        Ok(caller) => caller,
        Err(err) => return Response::error(&err),
    };

    if let Err(err) = data.validate() {
        return Response::error_raw(&StatusCode::BAD_REQUEST, &err.to_string());
    }

    if ctx
        .hash()
        .argon2()
        .verify_password(data.current_password(), caller.user().password_hash())
        .is_err()
    {
        return Response::error_raw(&StatusCode::BAD_REQUEST, "Current password is incorrect");
    }

    let password_hash = match ctx.hash().argon2().hash_password(data.new_password()) {
        Ok(hash) => hash,
        Err(err) => {
            return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    };

    let user_data = caller.user_mut();
    user_data.set_password_hash(&password_hash);
    if let Err(err) = user_data.db_update(ctx.dao().db()).await {
        return Response::error_raw(&StatusCode::INTERNAL_SERVER_ERROR, &err.to_string());
    }

    activity::record(
        &ctx,
        &Some(*caller.user().id()),
        &ActivityAction::AccountChangePassword,
        "",
    )
    .await;

    Response::data(
        &StatusCode::OK,
        &None,
        &NoticeResJson::new("Password has been changed"),
    )
}
