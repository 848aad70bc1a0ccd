use actix_web::web;

use crate::service::{
    account::account_api, admin::admin_api, application::application_api, auth::auth_api,
    info::info_api, message::message_api, review::review_api, root::root_api, token::token_api,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(root_api).service(
        web::scope("/api")
            .configure(info_api)
            .configure(auth_api)
            .configure(token_api)
            .configure(account_api)
            .configure(application_api)
            .configure(review_api)
            .configure(message_api)
            .configure(admin_api),
    );
}
