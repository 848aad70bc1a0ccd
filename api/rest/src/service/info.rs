use actix_web::{http::StatusCode, web, HttpResponse};
use pp_dao::application::{ApplicationSector, ApplicationStatus};

use crate::model::Response;

pub fn info_api(cfg: &mut web::ServiceConfig) {
    cfg.route("/info/sectors", web::get().to(sectors))
        .route("/info/statuses", web::get().to(statuses));
}

async fn sectors() -> HttpResponse {
    Response::data(
        &StatusCode::OK,
        &None,
        ApplicationSector::all()
            .iter()
            .map(|sector| sector.to_string())
            .collect::<Vec<_>>(),
    )
}

async fn statuses() -> HttpResponse {
    Response::data(
        &StatusCode::OK,
        &None,
        ApplicationStatus::all()
            .iter()
            .map(|status| status.to_string())
            .collect::<Vec<_>>(),
    )
}
