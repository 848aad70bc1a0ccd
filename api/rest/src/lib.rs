use actix_cors::Cors;
use actix_web::{
    middleware::{ErrorHandlers, Logger},
    web, App, HttpServer,
};
use anyhow::Result;
use configure::configure;
use context::ApiRestCtx;
use error_handler::default_error_handler;
use logger::logger_format;
use pp_config::app::AppConfigMode;
use tokio_util::sync::CancellationToken;

mod configure;
pub mod context;
mod error_handler;
mod logger;
mod model;
mod service;
#[cfg(test)]
mod test_util;
mod util;

pub struct ApiRestServer {
    mode: AppConfigMode,
    address: String,
    allowed_origin: Option<String>,
    context: web::Data<ApiRestCtx>,
}

impl ApiRestServer {
    pub fn new(
        mode: &AppConfigMode,
        host: &str,
        port: &u16,
        allowed_origin: &Option<String>,
        ctx: ApiRestCtx,
    ) -> Self {
        pp_log::info(Some("⚡"), "[ApiRestServer] Initializing component");

        Self {
            mode: *mode,
            address: format!("{host}:{port}"),
            allowed_origin: allowed_origin.clone(),
            context: web::Data::new(ctx),
        }
    }

    pub async fn run(self, cancel_token: CancellationToken) -> Result<()> {
        pp_log::info(Some("💫"), "[ApiRestServer] Running component");

        let Self {
            mode,
            address,
            allowed_origin,
            context,
        } = self;

        let server = HttpServer::new(move || {
            App::new()
                .wrap(cors(&mode, &allowed_origin))
                .wrap(Logger::new(logger_format()))
                .wrap(ErrorHandlers::new().default_handler(default_error_handler))
                .app_data(context.clone())
                .configure(configure)
        })
        .bind(address)?
        .run();

        let handle = server.handle();
        let stop_on_cancel = {
            let cancel_token = cancel_token.clone();
            async move {
                cancel_token.cancelled().await;
                pp_log::info(None, "[ApiRestServer] Stopping component");
                handle.stop(true).await;
            }
        };
        let serve = async move {
            let res = server.await;
            cancel_token.cancel();
            res
        };

        let ((), res) = futures::join!(stop_on_cancel, serve);

        Ok(res?)
    }
}

fn cors(mode: &AppConfigMode, allowed_origin: &Option<String>) -> Cors {
    match (mode, allowed_origin) {
        (_, Some(origin)) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        (AppConfigMode::Development, None) => Cors::permissive(),
        (AppConfigMode::Production, None) => Cors::default(),
    }
}
