pub mod handlers;
pub mod session;

use crate::{config::Config, service::ThumbnailService};
use actix_web::{dev::Service, middleware, web, App, HttpServer};

pub use session::SessionUser;

const JSON_LIMIT: usize = 64 * 1024;

pub struct AppState {
    pub service: ThumbnailService,
}

impl AppState {
    pub fn new(service: ThumbnailService) -> Self {
        Self { service }
    }
}

/// Route table, shared by the server binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
        .route("/health", web::get().to(handlers::health))
        .service(
            web::resource("/thumbnails")
                .route(web::post().to(handlers::generate_thumbnail))
                .route(web::get().to(handlers::list_thumbnails)),
        )
        .service(
            web::resource("/thumbnails/{id}")
                .route(web::get().to(handlers::get_thumbnail))
                .route(web::delete().to(handlers::delete_thumbnail)),
        );
}

pub async fn run(config: Config, service: ThumbnailService) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(service));
    let session_header = config.session_header.clone();

    HttpServer::new(move || {
        let header = session_header.clone();
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .wrap_fn(move |req, srv| {
                session::attach_from_header(&req, &header);
                srv.call(req)
            })
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port()))?
    .run()
    .await
}
