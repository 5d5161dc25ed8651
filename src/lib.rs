pub mod controller;
pub mod domain;
pub mod fetch;
pub mod messages;
pub mod render;

#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{configure, run};

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use tera::Tera;

    use crate::fetch::HttpOfferFetcher;
    use crate::models::config::ServerConfig;
    use crate::render::Renderer;
    use crate::routes::main::show_index;

    /// Registers the site routes.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(show_index);
    }

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let fetcher = HttpOfferFetcher::new(
            &server_config.offers_api_url,
            Duration::from_secs(server_config.request_timeout_secs),
        )
        .map_err(|e| std::io::Error::other(format!("Failed to build offers client: {e}")))?;

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        // The site still serves without the lookup form if fragments are missing.
        let tera = Arc::new(tera);
        if let Err(err) = Renderer::init(tera.clone()) {
            log::error!("Offer lookup disabled: {err}");
        }

        let secret_key = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| std::io::Error::other(format!("Invalid session secret: {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Starting server on {}:{}, offers API at {}",
            bind_address.0,
            bind_address.1,
            fetcher.offers_url()
        );

        let tera = web::Data::from(tera);
        let fetcher = web::Data::new(fetcher);

        HttpServer::new(move || {
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .configure(configure)
                .app_data(tera.clone())
                .app_data(fetcher.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
