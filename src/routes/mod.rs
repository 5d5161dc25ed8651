//! HTTP handlers of the site.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tera::{Context, Tera};

pub mod main;

/// Renders `template` into an HTML response, logging and answering 500 on failure.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
