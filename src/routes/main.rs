use actix_session::Session;
use actix_web::{Responder, get, web};
use tera::{Context, Tera};

use crate::fetch::HttpOfferFetcher;
use crate::forms::main::AddressForm;
use crate::routes::render_template;
use crate::services::offers as offers_service;

/// Session key remembering how many offers the visitor's last lookup returned.
pub const LAST_OFFER_COUNT_KEY: &str = "last_offer_count";

#[get("/")]
/// Show the landing page, running an address lookup when one was submitted.
pub async fn show_index(
    web::Query(form): web::Query<AddressForm>,
    session: Session,
    fetcher: web::Data<HttpOfferFetcher>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let last_offer_count = session
        .get::<usize>(LAST_OFFER_COUNT_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Failed to read session offer count: {err}");
            None
        })
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("current_page", "index");

    match offers_service::lookup_offers(
        fetcher.get_ref().clone(),
        tera.clone().into_inner(),
        form,
        last_offer_count,
    )
    .await
    {
        Ok(data) => {
            if data.last_offer_count != last_offer_count {
                if let Err(err) = session.insert(LAST_OFFER_COUNT_KEY, data.last_offer_count) {
                    log::error!("Failed to store session offer count: {err}");
                }
            }
            context.insert("lookup_enabled", &true);
            context.insert("address", &data.address.unwrap_or_default());
            context.insert("errors", data.document.errors_html());
            context.insert("results", data.document.results_html());
            context.insert("submit_disabled", &data.document.is_submit_disabled());
        }
        Err(err) => {
            log::error!("Failed to look up offers: {err}");
            context.insert("lookup_enabled", &false);
            context.insert("address", "");
            context.insert("errors", "");
            context.insert("results", "");
            context.insert("submit_disabled", &true);
        }
    }

    render_template(&tera, "main/index.html", &context)
}
