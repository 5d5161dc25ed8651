use std::sync::Arc;

use tera::Tera;
use url::form_urlencoded;

use crate::controller::{FormController, SubmitOutcome};
use crate::fetch::OfferFetcher;
use crate::forms::main::AddressForm;
use crate::messages::FETCH_ERROR_ADDRESS_TOO_LONG;
use crate::render::{Document, OfferView, Renderer};
use crate::services::ServiceResult;

/// Data required to render the offers index template.
#[derive(Debug)]
pub struct OffersPageData {
    /// Address echoed back into the input field.
    pub address: Option<String>,
    pub document: Document,
    /// Offer count to remember for the visitor's next submission.
    pub last_offer_count: usize,
    /// `None` when nothing was submitted.
    pub outcome: Option<SubmitOutcome>,
}

/// Runs an address submission for one visitor and returns the rendered page
/// regions.
pub async fn lookup_offers<F>(
    fetcher: F,
    templates: Arc<Tera>,
    form: AddressForm,
    last_offer_count: usize,
) -> ServiceResult<OffersPageData>
where
    F: OfferFetcher,
{
    let mut renderer = Renderer::init(templates)?;

    let address = match form.submitted_address() {
        Ok(Some(address)) => address.to_string(),
        Ok(None) => {
            return Ok(OffersPageData {
                address: None,
                document: renderer.into_document(),
                last_offer_count,
                outcome: None,
            });
        }
        Err(err) => {
            log::warn!("Rejected address form: {err}");
            renderer.render_error(FETCH_ERROR_ADDRESS_TOO_LONG);
            return Ok(OffersPageData {
                address: form.address.clone(),
                document: renderer.into_document(),
                last_offer_count,
                outcome: None,
            });
        }
    };

    let renderer = renderer.with_toggle_link(toggle_base(&address));
    let controller =
        FormController::new(fetcher, renderer).with_last_offer_count(last_offer_count);

    let outcome = controller.submit(&address).await;

    if let Some(index) = form.expand {
        if controller.with_view(|view| view.toggle_description(index)).is_none() {
            log::debug!("No offer card {index} to expand.");
        }
    }

    let last_offer_count = controller.last_offer_count();
    Ok(OffersPageData {
        address: Some(address),
        document: controller.into_view().into_document(),
        last_offer_count,
        outcome: Some(outcome),
    })
}

/// Link back to the page for `address`, to which card toggles append `expand`.
fn toggle_base(address: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("address", address)
        .finish();
    format!("/?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::offer::Offer;
    use crate::fetch::{FetchResult, MockOfferFetcher};
    use crate::messages::FETCH_ERROR_GENERAL;
    use crate::services::ServiceError;

    fn templates() -> Arc<Tera> {
        Arc::new(Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap())
    }

    fn form(address: &str) -> AddressForm {
        AddressForm {
            address: Some(address.to_string()),
            expand: None,
        }
    }

    fn offers() -> Vec<Offer> {
        vec![
            Offer {
                name: "Basic".to_string(),
                price: 1999,
                description: "Entry level".to_string(),
            },
            Offer {
                name: "Premium".to_string(),
                price: 4999,
                description: "Everything included".to_string(),
            },
        ]
    }

    #[actix_web::test]
    async fn landing_page_does_not_fetch() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher.expect_fetch_offers().never();

        let data = lookup_offers(fetcher, templates(), AddressForm::default(), 4)
            .await
            .unwrap();

        assert!(data.outcome.is_none());
        assert_eq!(data.last_offer_count, 4);
        assert_eq!(data.document.results_html(), "");
        assert_eq!(data.document.errors_html(), "");
    }

    #[actix_web::test]
    async fn overlong_address_is_rejected_before_fetch() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher.expect_fetch_offers().never();

        let data = lookup_offers(fetcher, templates(), form(&"Street 1 ".repeat(100)), 0)
            .await
            .unwrap();

        assert!(data.outcome.is_none());
        assert!(data.document.errors_html().contains(FETCH_ERROR_ADDRESS_TOO_LONG));
    }

    #[actix_web::test]
    async fn successful_lookup_remembers_offer_count() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .times(1)
            .returning(|_| FetchResult::Success { data: offers() });

        let data = lookup_offers(fetcher, templates(), form("Main Street 1"), 0)
            .await
            .unwrap();

        assert_eq!(data.outcome, Some(SubmitOutcome::Rendered(2)));
        assert_eq!(data.last_offer_count, 2);
        assert_eq!(data.address.as_deref(), Some("Main Street 1"));
        let names: Vec<_> = data.document.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Premium", "Basic"]);
        assert_eq!(
            data.document.cards()[1].toggle_href.as_deref(),
            Some("/?address=Main+Street+1&expand=1")
        );
        assert!(!data.document.is_submit_disabled());
    }

    #[actix_web::test]
    async fn failed_lookup_shows_error() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .returning(|_| FetchResult::failure(FETCH_ERROR_GENERAL));

        let data = lookup_offers(fetcher, templates(), form("Main Street 1"), 3)
            .await
            .unwrap();

        assert_eq!(data.last_offer_count, 3);
        assert!(data.document.errors_html().contains(FETCH_ERROR_GENERAL));
        assert_eq!(data.document.results_html(), "");
    }

    #[actix_web::test]
    async fn expand_toggles_requested_card() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .returning(|_| FetchResult::Success { data: offers() });

        let mut form = form("Main Street 1");
        form.expand = Some(0);
        let data = lookup_offers(fetcher, templates(), form, 0).await.unwrap();

        assert!(data.document.cards()[0].is_expanded);
        assert!(!data.document.cards()[1].is_expanded);
        assert!(data.document.results_html().contains("aria-expanded=\"true\""));
    }

    #[actix_web::test]
    async fn missing_templates_disable_lookup() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher.expect_fetch_offers().never();

        let result = lookup_offers(fetcher, Arc::new(Tera::default()), form("Main Street 1"), 0).await;

        assert!(matches!(result, Err(ServiceError::Init(_))));
    }
}
