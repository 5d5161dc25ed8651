//! `reqwest` backed offer fetcher.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::domain::offer::Offer;
use crate::fetch::{FetchError, FetchResult, OfferFetcher, OfferResponseFailure};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Characters left unescaped in a URI component; a space becomes `%20`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Fetches offers from `GET {base_url}/offers?address=...`.
#[derive(Clone, Debug)]
pub struct HttpOfferFetcher {
    client: Client,
    offers_url: Url,
}

/// Errors raised while constructing an [`HttpOfferFetcher`].
#[derive(Debug, Error)]
pub enum FetcherBuildError {
    #[error("invalid offers API url: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl HttpOfferFetcher {
    /// Creates a fetcher for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetcherBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Creates a fetcher reusing an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, FetcherBuildError> {
        let base = Url::parse(base_url)?;
        let offers_url = Url::parse(&format!("{}/offers", base.as_str().trim_end_matches('/')))?;
        Ok(Self { client, offers_url })
    }

    pub fn offers_url(&self) -> &Url {
        &self.offers_url
    }

    /// Builds the request URL with the address percent-encoded as a URI component.
    pub fn request_url(&self, address: &str) -> Url {
        let mut url = self.offers_url.clone();
        let query = format!("address={}", utf8_percent_encode(address, URI_COMPONENT));
        url.set_query(Some(&query));
        url
    }

    async fn try_fetch(&self, address: &str) -> Result<Vec<Offer>, FetchError> {
        let response = self
            .client
            .get(self.request_url(address))
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let is_json = content_type
            .as_deref()
            .is_some_and(|value| value.contains(JSON_CONTENT_TYPE));
        if !is_json {
            let body = response.text().await?;
            return Err(FetchError::InvalidContentType {
                status,
                content_type,
                body,
            });
        }

        let body = response.bytes().await?;

        if status != StatusCode::OK {
            let failure: OfferResponseFailure = serde_json::from_slice(&body)
                .map_err(|source| FetchError::Decode { status, source })?;
            return Err(FetchError::Api { status, failure });
        }

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { status, source })
    }
}

#[async_trait(?Send)]
impl OfferFetcher for HttpOfferFetcher {
    async fn fetch_offers(&self, address: &str) -> FetchResult {
        match self.try_fetch(address).await {
            Ok(offers) => FetchResult::Success { data: offers },
            Err(err) => {
                log::error!("{err}");
                FetchResult::failure(err.user_message())
            }
        }
    }
}
