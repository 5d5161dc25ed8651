//! Fetching offers from the backend API.
//!
//! Fetchers never fail: every transport, format or domain error is logged and
//! collapsed into a [`FetchResult::Failure`] carrying a user-facing message.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::offer::Offer;
use crate::messages::{FETCH_ERROR_ADDRESS_TOO_LONG, FETCH_ERROR_GENERAL};

pub mod http;

pub use http::{FetcherBuildError, HttpOfferFetcher};

/// Outcome of a single fetch, consumed immediately by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success { data: Vec<Offer> },
    /// `error` is safe to show to the user.
    Failure { error: String },
}

impl FetchResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }
}

/// Error codes the backend reports for rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownParam,
    InvalidParam,
    #[serde(other)]
    Other,
}

/// Structured error body returned with non-200 responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OfferResponseFailure {
    #[serde(default)]
    pub code: Option<ErrorCode>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Internal failure taxonomy of a fetch. Never shown to the user verbatim.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetching offers failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[{status}] Received invalid response type. content_type={content_type:?} body={body:?}")]
    InvalidContentType {
        status: StatusCode,
        content_type: Option<String>,
        body: String,
    },

    #[error(
        "[{status}] Response returned error. code={:?} description={:?}",
        .failure.code,
        .failure.description
    )]
    Api {
        status: StatusCode,
        failure: OfferResponseFailure,
    },

    #[error("[{status}] Response body could not be decoded: {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Maps the failure to the message shown to the user. Only an invalid
    /// parameter gets a specific message; everything else is generic.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Api {
                failure:
                    OfferResponseFailure {
                        code: Some(ErrorCode::InvalidParam),
                        ..
                    },
                ..
            } => FETCH_ERROR_ADDRESS_TOO_LONG,
            _ => FETCH_ERROR_GENERAL,
        }
    }
}

/// Source of offers for a validated address.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
#[async_trait(?Send)]
pub trait OfferFetcher {
    async fn fetch_offers(&self, address: &str) -> FetchResult;
}
