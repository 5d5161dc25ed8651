//! Projection of loading, error and offer states into the page.

use thiserror::Error;

use crate::domain::offer::Offer;

pub mod document;
pub mod renderer;

pub use document::{Document, OfferCard};
pub use renderer::Renderer;

/// Template fragment for a single offer card.
pub const OFFER_TEMPLATE: &str = "offers/offer.html";
/// Template fragment for a single loading placeholder.
pub const LOADING_TEMPLATE: &str = "offers/loading.html";

/// Raised when the page lacks an element the lookup feature depends on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("required template `{0}` not found")]
    MissingTemplate(&'static str),
}

/// View operations the form controller drives.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
pub trait OfferView {
    /// Shows `message` in the errors region, or clears it when empty.
    fn render_error(&mut self, message: &str);
    /// Replaces the results region with `count` loading placeholders.
    fn render_loading(&mut self, count: usize);
    fn clear_loading(&mut self);
    fn render_offers(&mut self, offers: Vec<Offer>);
    fn set_submit_disabled(&mut self, disabled: bool);
}
