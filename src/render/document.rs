//! In-memory page state the renderer projects into.

use serde::Serialize;

/// Render model of one offer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferCard {
    pub index: usize,
    pub name: String,
    /// Price already formatted for display.
    pub price: String,
    pub description: String,
    pub is_highlighted: bool,
    pub is_expanded: bool,
    /// Target of the "read more" control, if the page links one.
    pub toggle_href: Option<String>,
}

/// Regions of the offers page owned by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) errors: String,
    pub(crate) results: String,
    pub(crate) cards: Vec<OfferCard>,
    pub(crate) loading: usize,
    pub(crate) submit_disabled: bool,
}

impl Document {
    /// HTML of the address errors region.
    pub fn errors_html(&self) -> &str {
        &self.errors
    }

    /// HTML of the offer results region.
    pub fn results_html(&self) -> &str {
        &self.results
    }

    /// Cards currently shown in the results region.
    pub fn cards(&self) -> &[OfferCard] {
        &self.cards
    }

    /// Number of loading placeholders currently shown.
    pub fn loading_count(&self) -> usize {
        self.loading
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.submit_disabled
    }
}
