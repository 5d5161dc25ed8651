//! Tera backed [`OfferView`] implementation.

use std::sync::Arc;

use tera::{Context, Tera};

use crate::domain::offer::{Offer, format_price, sort_offers_desc};
use crate::messages::ADDRESS_NO_OFFERS;
use crate::render::{Document, InitError, LOADING_TEMPLATE, OFFER_TEMPLATE, OfferCard, OfferView};

/// Renders offers page states into a [`Document`].
pub struct Renderer {
    templates: Arc<Tera>,
    document: Document,
    toggle_base: Option<String>,
}

impl Renderer {
    /// Checks that every fragment the renderer needs is available.
    pub fn init(templates: Arc<Tera>) -> Result<Self, InitError> {
        for name in [OFFER_TEMPLATE, LOADING_TEMPLATE] {
            if !templates.get_template_names().any(|t| t == name) {
                return Err(InitError::MissingTemplate(name));
            }
        }

        Ok(Self {
            templates,
            document: Document::default(),
            toggle_base: None,
        })
    }

    /// Links each card's "read more" control to `base` with an `expand`
    /// parameter appended. `base` must already carry a query string.
    pub fn with_toggle_link(mut self, base: impl Into<String>) -> Self {
        self.toggle_base = Some(base.into());
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Handles activation of a card's "read more" control. Flips the expanded
    /// state of the card's description and icon and returns the new
    /// `aria-expanded` value, or `None` when no such card is shown.
    pub fn toggle_description(&mut self, index: usize) -> Option<bool> {
        let card = self.document.cards.get_mut(index)?;
        card.is_expanded = !card.is_expanded;
        let is_expanded = card.is_expanded;
        self.refresh_toggle_href(index);
        self.project_cards();
        Some(is_expanded)
    }

    fn refresh_toggle_href(&mut self, index: usize) {
        let Some(base) = self.toggle_base.as_deref() else {
            return;
        };
        if let Some(card) = self.document.cards.get_mut(index) {
            card.toggle_href = Some(if card.is_expanded {
                base.to_string()
            } else {
                format!("{base}&expand={index}")
            });
        }
    }

    fn render_fragment(&self, name: &str, context: &Context) -> Option<String> {
        match self.templates.render(name, context) {
            Ok(html) => Some(html),
            Err(err) => {
                log::error!("Failed to render {name}: {err}");
                None
            }
        }
    }

    fn project_cards(&mut self) {
        let mut html = String::new();
        for card in &self.document.cards {
            let context = match Context::from_serialize(card) {
                Ok(context) => context,
                Err(err) => {
                    log::error!("Failed to build offer context: {err}");
                    continue;
                }
            };
            if let Some(fragment) = self.render_fragment(OFFER_TEMPLATE, &context) {
                html.push_str(&fragment);
            }
        }
        self.document.results = html;
    }
}

impl OfferView for Renderer {
    fn render_error(&mut self, message: &str) {
        self.document.errors = if message.is_empty() {
            String::new()
        } else {
            format!("<p>{}</p>", tera::escape_html(message))
        };
    }

    fn render_loading(&mut self, count: usize) {
        self.document.cards.clear();
        match self.render_fragment(LOADING_TEMPLATE, &Context::new()) {
            Some(placeholder) => {
                self.document.results = placeholder.repeat(count);
                self.document.loading = count;
            }
            None => {
                self.document.results.clear();
                self.document.loading = 0;
            }
        }
    }

    fn clear_loading(&mut self) {
        if self.document.loading > 0 {
            self.document.results.clear();
            self.document.loading = 0;
        }
    }

    fn render_offers(&mut self, mut offers: Vec<Offer>) {
        self.document.loading = 0;

        if offers.is_empty() {
            self.document.cards.clear();
            self.document.results = format!("<div class=\"no-offers\">{ADDRESS_NO_OFFERS}</div>");
            return;
        }

        sort_offers_desc(&mut offers);

        // Highlight the first card only if it's not the only one.
        let highlight_first = offers.len() > 1;
        self.document.cards = offers
            .into_iter()
            .enumerate()
            .map(|(index, offer)| OfferCard {
                index,
                name: offer.name,
                price: format_price(offer.price),
                description: offer.description,
                is_highlighted: highlight_first && index == 0,
                is_expanded: false,
                toggle_href: None,
            })
            .collect();

        for index in 0..self.document.cards.len() {
            self.refresh_toggle_href(index);
        }
        self.project_cards();
    }

    fn set_submit_disabled(&mut self, disabled: bool) {
        self.document.submit_disabled = disabled;
    }
}
