//! Address form controller.
//!
//! Orchestrates validation, fetching and rendering for one form instance. The
//! controller cycles through `Idle -> Submitting -> Idle`; a submission made
//! while another one is in flight is ignored.

use std::cell::{Cell, RefCell};

use crate::domain::address::{AddressError, validate_address};
use crate::fetch::{FetchResult, OfferFetcher};
use crate::render::OfferView;

/// Submission state of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

/// What a call to [`FormController::submit`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission was in flight; nothing happened.
    Ignored,
    /// The address was rejected before any request was made.
    Invalid(AddressError),
    /// The fetch failed with the given user-facing message.
    Failed(String),
    /// Offers were rendered; carries how many.
    Rendered(usize),
}

pub struct FormController<F, V> {
    fetcher: F,
    view: RefCell<V>,
    is_submitting: Cell<bool>,
    /// Used in the next submission to keep the same number of loading elements.
    last_offer_count: Cell<usize>,
}

impl<F, V> FormController<F, V>
where
    F: OfferFetcher,
    V: OfferView,
{
    pub fn new(fetcher: F, view: V) -> Self {
        Self {
            fetcher,
            view: RefCell::new(view),
            is_submitting: Cell::new(false),
            last_offer_count: Cell::new(0),
        }
    }

    /// Restores the offer count of a previous submission.
    pub fn with_last_offer_count(self, count: usize) -> Self {
        self.last_offer_count.set(count);
        self
    }

    pub fn state(&self) -> SubmitState {
        if self.is_submitting.get() {
            SubmitState::Submitting
        } else {
            SubmitState::Idle
        }
    }

    pub fn last_offer_count(&self) -> usize {
        self.last_offer_count.get()
    }

    /// Gives mutable access to the view between submissions.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut self.view.borrow_mut())
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    /// Processes a newly submitted address.
    pub async fn submit(&self, address: &str) -> SubmitOutcome {
        let Some(_guard) = SubmitGuard::enter(self) else {
            log::debug!("Submission ignored, another one is in flight.");
            return SubmitOutcome::Ignored;
        };

        // Clear previous error.
        self.view.borrow_mut().render_error("");

        if let Err(err) = validate_address(address) {
            self.view.borrow_mut().render_error(&err.to_string());
            return SubmitOutcome::Invalid(err);
        }

        // At least one loading element, but keep the previous number if there were more offers.
        let loading = self.last_offer_count.get().max(1);
        self.view.borrow_mut().render_loading(loading);

        match self.fetcher.fetch_offers(address).await {
            FetchResult::Failure { error } => {
                let mut view = self.view.borrow_mut();
                view.render_error(&error);
                view.clear_loading();
                SubmitOutcome::Failed(error)
            }
            FetchResult::Success { data } => {
                let count = data.len();
                let mut view = self.view.borrow_mut();
                view.clear_loading();
                self.last_offer_count.set(count);
                view.render_offers(data);
                SubmitOutcome::Rendered(count)
            }
        }
    }
}

/// Holds the controller in `Submitting` and returns it to `Idle` when dropped,
/// re-enabling the submit control.
struct SubmitGuard<'a, F, V>
where
    V: OfferView,
{
    controller: &'a FormController<F, V>,
}

impl<'a, F, V> SubmitGuard<'a, F, V>
where
    V: OfferView,
{
    fn enter(controller: &'a FormController<F, V>) -> Option<Self> {
        if controller.is_submitting.replace(true) {
            return None;
        }
        controller.view.borrow_mut().set_submit_disabled(true);
        Some(Self { controller })
    }
}

impl<F, V> Drop for SubmitGuard<'_, F, V>
where
    V: OfferView,
{
    fn drop(&mut self) {
        self.controller.is_submitting.set(false);
        self.controller.view.borrow_mut().set_submit_disabled(false);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use async_trait::async_trait;
    use futures::future::join;
    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::offer::Offer;
    use crate::fetch::MockOfferFetcher;
    use crate::messages::FETCH_ERROR_GENERAL;
    use crate::render::MockOfferView;

    fn dummy_offer() -> Offer {
        Offer {
            name: "Offer Name".to_string(),
            price: 1999,
            description: "Offer description".to_string(),
        }
    }

    fn permissive_view() -> MockOfferView {
        let mut view = MockOfferView::new();
        view.expect_set_submit_disabled().return_const(());
        view.expect_render_error().return_const(());
        view.expect_render_loading().return_const(());
        view.expect_clear_loading().return_const(());
        view.expect_render_offers().return_const(());
        view
    }

    /// Fetcher that yields once before answering, counting its calls.
    struct YieldingFetcher {
        calls: Rc<Cell<usize>>,
        result: FetchResult,
    }

    #[async_trait(?Send)]
    impl OfferFetcher for YieldingFetcher {
        async fn fetch_offers(&self, _address: &str) -> FetchResult {
            self.calls.set(self.calls.get() + 1);
            let mut yielded = false;
            futures::future::poll_fn(|cx| {
                if yielded {
                    std::task::Poll::Ready(())
                } else {
                    yielded = true;
                    cx.waker().wake_by_ref();
                    std::task::Poll::Pending
                }
            })
            .await;
            self.result.clone()
        }
    }

    #[actix_web::test]
    async fn valid_submission_renders_offers() {
        let mut seq = Sequence::new();
        let mut view = MockOfferView::new();
        view.expect_set_submit_disabled()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_render_error()
            .withf(|message| message.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_render_loading()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_clear_loading()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_render_offers()
            .with(eq(vec![dummy_offer()]))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        view.expect_set_submit_disabled()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .withf(|address| address == "Valid Address 123")
            .times(1)
            .returning(|_| FetchResult::Success {
                data: vec![dummy_offer()],
            });

        let controller = FormController::new(fetcher, view);
        let outcome = controller.submit("Valid Address 123").await;

        assert_eq!(outcome, SubmitOutcome::Rendered(1));
        assert_eq!(controller.last_offer_count(), 1);
        assert_eq!(controller.state(), SubmitState::Idle);
    }

    #[actix_web::test]
    async fn invalid_address_skips_loading_and_fetch() {
        let mut view = MockOfferView::new();
        view.expect_set_submit_disabled().return_const(());
        view.expect_render_error()
            .withf(|message| message.is_empty())
            .times(1)
            .return_const(());
        view.expect_render_error()
            .withf(|message| message == "Address must include a number.")
            .times(1)
            .return_const(());
        view.expect_render_loading().never();
        view.expect_render_offers().never();

        let mut fetcher = MockOfferFetcher::new();
        fetcher.expect_fetch_offers().never();

        let controller = FormController::new(fetcher, view);
        let outcome = controller.submit("Mainstreet").await;

        assert_eq!(outcome, SubmitOutcome::Invalid(AddressError::MissingNumber));
        assert_eq!(controller.state(), SubmitState::Idle);
    }

    #[actix_web::test]
    async fn failed_fetch_renders_error_and_clears_loading() {
        let mut view = MockOfferView::new();
        view.expect_set_submit_disabled().return_const(());
        view.expect_render_loading().with(eq(1)).times(1).return_const(());
        view.expect_render_error()
            .withf(|message| message.is_empty())
            .times(1)
            .return_const(());
        view.expect_render_error()
            .withf(|message| message == FETCH_ERROR_GENERAL)
            .times(1)
            .return_const(());
        view.expect_clear_loading().times(1).return_const(());
        view.expect_render_offers().never();

        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .times(1)
            .returning(|_| FetchResult::failure(FETCH_ERROR_GENERAL));

        let controller = FormController::new(fetcher, view).with_last_offer_count(0);
        let outcome = controller.submit("Valid Address 123").await;

        assert_eq!(outcome, SubmitOutcome::Failed(FETCH_ERROR_GENERAL.to_string()));
        assert_eq!(controller.last_offer_count(), 0);
        assert_eq!(controller.state(), SubmitState::Idle);
    }

    #[actix_web::test]
    async fn next_submission_keeps_previous_offer_count_placeholders() {
        let mut view = MockOfferView::new();
        view.expect_set_submit_disabled().return_const(());
        view.expect_render_error().return_const(());
        view.expect_clear_loading().return_const(());
        view.expect_render_offers().return_const(());
        view.expect_render_loading().with(eq(1)).times(1).return_const(());
        view.expect_render_loading().with(eq(2)).times(1).return_const(());

        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .times(2)
            .returning(|_| FetchResult::Success {
                data: vec![dummy_offer(), dummy_offer()],
            });

        let controller = FormController::new(fetcher, view);
        controller.submit("Valid Address 123").await;
        controller.submit("Valid Address 123").await;

        assert_eq!(controller.last_offer_count(), 2);
    }

    #[actix_web::test]
    async fn failed_fetch_keeps_previous_offer_count() {
        let mut fetcher = MockOfferFetcher::new();
        fetcher
            .expect_fetch_offers()
            .returning(|_| FetchResult::failure(FETCH_ERROR_GENERAL));

        let controller = FormController::new(fetcher, permissive_view()).with_last_offer_count(3);
        controller.submit("Valid Address 123").await;

        assert_eq!(controller.last_offer_count(), 3);
    }

    #[actix_web::test]
    async fn rapid_duplicate_submissions_fetch_once() {
        let calls = Rc::new(Cell::new(0));
        let fetcher = YieldingFetcher {
            calls: calls.clone(),
            result: FetchResult::Success { data: Vec::new() },
        };
        let controller = FormController::new(fetcher, permissive_view());

        let (first, second) = join(
            controller.submit("Valid Address 123"),
            controller.submit("Valid Address 123"),
        )
        .await;

        assert_eq!(first, SubmitOutcome::Rendered(0));
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(calls.get(), 1);
        assert_eq!(controller.state(), SubmitState::Idle);

        // Once idle again, a new submission goes through.
        assert_eq!(
            controller.submit("Valid Address 123").await,
            SubmitOutcome::Rendered(0)
        );
        assert_eq!(calls.get(), 2);
    }

    #[actix_web::test]
    async fn dropped_submission_returns_to_idle() {
        let calls = Rc::new(Cell::new(0));
        let fetcher = YieldingFetcher {
            calls: calls.clone(),
            result: FetchResult::Success { data: Vec::new() },
        };
        let mut view = MockOfferView::new();
        view.expect_render_error().return_const(());
        view.expect_render_loading().return_const(());
        view.expect_set_submit_disabled().with(eq(true)).times(1).return_const(());
        view.expect_set_submit_disabled().with(eq(false)).times(1).return_const(());
        let controller = FormController::new(fetcher, view);

        {
            let mut pending = Box::pin(controller.submit("Valid Address 123"));
            let waker = futures::task::noop_waker();
            let mut cx = std::task::Context::from_waker(&waker);
            assert!(pending.as_mut().poll(&mut cx).is_pending());
            assert_eq!(controller.state(), SubmitState::Submitting);
        }

        assert_eq!(controller.state(), SubmitState::Idle);
        assert_eq!(calls.get(), 1);
    }
}
