//! Shared test doubles for the GRN workflow tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use assetdesk::errors::ServiceError;
use assetdesk::models::grn::GrnNumber;
use assetdesk::models::grn_draft::{GrnDraft, LineItem, LineItemField};
use assetdesk::services::acceptance::GrnAcceptance;
use assetdesk::services::navigation::{NavTarget, Navigator};
use assetdesk::services::notifications::{NotificationHandle, NotificationSink};
use assetdesk::services::submission::SubmissionController;

/// One notification as observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
    Info(String),
    Loading(String),
    Dismissed,
}

/// Sink that records every notification for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Notice) -> bool) -> usize {
        self.notices().iter().filter(|n| predicate(n)).count()
    }

    fn push(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify_success(&self, title: &str, _detail: &str) {
        self.push(Notice::Success(title.to_string()));
    }

    async fn notify_error(&self, title: &str, _detail: &str) {
        self.push(Notice::Error(title.to_string()));
    }

    async fn notify_info(&self, title: &str, _detail: &str) {
        self.push(Notice::Info(title.to_string()));
    }

    async fn notify_loading(&self, title: &str, _detail: &str) -> NotificationHandle {
        self.push(Notice::Loading(title.to_string()));
        NotificationHandle::new()
    }

    async fn dismiss(&self, _handle: NotificationHandle) {
        self.push(Notice::Dismissed);
    }
}

/// Navigator that counts calls per target.
#[derive(Default)]
pub struct CountingNavigator {
    calls: Mutex<Vec<NavTarget>>,
}

impl CountingNavigator {
    pub fn count(&self, target: NavTarget) -> usize {
        self.calls.lock().unwrap().iter().filter(|t| **t == target).count()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Navigator for CountingNavigator {
    async fn navigate_to(&self, target: NavTarget) {
        self.calls.lock().unwrap().push(target);
    }
}

/// Acceptance double that pops scripted outcomes, counts calls, and can
/// hold each call in flight for a configurable delay.
pub struct ScriptedAcceptance {
    outcomes: Mutex<VecDeque<Result<GrnNumber, String>>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedAcceptance {
    pub fn new(outcomes: Vec<Result<GrnNumber, String>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn accepting(number: &str) -> Self {
        Self::new(vec![Ok(GrnNumber::new(number))])
    }

    pub fn rejecting(reason: &str) -> Self {
        Self::new(vec![Err(reason.to_string())])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrnAcceptance for ScriptedAcceptance {
    async fn submit_grn(&self, _draft: &GrnDraft) -> Result<GrnNumber, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(GrnNumber::new("GRN-000000-000")))
            .map_err(ServiceError::ExternalServiceError)
    }
}

/// Wires a controller around the given acceptance double with a short
/// post-success navigation delay.
pub fn wired(
    acceptance: Arc<ScriptedAcceptance>,
    navigation_delay: Duration,
) -> (Arc<SubmissionController>, Arc<RecordingSink>, Arc<CountingNavigator>) {
    let sink = Arc::new(RecordingSink::default());
    let navigator = Arc::new(CountingNavigator::default());
    let controller = SubmissionController::new(
        acceptance,
        Arc::clone(&sink) as Arc<dyn NotificationSink>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        None,
        navigation_delay,
    );
    (Arc::new(controller), sink, navigator)
}

/// Fills the controller's draft so it passes validation: two rows worth
/// 250.00 + 20.00 tax.
pub fn fill_valid_draft(form: &SubmissionController) {
    form.set_invoice_number("INV-2024-001");
    form.set_vendor("Dell Technologies");
    form.set_branch("Head Office - New York");

    let first = form.draft().items()[0].id();
    form.update_item(first, LineItemField::SubCategory("Laptops".to_string()));
    form.update_item(first, LineItemField::ItemDescription("Latitude 7450".to_string()));
    form.update_item(first, LineItemField::Quantity(Some(2)));
    form.update_item(first, LineItemField::UnitPrice(Some(dec!(100))));
    form.update_item(first, LineItemField::TaxPercent(Some(dec!(10))));

    let second = form.append_item(LineItem::new());
    form.update_item(second, LineItemField::SubCategory("Accessories".to_string()));
    form.update_item(second, LineItemField::ItemDescription("USB-C docks".to_string()));
    form.update_item(second, LineItemField::Quantity(Some(1)));
    form.update_item(second, LineItemField::UnitPrice(Some(dec!(50))));
    form.update_item(second, LineItemField::TaxPercent(Some(dec!(0))));
}
