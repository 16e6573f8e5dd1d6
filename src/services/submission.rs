use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use validator::Validate;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::grn::{GrnNumber, GrnTotals};
use crate::models::grn_draft::{GrnDraft, LineItem, LineItemField, LineItemId};
use crate::models::validation::ValidationErrorSet;
use crate::services::acceptance::GrnAcceptance;
use crate::services::navigation::{NavTarget, Navigator};
use crate::services::notifications::NotificationSink;
use crate::services::totals::compute_totals;

lazy_static! {
    static ref GRN_SUBMISSIONS: IntCounter =
        IntCounter::new("grn_submissions_total", "Total number of GRNs submitted")
            .expect("metric can be created");
    static ref GRN_SUBMISSION_FAILURES: IntCounter = IntCounter::new(
        "grn_submission_failures_total",
        "Total number of failed GRN submissions"
    )
    .expect("metric can be created");
}

/// Where the submission workflow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// What one call to [`SubmissionController::submit`] amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the error set is populated and nothing was sent.
    Invalid(ValidationErrorSet),
    /// A submission is already in flight; this call did nothing.
    AlreadyInFlight,
    /// The remote call accepted the draft.
    Accepted(GrnNumber),
    /// The remote call rejected the draft; it is retained for retry.
    Failed(String),
}

struct FormState {
    draft: GrnDraft,
    errors: ValidationErrorSet,
    state: SubmissionState,
}

/// Drives one GRN form through validation, the remote acceptance call,
/// notifications, and the post-success hop to the listing view.
///
/// All form state sits behind a mutex that is never held across an await:
/// `Submitting` is entered before the remote call starts, so a second
/// submit observes it and backs off instead of duplicating the call.
pub struct SubmissionController {
    form: Arc<Mutex<FormState>>,
    acceptance: Arc<dyn GrnAcceptance>,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    event_sender: Option<EventSender>,
    navigation_delay: Duration,
    nav_task: Mutex<Option<JoinHandle<()>>>,
}

impl SubmissionController {
    pub fn new(
        acceptance: Arc<dyn GrnAcceptance>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
        event_sender: Option<EventSender>,
        navigation_delay: Duration,
    ) -> Self {
        Self {
            form: Arc::new(Mutex::new(FormState {
                draft: GrnDraft::new(),
                errors: ValidationErrorSet::default(),
                state: SubmissionState::Idle,
            })),
            acceptance,
            notifier,
            navigator,
            event_sender,
            navigation_delay,
            nav_task: Mutex::new(None),
        }
    }

    fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> SubmissionState {
        self.form().state
    }

    /// Snapshot of the current draft.
    pub fn draft(&self) -> GrnDraft {
        self.form().draft.clone()
    }

    /// Errors from the most recent validation pass.
    pub fn errors(&self) -> ValidationErrorSet {
        self.form().errors.clone()
    }

    /// Totals derived from the current rows; recomputed on every call so
    /// they can never go stale.
    pub fn totals(&self) -> GrnTotals {
        compute_totals(self.form().draft.items())
    }

    pub fn set_grn_date(&self, date: Option<NaiveDate>) {
        self.form().draft.grn_date = date;
    }

    pub fn set_invoice_number(&self, value: impl Into<String>) {
        self.form().draft.invoice_number = value.into();
    }

    pub fn set_vendor(&self, value: impl Into<String>) {
        self.form().draft.vendor = value.into();
    }

    pub fn set_branch(&self, value: impl Into<String>) {
        self.form().draft.branch = value.into();
    }

    pub fn append_item(&self, item: LineItem) -> LineItemId {
        self.form().draft.append_item(item)
    }

    pub fn remove_item(&self, id: LineItemId) {
        self.form().draft.remove_item(id);
    }

    pub fn update_item(&self, id: LineItemId, field: LineItemField) {
        self.form().draft.update_item(id, field);
    }

    /// Runs the full submit workflow for the current draft.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> SubmitOutcome {
        let snapshot = {
            let mut form = self.form();
            if form.state == SubmissionState::Submitting {
                debug!("Submit ignored: a submission is already in flight");
                return SubmitOutcome::AlreadyInFlight;
            }

            form.state = SubmissionState::Validating;
            if let Err(validation) = form.draft.validate() {
                GRN_SUBMISSION_FAILURES.inc();
                form.errors = ValidationErrorSet::from(validation);
                form.state = SubmissionState::Idle;
                debug!(error_count = form.errors.len(), "Draft failed validation");
                return SubmitOutcome::Invalid(form.errors.clone());
            }

            form.errors = ValidationErrorSet::default();
            form.state = SubmissionState::Submitting;
            form.draft.clone()
        };

        let loading = self
            .notifier
            .notify_loading("Creating GRN...", "Please wait while we process your request")
            .await;

        match self.acceptance.submit_grn(&snapshot).await {
            Ok(number) => {
                self.notifier.dismiss(loading).await;
                self.complete_success(&snapshot, number.clone()).await;
                SubmitOutcome::Accepted(number)
            }
            Err(err) => {
                self.notifier.dismiss(loading).await;
                self.complete_failure(&err).await;
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    /// Clears the draft back to defaults. Rejected while a submission is in
    /// flight.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), ServiceError> {
        {
            let mut form = self.form();
            if form.state == SubmissionState::Submitting {
                return Err(ServiceError::InvalidOperation(
                    "Cannot reset the form while a submission is in flight".to_string(),
                ));
            }
            form.draft = GrnDraft::new();
            form.errors = ValidationErrorSet::default();
            form.state = SubmissionState::Idle;
        }

        self.notifier
            .notify_info("Form Reset", "All fields reset to default values.")
            .await;

        if let Some(sender) = &self.event_sender {
            sender.send_or_log(Event::GrnDraftReset).await;
        }

        Ok(())
    }

    /// Cancels the pending post-success hop to the listing view, if any.
    /// Called on teardown so the delayed action never fires against a
    /// discarded view.
    pub fn cancel_pending_navigation(&self) {
        let mut slot = self
            .nav_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    async fn complete_success(&self, snapshot: &GrnDraft, number: GrnNumber) {
        {
            let mut form = self.form();
            form.draft = GrnDraft::new();
            form.errors = ValidationErrorSet::default();
            form.state = SubmissionState::Succeeded;
        }

        GRN_SUBMISSIONS.inc();
        info!(%number, items = snapshot.items().len(), "GRN created successfully");

        self.notifier
            .notify_success(
                "GRN Created Successfully!",
                &format!("GRN #{} has been created.", number),
            )
            .await;

        if let Some(sender) = &self.event_sender {
            let totals = compute_totals(snapshot.items());
            sender
                .send_or_log(Event::GrnSubmitted {
                    number,
                    grand_total: totals.grand_total,
                })
                .await;
        }

        self.schedule_navigation();
    }

    async fn complete_failure(&self, err: &ServiceError) {
        // The draft is retained untouched so the user can simply retry.
        self.form().state = SubmissionState::Failed;

        GRN_SUBMISSION_FAILURES.inc();
        error!(%err, "GRN submission failed");

        self.notifier
            .notify_error(
                "Failed to Create GRN",
                "There was an error creating your GRN. Please try again.",
            )
            .await;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::GrnSubmissionFailed {
                    reason: err.to_string(),
                })
                .await;
        }

        self.form().state = SubmissionState::Idle;
    }

    /// Schedules the post-success hop to the listing view. The delay exists
    /// so the user sees the confirmation before the view changes; the task
    /// is aborted if the form is torn down first.
    fn schedule_navigation(&self) {
        let form = Arc::clone(&self.form);
        let navigator = Arc::clone(&self.navigator);
        let delay = self.navigation_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate_to(NavTarget::GrnList).await;
            let mut form = form.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if form.state == SubmissionState::Succeeded {
                form.state = SubmissionState::Idle;
            }
        });

        let mut slot = self
            .nav_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        self.cancel_pending_navigation();
    }
}
