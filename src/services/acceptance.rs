use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::models::grn::{Grn, GrnNumber};
use crate::models::grn_draft::GrnDraft;
use crate::services::grns::GrnListService;
use crate::services::totals::compute_totals;

/// Remote GRN acceptance boundary.
///
/// One call per submission attempt; retries are a user-initiated resubmit.
#[async_trait]
pub trait GrnAcceptance: Send + Sync {
    async fn submit_grn(&self, draft: &GrnDraft) -> Result<GrnNumber, ServiceError>;
}

/// Decides whether a simulated acceptance call fails.
///
/// Kept apart from the acceptance service so tests can script outcomes
/// deterministically instead of depending on a probability.
pub trait FaultSource: Send + Sync {
    fn should_fail(&self) -> bool;
}

/// Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultSource for NoFaults {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Fails a configurable fraction of calls.
#[derive(Debug, Clone)]
pub struct RandomFaults {
    probability: f64,
}

impl RandomFaults {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl FaultSource for RandomFaults {
    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}

/// Stand-in for the real acceptance backend: waits out a configured
/// latency, consults the fault source, and on success assigns the next GRN
/// number and records the accepted note in the listing store.
pub struct SimulatedAcceptance {
    grns: Arc<GrnListService>,
    faults: Arc<dyn FaultSource>,
    latency: Duration,
    sequence: AtomicU32,
}

impl SimulatedAcceptance {
    pub fn new(grns: Arc<GrnListService>, faults: Arc<dyn FaultSource>, latency: Duration) -> Self {
        Self {
            grns,
            faults,
            latency,
            sequence: AtomicU32::new(0),
        }
    }

    fn next_number(&self) -> GrnNumber {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        GrnNumber::new(format!("GRN-{}-{:03}", Utc::now().format("%Y%m"), seq))
    }
}

#[async_trait]
impl GrnAcceptance for SimulatedAcceptance {
    #[instrument(skip(self, draft), fields(vendor = %draft.vendor))]
    async fn submit_grn(&self, draft: &GrnDraft) -> Result<GrnNumber, ServiceError> {
        tokio::time::sleep(self.latency).await;

        if self.faults.should_fail() {
            warn!("Simulated acceptance fault");
            return Err(ServiceError::ExternalServiceError(
                "GRN acceptance call failed".to_string(),
            ));
        }

        let number = self.next_number();
        let totals = compute_totals(draft.items());
        self.grns.record(Grn::accepted(
            draft,
            number.clone(),
            totals.grand_total.round_dp(2),
        ));
        info!(%number, "GRN accepted");
        Ok(number)
    }
}
