//! AssetDesk GRN Library
//!
//! This crate provides the core functionality for the AssetDesk goods
//! receipt note workflow: the draft data model with its line-item
//! collection, schema-driven validation, derived totals, the submission
//! state machine, and the in-memory listing of accepted GRNs. Rendering,
//! routing and persistence live in the hosting shell; the core reaches
//! them through the [`services::notifications::NotificationSink`] and
//! [`services::navigation::Navigator`] seams.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::events::EventSender;
use crate::services::acceptance::{
    FaultSource, GrnAcceptance, NoFaults, RandomFaults, SimulatedAcceptance,
};
use crate::services::grns::GrnListService;
use crate::services::navigation::Navigator;
use crate::services::notifications::NotificationSink;
use crate::services::submission::SubmissionController;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub event_sender: EventSender,
    pub grns: Arc<GrnListService>,
}

impl AppState {
    pub fn new(config: AppConfig, event_sender: EventSender) -> Self {
        let grns = Arc::new(GrnListService::new(Some(event_sender.clone())));
        if config.seed_demo_data {
            grns.seed_demo_data();
        }
        Self {
            config,
            event_sender,
            grns,
        }
    }

    /// Builds the simulated acceptance backend from configuration.
    pub fn acceptance(&self) -> Arc<dyn GrnAcceptance> {
        let faults: Arc<dyn FaultSource> = if self.config.fault_probability > 0.0 {
            Arc::new(RandomFaults::new(self.config.fault_probability))
        } else {
            Arc::new(NoFaults)
        };
        Arc::new(SimulatedAcceptance::new(
            Arc::clone(&self.grns),
            faults,
            Duration::from_millis(self.config.submit_latency_ms),
        ))
    }

    /// Wires a submission controller for a freshly opened GRN form.
    pub fn grn_form(
        &self,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> SubmissionController {
        SubmissionController::new(
            self.acceptance(),
            notifier,
            navigator,
            Some(self.event_sender.clone()),
            Duration::from_millis(self.config.navigation_delay_ms),
        )
    }
}
