use chrono::{NaiveDate, TimeZone, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::grn::{Grn, GrnNumber, GrnStatus};

/// Filters applied by the listing view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrnListQuery {
    /// Case-insensitive match against GRN number, vendor and invoice number.
    pub search: Option<String>,
    pub status: Option<GrnStatus>,
}

/// Dashboard roll-up over the recorded GRNs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrnStats {
    pub total: usize,
    pub draft: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total_amount: Decimal,
}

/// In-memory store of accepted and seeded GRNs backing the listing view.
pub struct GrnListService {
    grns: DashMap<GrnNumber, Grn>,
    event_sender: Option<EventSender>,
}

impl GrnListService {
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self {
            grns: DashMap::new(),
            event_sender,
        }
    }

    /// Records an accepted GRN, replacing any previous record with the same
    /// number.
    pub fn record(&self, grn: Grn) {
        self.grns.insert(grn.number.clone(), grn);
    }

    pub fn get(&self, number: &GrnNumber) -> Option<Grn> {
        self.grns.get(number).map(|entry| entry.value().clone())
    }

    /// Lists GRNs matching the query, newest first.
    #[instrument(skip(self))]
    pub fn list(&self, query: &GrnListQuery) -> Vec<Grn> {
        let needle = query
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        let mut grns: Vec<Grn> = self
            .grns
            .iter()
            .filter(|entry| {
                let grn = entry.value();
                let matches_search = needle.as_deref().map_or(true, |needle| {
                    grn.number.as_str().to_lowercase().contains(needle)
                        || grn.vendor.to_lowercase().contains(needle)
                        || grn.invoice_number.to_lowercase().contains(needle)
                });
                let matches_status = query.status.map_or(true, |status| grn.status == status);
                matches_search && matches_status
            })
            .map(|entry| entry.value().clone())
            .collect();

        grns.sort_by(|a, b| {
            b.grn_date
                .cmp(&a.grn_date)
                .then_with(|| b.number.cmp(&a.number))
        });
        grns
    }

    /// Deletes a GRN from the listing.
    #[instrument(skip(self))]
    pub async fn delete(&self, number: &GrnNumber) -> Result<Grn, ServiceError> {
        let (_, grn) = self
            .grns
            .remove(number)
            .ok_or_else(|| ServiceError::NotFound(format!("GRN {} not found", number)))?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::GrnDeleted {
                    number: number.clone(),
                })
                .await;
        }

        info!(%number, "GRN deleted");
        Ok(grn)
    }

    pub fn stats(&self) -> GrnStats {
        let mut stats = GrnStats {
            total: 0,
            draft: 0,
            pending: 0,
            approved: 0,
            rejected: 0,
            total_amount: Decimal::ZERO,
        };

        for entry in self.grns.iter() {
            let grn = entry.value();
            stats.total += 1;
            match grn.status {
                GrnStatus::Draft => stats.draft += 1,
                GrnStatus::Pending => stats.pending += 1,
                GrnStatus::Approved => stats.approved += 1,
                GrnStatus::Rejected => stats.rejected += 1,
            }
            stats.total_amount += grn.total_amount;
        }
        stats
    }

    /// Seeds the rows shown before any real submission has happened.
    pub fn seed_demo_data(&self) {
        for grn in demo_grns() {
            self.record(grn);
        }
        info!(count = self.grns.len(), "Seeded demo GRNs");
    }
}

fn demo_grn(
    number: &str,
    date: (i32, u32, u32),
    vendor: &str,
    branch: &str,
    invoice: &str,
    status: GrnStatus,
    total_amount: Decimal,
    item_count: usize,
    created_by: &str,
    approved_by: Option<&str>,
) -> Grn {
    Grn {
        number: GrnNumber::new(number),
        grn_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid calendar date"),
        invoice_number: invoice.to_string(),
        vendor: vendor.to_string(),
        branch: branch.to_string(),
        status,
        total_amount,
        item_count,
        created_by: Some(created_by.to_string()),
        approved_by: approved_by.map(str::to_string),
        created_at: Utc.with_ymd_and_hms(date.0, date.1, date.2, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
    }
}

fn demo_grns() -> Vec<Grn> {
    vec![
        demo_grn(
            "GRN-202507-001",
            (2024, 7, 24),
            "Dell Technologies",
            "Head Office - New York",
            "INV-2024-001",
            GrnStatus::Approved,
            dec!(15750.00),
            5,
            "John Doe",
            Some("Sarah Smith"),
        ),
        demo_grn(
            "GRN-202507-002",
            (2024, 7, 23),
            "HP Enterprise",
            "Branch Office - Los Angeles",
            "INV-2024-002",
            GrnStatus::Pending,
            dec!(8450.00),
            3,
            "Mike Johnson",
            None,
        ),
        demo_grn(
            "GRN-202507-003",
            (2024, 7, 22),
            "Lenovo Solutions",
            "Regional Office - Chicago",
            "INV-2024-003",
            GrnStatus::Draft,
            dec!(12300.00),
            7,
            "Emily Davis",
            None,
        ),
        demo_grn(
            "GRN-202507-004",
            (2024, 7, 21),
            "Apple Inc.",
            "Head Office - New York",
            "INV-2024-004",
            GrnStatus::Approved,
            dec!(25600.00),
            4,
            "David Wilson",
            Some("Sarah Smith"),
        ),
        demo_grn(
            "GRN-202507-005",
            (2024, 7, 20),
            "Microsoft Corporation",
            "Branch Office - Miami",
            "INV-2024-005",
            GrnStatus::Rejected,
            dec!(5200.00),
            2,
            "Lisa Brown",
            Some("Mark Taylor"),
        ),
    ]
}
