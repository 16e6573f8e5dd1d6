use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::grn_draft::GrnDraft;

/// Domain-formatted GRN identifier, e.g. `GRN-202507-001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrnNumber(String);

impl GrnNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrnNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enum representing the possible statuses of a recorded GRN.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum GrnStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

/// Aggregate amounts derived from a draft's line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrnTotals {
    pub subtotal: Decimal,
    pub total_tax: Decimal,
    pub grand_total: Decimal,
}

impl GrnTotals {
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        grand_total: Decimal::ZERO,
    };

    /// Rounds every amount to two decimal places for display. Accumulation
    /// happens at full precision; this is the only rounding point.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: self.subtotal.round_dp(2),
            total_tax: self.total_tax.round_dp(2),
            grand_total: self.grand_total.round_dp(2),
        }
    }
}

/// An accepted goods receipt note as shown in the listing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grn {
    pub number: GrnNumber,
    pub grn_date: NaiveDate,
    pub invoice_number: String,
    pub vendor: String,
    pub branch: String,
    pub status: GrnStatus,
    pub total_amount: Decimal,
    pub item_count: usize,
    pub created_by: Option<String>,
    pub approved_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Grn {
    /// Builds the listing record for a draft that passed remote acceptance.
    pub fn accepted(draft: &GrnDraft, number: GrnNumber, total_amount: Decimal) -> Self {
        Self {
            number,
            grn_date: draft.grn_date.unwrap_or_else(|| Utc::now().date_naive()),
            invoice_number: draft.invoice_number.clone(),
            vendor: draft.vendor.clone(),
            branch: draft.branch.clone(),
            status: GrnStatus::Pending,
            total_amount,
            item_count: draft.items().len(),
            created_by: None,
            approved_by: None,
            created_at: Utc::now(),
        }
    }
}
