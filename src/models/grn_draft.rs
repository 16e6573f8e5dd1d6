use std::fmt;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Stable synthetic identity for one draft line item.
///
/// Rows are keyed by this identity rather than by array position, so
/// removing a row mid-list never shifts the identity of the rows after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItemId(Uuid);

impl LineItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One row of a GRN draft.
///
/// The numeric fields are optional so a row that is mid-edit (cleared
/// quantity, half-typed price) never blocks totals from rendering; the
/// validation schema enforces presence on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    id: LineItemId,

    #[validate(length(min = 1, message = "Sub category is required"))]
    pub sub_category: String,

    #[validate(length(min = 1, max = 100, message = "Item description is required (max 100 characters)"))]
    pub item_description: String,

    #[validate(required(message = "Quantity is required"), range(min = 1, message = "Quantity must be greater than zero"))]
    pub quantity: Option<i64>,

    #[validate(required(message = "Unit price is required"), custom = "validate_unit_price")]
    pub unit_price: Option<Decimal>,

    #[validate(required(message = "Tax percent is required"), custom = "validate_tax_percent")]
    pub tax_percent: Option<Decimal>,
}

impl LineItem {
    /// A freshly added form row: one unit at zero price and zero tax.
    pub fn new() -> Self {
        Self {
            id: LineItemId::new(),
            sub_category: String::new(),
            item_description: String::new(),
            quantity: Some(1),
            unit_price: Some(Decimal::ZERO),
            tax_percent: Some(Decimal::ZERO),
        }
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_unit_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Unit price cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

fn validate_tax_percent(tax: &Decimal) -> Result<(), ValidationError> {
    if tax.is_sign_negative() || *tax > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("Tax percent must be between 0 and 100".into());
        return Err(err);
    }
    Ok(())
}

/// Single-field update applied to one line item.
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemField {
    SubCategory(String),
    ItemDescription(String),
    Quantity(Option<i64>),
    UnitPrice(Option<Decimal>),
    TaxPercent(Option<Decimal>),
}

/// The in-progress, unsaved state of a GRN being composed by a user.
///
/// Created when the form mounts, mutated by edits, cleared on successful
/// submission or reset. Lives only in view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GrnDraft {
    #[validate(required(message = "GRN date is required"))]
    pub grn_date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 30, message = "Invoice number is required (max 30 characters)"))]
    pub invoice_number: String,

    #[validate(length(min = 1, message = "Vendor is required"))]
    pub vendor: String,

    #[validate(length(min = 1, message = "Branch is required"))]
    pub branch: String,

    #[validate]
    items: Vec<LineItem>,
}

impl GrnDraft {
    /// Fresh draft with today's date and a single default row.
    pub fn new() -> Self {
        Self::with_date(Utc::now().date_naive())
    }

    /// Fresh draft dated explicitly (tests pin the date).
    pub fn with_date(grn_date: NaiveDate) -> Self {
        Self {
            grn_date: Some(grn_date),
            invoice_number: String::new(),
            vendor: String::new(),
            branch: String::new(),
            items: vec![LineItem::new()],
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, id: LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Appends a row with the supplied field defaults. The collection
    /// assigns a fresh identity and returns it; the caller's identity, if
    /// any, is discarded.
    pub fn append_item(&mut self, mut item: LineItem) -> LineItemId {
        item.id = LineItemId::new();
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Removes the row with the given identity. Unknown identities are a
    /// no-op; the identities of the remaining rows are untouched.
    pub fn remove_item(&mut self, id: LineItemId) {
        self.items.retain(|item| item.id != id);
    }

    /// Replaces a single field on the row with the given identity, leaving
    /// every other row and field as-is. Unknown identities are a no-op.
    pub fn update_item(&mut self, id: LineItemId, field: LineItemField) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            match field {
                LineItemField::SubCategory(value) => item.sub_category = value,
                LineItemField::ItemDescription(value) => item.item_description = value,
                LineItemField::Quantity(value) => item.quantity = value,
                LineItemField::UnitPrice(value) => item.unit_price = value,
                LineItemField::TaxPercent(value) => item.tax_percent = value,
            }
        }
    }
}

impl Default for GrnDraft {
    fn default() -> Self {
        Self::new()
    }
}
