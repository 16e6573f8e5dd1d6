// Core models
pub mod grn;
pub mod grn_draft;
pub mod validation;

pub use grn::{Grn, GrnNumber, GrnStatus, GrnTotals};
pub use grn_draft::{GrnDraft, LineItem, LineItemField, LineItemId};
pub use validation::ValidationErrorSet;
