use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::grn::GrnTotals;
use crate::models::grn_draft::LineItem;

/// Derives subtotal, total tax and grand total from the current line items.
///
/// Pure and order-independent. A row that is mid-edit (missing quantity,
/// price or tax) contributes zero instead of blocking the computation.
/// Amounts accumulate at full precision; rounding happens only at display
/// time via [`GrnTotals::rounded`].
pub fn compute_totals(items: &[LineItem]) -> GrnTotals {
    let mut subtotal = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;

    for item in items {
        let quantity = item.quantity.map(Decimal::from).unwrap_or(Decimal::ZERO);
        let unit_price = item.unit_price.unwrap_or(Decimal::ZERO);
        let tax_percent = item.tax_percent.unwrap_or(Decimal::ZERO);

        let line_value = quantity * unit_price;
        subtotal += line_value;
        total_tax += line_value * tax_percent / dec!(100);
    }

    GrnTotals {
        subtotal,
        total_tax,
        grand_total: subtotal + total_tax,
    }
}
