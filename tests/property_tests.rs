//! Property-based tests for the GRN totals and line-item collection.
//!
//! These tests use proptest to verify the aggregate invariants across a
//! wide range of inputs, helping to catch edge cases that the unit tests
//! miss.

use proptest::prelude::*;
use rust_decimal::Decimal;

use assetdesk::models::grn_draft::{GrnDraft, LineItem};
use assetdesk::services::totals::compute_totals;

// Strategies for generating test data
fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000, 0i64..100)
        .prop_map(|(units, cents)| Decimal::new(units * 100 + cents, 2))
}

fn tax_strategy() -> impl Strategy<Value = Decimal> {
    // 0.00 ..= 100.00 in basis points of a percent
    (0i64..=10_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn line_item_strategy() -> impl Strategy<Value = LineItem> {
    (1i64..10_000, money_strategy(), tax_strategy()).prop_map(|(quantity, price, tax)| {
        let mut item = LineItem::new();
        item.quantity = Some(quantity);
        item.unit_price = Some(price);
        item.tax_percent = Some(tax);
        item
    })
}

fn items_strategy() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item_strategy(), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Property: the grand total is exactly the subtotal plus the tax.
    #[test]
    fn grand_total_is_subtotal_plus_tax(items in items_strategy()) {
        let totals = compute_totals(&items);
        prop_assert_eq!(totals.grand_total, totals.subtotal + totals.total_tax);
    }

    // Property: the subtotal is exactly the sum of quantity x unit price.
    #[test]
    fn subtotal_matches_line_values(items in items_strategy()) {
        let expected: Decimal = items
            .iter()
            .map(|item| {
                Decimal::from(item.quantity.unwrap_or(0))
                    * item.unit_price.unwrap_or(Decimal::ZERO)
            })
            .sum();
        prop_assert_eq!(compute_totals(&items).subtotal, expected);
    }

    // Property: summation does not depend on row order.
    #[test]
    fn totals_are_order_independent(items in items_strategy()) {
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(compute_totals(&items), compute_totals(&reversed));
    }

    // Property: appending a row and removing it again restores the prior
    // totals exactly.
    #[test]
    fn append_then_remove_restores_totals(
        items in prop::collection::vec(line_item_strategy(), 1..8),
        extra in line_item_strategy(),
    ) {
        let mut draft = GrnDraft::new();
        let seeded = draft.items()[0].id();
        draft.remove_item(seeded);
        for item in items {
            draft.append_item(item);
        }

        let before = compute_totals(draft.items());
        let id = draft.append_item(extra);
        draft.remove_item(id);
        prop_assert_eq!(compute_totals(draft.items()), before);
    }

    // Property: removal by identity never disturbs the other rows.
    #[test]
    fn removal_preserves_sibling_rows(
        items in prop::collection::vec(line_item_strategy(), 2..8),
        victim_index in 0usize..8,
    ) {
        let mut draft = GrnDraft::new();
        let seeded = draft.items()[0].id();
        draft.remove_item(seeded);
        for item in items {
            draft.append_item(item);
        }

        let victim_index = victim_index % draft.items().len();
        let victim = draft.items()[victim_index].id();
        let survivors: Vec<LineItem> = draft
            .items()
            .iter()
            .filter(|item| item.id() != victim)
            .cloned()
            .collect();

        draft.remove_item(victim);
        prop_assert_eq!(draft.items().to_vec(), survivors);
    }
}
