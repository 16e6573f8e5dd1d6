//! Listing store tests that exercise the seeded demo data end to end,
//! including the deletion event.

use std::sync::Arc;

use rust_decimal_macros::dec;

use assetdesk::events::{self, Event};
use assetdesk::models::grn::{GrnNumber, GrnStatus};
use assetdesk::services::grns::{GrnListQuery, GrnListService};

#[test]
fn seeded_listing_is_newest_first_and_filterable() {
    let grns = GrnListService::new(None);
    grns.seed_demo_data();

    let all = grns.list(&GrnListQuery::default());
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|pair| pair[0].grn_date >= pair[1].grn_date));

    let pending = grns.list(&GrnListQuery {
        search: None,
        status: Some(GrnStatus::Pending),
    });
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].vendor, "HP Enterprise");

    let lenovo = grns.list(&GrnListQuery {
        search: Some("LENOVO".to_string()),
        status: None,
    });
    assert_eq!(lenovo.len(), 1);
    assert_eq!(lenovo[0].number.as_str(), "GRN-202507-003");
}

#[tokio::test]
async fn delete_emits_an_event_and_shrinks_the_listing() {
    let (sender, mut rx) = events::channel(8);
    let grns = Arc::new(GrnListService::new(Some(sender)));
    grns.seed_demo_data();

    let number = GrnNumber::new("GRN-202507-004");
    let deleted = grns.delete(&number).await.expect("seeded row exists");
    assert_eq!(deleted.vendor, "Apple Inc.");
    assert_eq!(grns.list(&GrnListQuery::default()).len(), 4);

    match rx.recv().await {
        Some(Event::GrnDeleted { number: deleted }) => assert_eq!(deleted, number),
        other => panic!("expected GrnDeleted, got {:?}", other),
    }

    let stats = grns.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.total_amount, dec!(41700.00));
}
