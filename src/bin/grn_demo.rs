//! End-to-end walkthrough of the GRN workflow against the simulated
//! acceptance backend: seed the listing, compose a draft, submit it, and
//! print the resulting listing and dashboard stats.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

use assetdesk::config;
use assetdesk::events;
use assetdesk::models::grn_draft::{LineItem, LineItemField};
use assetdesk::services::grns::GrnListQuery;
use assetdesk::services::navigation::TracingNavigator;
use assetdesk::services::notifications::TracingNotificationSink;
use assetdesk::services::submission::SubmitOutcome;
use assetdesk::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = config::load_config()?;
    config.seed_demo_data = true;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (event_sender, event_receiver) = events::channel(64);
    tokio::spawn(events::process_events(event_receiver));

    let state = AppState::new(config, event_sender);
    let form = state.grn_form(Arc::new(TracingNotificationSink), Arc::new(TracingNavigator));

    form.set_invoice_number("INV-2024-117");
    form.set_vendor("Dell Technologies");
    form.set_branch("Head Office - New York");

    let laptops = form.draft().items()[0].id();
    form.update_item(laptops, LineItemField::SubCategory("Laptops".to_string()));
    form.update_item(
        laptops,
        LineItemField::ItemDescription("Latitude 7450, 32 GB".to_string()),
    );
    form.update_item(laptops, LineItemField::Quantity(Some(2)));
    form.update_item(laptops, LineItemField::UnitPrice(Some(dec!(1450.00))));
    form.update_item(laptops, LineItemField::TaxPercent(Some(dec!(10))));

    let docks = form.append_item(LineItem::new());
    form.update_item(docks, LineItemField::SubCategory("Accessories".to_string()));
    form.update_item(docks, LineItemField::ItemDescription("USB-C docks".to_string()));
    form.update_item(docks, LineItemField::Quantity(Some(4)));
    form.update_item(docks, LineItemField::UnitPrice(Some(dec!(210.00))));
    form.update_item(docks, LineItemField::TaxPercent(Some(dec!(5))));

    let totals = form.totals().rounded();
    println!(
        "Draft totals: subtotal {}  tax {}  grand total {}",
        totals.subtotal, totals.total_tax, totals.grand_total
    );

    // The simulated backend fails a fraction of calls; the draft survives a
    // failure untouched, so retrying is just submitting again.
    let mut attempts = 0;
    loop {
        attempts += 1;
        match form.submit().await {
            SubmitOutcome::Accepted(number) => {
                println!("Accepted as {} (attempt {})", number, attempts);
                break;
            }
            SubmitOutcome::Failed(reason) if attempts < 3 => {
                println!("Attempt {} failed ({}), retrying...", attempts, reason);
            }
            SubmitOutcome::Failed(reason) => {
                println!("Giving up after {} attempts: {}", attempts, reason);
                break;
            }
            SubmitOutcome::Invalid(errors) => {
                for (path, message) in errors.iter() {
                    println!("  {}: {}", path, message);
                }
                break;
            }
            SubmitOutcome::AlreadyInFlight => {
                println!("Submit skipped: already in flight");
                break;
            }
        }
    }

    // Let the post-success pause elapse so the navigation side effect fires.
    tokio::time::sleep(Duration::from_millis(state.config.navigation_delay_ms + 200)).await;

    println!("\nGoods receipt notes:");
    for grn in state.grns.list(&GrnListQuery::default()) {
        println!(
            "  {}  {}  {:<24}  {:<9}  {:>10}",
            grn.number, grn.grn_date, grn.vendor, grn.status, grn.total_amount
        );
    }

    let stats = state.grns.stats();
    println!("\nDashboard: {}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
