//! Order Lifecycle
//!
//! Walks storefront orders through the order table with an executor and an
//! in-memory repository.
//!
//! Key concepts:
//! - Legal moves are applied and recorded in the status history
//! - Illegal moves are refused and logged at warn level
//! - Bulk updates report each order independently
//! - Repository contents survive a checkpoint round trip
//!
//! Run with: RUST_LOG=statusflow=debug cargo run --example order_lifecycle

use chrono::{Duration, Utc};
use statusflow::checkpoint::Checkpoint;
use statusflow::core::{ShipmentDetails, State};
use statusflow::effects::{BulkRequest, TransitionExecutor, TransitionRequest};
use statusflow::persistence::InMemoryRepository;
use statusflow::presets::{self, OrderStatus};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statusflow=info")),
        )
        .init();

    println!("=== Order Lifecycle ===\n");

    let executor = TransitionExecutor::new(presets::order());
    let repo = InMemoryRepository::new();

    // Happy path
    let order = executor.create(&repo)?;
    println!("Created order {} in {}", order.id(), order.status().name());

    let order = executor.execute(
        &repo,
        TransitionRequest::new(order.id(), OrderStatus::Confirmed)
            .actor("checkout")
            .reason("payment captured"),
    )?;
    let order = executor.execute(
        &repo,
        TransitionRequest::new(order.id(), OrderStatus::Processing).actor("warehouse"),
    )?;

    // Skipping shipment is refused
    match executor.execute(
        &repo,
        TransitionRequest::new(order.id(), OrderStatus::Delivered),
    ) {
        Ok(_) => println!("Unexpected: delivery accepted before shipment"),
        Err(err) => println!("Refused: {}", err),
    }

    let next: Vec<_> = executor
        .available_for(&repo, &order.id())?
        .iter()
        .map(|status| status.name().to_string())
        .collect();
    println!("Next statuses from {}: {}", order.status().name(), next.join(", "));

    // Bulk cancellation: pending and confirmed orders cancel, delivered ones cannot
    let mut ids = vec![order.id()];
    for _ in 0..2 {
        ids.push(executor.create(&repo)?.id());
    }
    let delivered = executor.create(&repo)?;
    let mut delivered_id = delivered.id();
    for target in [
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        let mut request = TransitionRequest::new(delivered_id, target.clone());
        if target == OrderStatus::Shipped {
            request = request.shipment(
                ShipmentDetails::new("1Z999AA10123456784")
                    .estimated_delivery(Utc::now() + Duration::days(2)),
            );
        }
        delivered_id = executor.execute(&repo, request)?.id();
    }
    ids.push(delivered_id);

    let outcome = executor.execute_bulk(
        &repo,
        ids,
        &BulkRequest::new(OrderStatus::Cancelled)
            .actor("ops-admin")
            .reason("warehouse closed"),
    );
    println!(
        "\nBulk cancel: {} of {} succeeded",
        outcome.succeeded.len(),
        outcome.total()
    );
    for (id, err) in &outcome.failed {
        println!("  {}: {}", id, err);
    }

    // History of the first order
    let cancelled = executor.execute(
        &repo,
        TransitionRequest::new(order.id(), OrderStatus::Refunded).notes("refund issued"),
    )?;
    println!("\nHistory for {}:", cancelled.id());
    for record in cancelled.status_history().transitions() {
        println!(
            "  {} -> {} at {} ({})",
            record.from.name(),
            record.to.name(),
            record.timestamp,
            record.reason.as_deref().unwrap_or("no reason")
        );
    }

    // Checkpoint and restore
    let bytes = repo.snapshot()?.to_binary()?;
    let restored: InMemoryRepository<OrderStatus> =
        InMemoryRepository::restore(Checkpoint::from_binary(&bytes)?)?;
    println!(
        "\nCheckpoint: {} bytes, {} orders restored",
        bytes.len(),
        restored.len()?
    );

    Ok(())
}
