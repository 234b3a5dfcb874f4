use std::sync::Arc;

use chrono::Duration;
use tracing_subscriber::EnvFilter;

use flowboard_core::domain::{CardDraft, CardStatus, FlowboardError, Priority};
use flowboard_core::impls::InMemoryBoardStore;
use flowboard_core::metrics::group_by_month;
use flowboard_core::ordering::{CapacityCheck, MoveOutcome};
use flowboard_core::ports::{Clock, SystemClock, UlidGenerator};
use flowboard_core::session::BoardSession;

/// Print one column of the board.
fn print_bucket(session: &BoardSession<InMemoryBoardStore>, status: CardStatus) {
    let buckets = session.buckets();
    println!("  {status:?}:");
    for card in buckets.bucket(status) {
        println!("    [{}] {}", card.position, card.title);
    }
}

#[tokio::main]
async fn main() -> Result<(), FlowboardError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // (A) An in-memory store wired to the system clock.
    let clock = SystemClock;
    let store = Arc::new(InMemoryBoardStore::new(
        Arc::new(clock),
        Arc::new(UlidGenerator::new(clock)),
    ));

    // (B) Seed a board: two-week deadline, WIP limit of 2.
    let deadline = clock.today() + Duration::days(14);
    let board_id = store.create_board("launch", Some(deadline), Some(2)).await;

    let mut card_ids = Vec::new();
    for (title, estimate) in [
        ("design the landing page", 6.0),
        ("wire up sign-up", 8.0),
        ("write release notes", 2.0),
    ] {
        card_ids.push(
            store
                .create_card(
                    board_id,
                    CardDraft::new(title, CardStatus::Todo).with_estimate(estimate),
                )
                .await?,
        );
    }
    store
        .create_card(
            board_id,
            CardDraft::new("fix the flaky login test", CardStatus::InProgress)
                .with_estimate(3.0)
                .with_priority(Priority::High),
        )
        .await?;
    store
        .create_card(
            board_id,
            CardDraft::new("set up CI", CardStatus::Done).with_estimate(4.0),
        )
        .await?;

    let mut session = BoardSession::load(store, board_id).await?;

    println!("board: {}", session.board().name);
    for status in CardStatus::ALL {
        print_bucket(&session, status);
    }

    // (C) Drag two cards into the in-progress column; the second one
    // trips the soft WIP limit but still lands.
    for card_id in &card_ids[..2] {
        let receipt = session
            .move_card(*card_id, CardStatus::InProgress, 0)
            .await?;
        match (&receipt.outcome, receipt.capacity) {
            (MoveOutcome::NoOp, _) => println!("move was a no-op"),
            (_, CapacityCheck::Blocked { limit, count }) => {
                println!("moved, but the column is full ({count} cards, limit {limit})");
            }
            _ => println!("moved"),
        }
    }

    println!("\nafter the moves:");
    for status in CardStatus::ALL {
        print_bucket(&session, status);
    }

    // (D) Derived metrics off the fresh snapshot.
    let now = clock.now();
    let metrics = session.metrics();
    println!(
        "\nmetrics: {}/{} done, avg cycle {:.1} days",
        metrics.done_count, metrics.total, metrics.avg_cycle_days
    );
    println!("deadline: {:?}", session.deadline_status(clock.today()));
    println!("delivery: {:?}", session.delivery_status(now));

    // (E) The full analytics payload, as a consumer would receive it.
    let report = session.analytics(now);
    let months = group_by_month(&report.velocity_data);
    println!(
        "velocity: {:.1} points/week across {} month(s) of data",
        report.average_velocity,
        months.len()
    );
    println!("{}", serde_json::to_string_pretty(&report).expect("report serializes"));

    Ok(())
}
