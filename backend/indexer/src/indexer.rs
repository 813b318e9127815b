//! Long-running background task that polls the Soroban RPC and writes
//! decoded presale events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    ledger: u32,
    cursor: Option<String>,
}

/// Run the polling loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting: contract: {}", state.config.contract_id);

    let (saved_ledger, saved_cursor) = db::load_cursor(&state.pool)
        .await
        .unwrap_or((0, None));
    let mut position = if saved_ledger > 0 {
        Position {
            ledger: saved_ledger as u32,
            cursor: saved_cursor,
        }
    } else {
        Position {
            ledger: state.config.start_ledger,
            cursor: None,
        }
    };

    info!("Resuming from ledger {}", position.ledger);

    loop {
        match poll_once(&state, &position).await {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Indexer stopping at ledger {}", position.ledger);
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Perform a single poll iteration and persist the resulting position.
async fn poll_once(state: &IndexerState, position: &Position) -> crate::errors::Result<Position> {
    let config = &state.config;
    let page = rpc::fetch_events(
        &state.client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(&state.pool, &decoded).await?;
        info!(
            "Polled {} raw events, {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = advance(position.ledger, page.cursor, page.latest_ledger);
    db::save_cursor(&state.pool, next.ledger as i64, next.cursor.as_deref()).await?;
    Ok(next)
}

/// Next position: keep paging with the returned cursor, and never move the
/// ledger backwards.
fn advance(start_ledger: u32, cursor: Option<String>, latest_ledger: Option<u64>) -> Position {
    let ledger = latest_ledger
        .map(|l| (l.min(u32::MAX as u64) as u32).max(start_ledger))
        .unwrap_or(start_ledger);
    Position { ledger, cursor }
}
