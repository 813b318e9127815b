//! Soroban RPC client: polls `getEvents` and decodes presale events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns a soft error or a
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//!
//! ## Encodings
//!
//! Events are requested with `xdrFormat: "json"`, so topics and data arrive
//! as `topicJson`/`valueJson`. RPC builds that ignore the flag send base64
//! `ScVal` XDR in `topic`/`value` instead; both are flattened by [`xdr`].

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, PresaleEvent};
use crate::xdr;

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Unique event id assigned by the RPC (`<toid>-<index>`).
    pub id: Option<String>,
    /// Topic list as base64 XDR (or a JSON wrapper per entry).
    #[serde(default)]
    pub topic: Vec<String>,
    /// Event data as base64 XDR, or already-decoded JSON.
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "topicJson")]
    pub topic_json: Option<Vec<Value>>,
    #[serde(rename = "valueJson")]
    pub value_json: Option<Value>,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
}

/// One page of `getEvents` output.
#[derive(Debug, Default)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events for `contract_id`.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`      : optional opaque pagination cursor from a previous response.
/// * `limit`       : maximum number of events to return.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let mut backoff = Backoff::new();
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("RPC request failed (will retry in {}s): {e}", backoff.secs);
                backoff.wait().await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate-limited by RPC (will retry in {}s)", backoff.secs);
            backoff.wait().await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;

        if let Some(err) = body.error {
            // Invalid request / unknown method will never succeed on retry.
            if err.code == -32600 || err.code == -32601 {
                return Err(IndexerError::Rpc(format!(
                    "hard error {}: {}",
                    err.code, err.message
                )));
            }
            warn!(
                "RPC soft error (will retry in {}s): {} {}",
                backoff.secs, err.code, err.message
            );
            backoff.wait().await;
            continue;
        }

        let result = body
            .result
            .ok_or_else(|| IndexerError::Rpc("empty result from getEvents".to_string()))?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    match cursor {
        Some(cur) => params["pagination"]["cursor"] = json!(cur),
        None => params["startLedger"] = json!(start_ledger),
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`PresaleEvent`] rows.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<PresaleEvent> {
    raw.iter()
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<PresaleEvent> {
    let Some(event_id) = raw.id.clone() else {
        warn!("Skipping event without id (tx {:?})", raw.tx_hash);
        return None;
    };
    let topics = event_topics(raw);
    let kind = EventKind::from_topic(topics.first()?);
    let subject = topics.get(1).cloned();
    let value = &event_value(raw);

    let mut ev = PresaleEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        ledger: raw.ledger.unwrap_or(0) as i64,
        timestamp: raw
            .ledger_closed_at
            .as_deref()
            .and_then(parse_iso_to_unix)
            .unwrap_or(0),
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
        ..PresaleEvent::default()
    };

    match kind {
        EventKind::TokensPurchased => {
            ev.account = subject.or_else(|| field(value, "buyer"));
            ev.phase = field(value, "phase").and_then(|p| p.parse().ok());
            ev.amount = field(value, "amount");
            ev.payment = field(value, "payment");
            ev.asset = field(value, "payment_asset");
        }
        EventKind::TokensClaimed => {
            ev.account = subject.or_else(|| field(value, "buyer"));
            ev.amount = field(value, "amount");
        }
        EventKind::PhaseChanged => {
            ev.phase = subject
                .or_else(|| field(value, "current"))
                .and_then(|p| p.parse().ok());
            ev.detail = field(value, "previous").map(|p| format!("previous={p}"));
        }
        EventKind::PhaseConfigured => {
            ev.phase = subject.and_then(|p| p.parse().ok());
            ev.amount = field(value, "tokens_available");
            ev.payment = field(value, "unit_price");
        }
        EventKind::ClaimingToggled => {
            ev.detail = scalar(value);
        }
        EventKind::Whitelisted => {
            ev.account = subject;
            ev.detail = scalar(value);
        }
        EventKind::FundsWithdrawn => {
            ev.asset = subject.or_else(|| field(value, "asset"));
            ev.account = field(value, "to");
            ev.amount = field(value, "amount");
        }
        EventKind::OwnerChanged => {
            ev.account = subject;
            ev.detail = scalar(value);
        }
        EventKind::Unknown => {}
    }

    Some(ev)
}

/// Render a JSON scalar (or a `{"type":…,"value":…}` wrapper) as text.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar),
        _ => None,
    }
}

/// Look up `key` in a struct payload, searching nested objects.
fn field(value: &Value, key: &str) -> Option<String> {
    if let Value::Object(map) = value {
        if let Some(found) = map.get(key).and_then(scalar) {
            return Some(found);
        }
        for nested in map.values() {
            if let Some(found) = field(nested, key) {
                return Some(found);
            }
        }
    }
    None
}

/// Topics as text, preferring the JSON rendering when the RPC sent one.
fn event_topics(raw: &RawEvent) -> Vec<String> {
    match &raw.topic_json {
        Some(topics) => topics
            .iter()
            .map(|t| scalar(&xdr::normalize_json(t)).unwrap_or_default())
            .collect(),
        None => raw.topic.iter().map(|t| topic_text(t)).collect(),
    }
}

/// Event data as a flattened JSON value.
fn event_value(raw: &RawEvent) -> Value {
    if let Some(value) = &raw.value_json {
        return xdr::normalize_json(value);
    }
    match &raw.value {
        Value::String(b64) => xdr::decode_base64(b64).unwrap_or_else(|| raw.value.clone()),
        other => xdr::normalize_json(other),
    }
}

/// Text of a topic entry: JSON wrapper, base64 XDR, or the raw string.
fn topic_text(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = scalar(&xdr::normalize_json(&v)) {
            return s;
        }
    }
    if let Some(s) = xdr::decode_base64(raw).as_ref().and_then(scalar) {
        return s;
    }
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
