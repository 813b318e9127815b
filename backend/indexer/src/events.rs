//! Canonical event types emitted by the presale contract.
//!
//! These mirror the Soroban contract events defined in `contracts/presale/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the presale contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A buyer purchased tokens (`purchased` topic).
    TokensPurchased,
    /// A buyer withdrew their entitlement (`claimed` topic).
    TokensClaimed,
    /// The active phase pointer moved (`phase_set` topic).
    PhaseChanged,
    /// A phase's economics were replaced before the sale (`phase_cfg` topic).
    PhaseConfigured,
    /// Claiming was switched on or off (`claiming` topic).
    ClaimingToggled,
    /// An address was added to the whitelist (`whitelist` topic).
    Whitelisted,
    /// The owner moved funds out of the contract (`withdrawn` topic).
    FundsWithdrawn,
    /// Ownership changed hands (`owner_set` topic).
    OwnerChanged,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "purchased" => Self::TokensPurchased,
            "claimed" => Self::TokensClaimed,
            "phase_set" => Self::PhaseChanged,
            "phase_cfg" => Self::PhaseConfigured,
            "claiming" => Self::ClaimingToggled,
            "whitelist" => Self::Whitelisted,
            "withdrawn" => Self::FundsWithdrawn,
            "owner_set" => Self::OwnerChanged,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokensPurchased => "tokens_purchased",
            Self::TokensClaimed => "tokens_claimed",
            Self::PhaseChanged => "phase_changed",
            Self::PhaseConfigured => "phase_configured",
            Self::ClaimingToggled => "claiming_toggled",
            Self::Whitelisted => "whitelisted",
            Self::FundsWithdrawn => "funds_withdrawn",
            Self::OwnerChanged => "owner_changed",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded presale event, ready to be stored in the database.
///
/// Amounts are kept as decimal strings because contract amounts are `i128`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresaleEvent {
    /// RPC event id, unique per emitted event.
    pub event_id: String,
    pub event_type: String,
    /// Buyer, whitelisted address, withdrawal recipient or new owner.
    pub account: Option<String>,
    pub phase: Option<i64>,
    pub amount: Option<String>,
    pub payment: Option<String>,
    /// Payment asset of a purchase or the asset of a withdrawal.
    pub asset: Option<String>,
    /// Anything else worth keeping: claim flag, whitelisting caller, previous owner.
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub account: Option<String>,
    pub phase: Option<i64>,
    pub amount: Option<String>,
    pub payment: Option<String>,
    pub asset: Option<String>,
    pub detail: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Per-buyer totals derived from indexed purchase and claim events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuyerSummary {
    pub buyer: String,
    pub purchases: usize,
    pub purchased: String,
    pub claimed: String,
    pub outstanding: String,
}

impl BuyerSummary {
    /// Fold a buyer's events into totals. Unparseable amounts count as zero.
    pub fn from_events(buyer: &str, events: &[EventRecord]) -> Self {
        let mut purchases = 0usize;
        let mut purchased: i128 = 0;
        let mut claimed: i128 = 0;

        for ev in events {
            let amount = ev
                .amount
                .as_deref()
                .and_then(|a| a.parse::<i128>().ok())
                .unwrap_or(0);
            match ev.event_type.as_str() {
                "tokens_purchased" => {
                    purchases += 1;
                    purchased += amount;
                }
                "tokens_claimed" => claimed += amount,
                _ => {}
            }
        }

        BuyerSummary {
            buyer: buyer.to_string(),
            purchases,
            purchased: purchased.to_string(),
            claimed: claimed.to_string(),
            outstanding: (purchased - claimed).to_string(),
        }
    }
}
