//! # Types
//!
//! Shared data structures used across all modules of the presale contract.
//!
//! ## Fixed-point scales
//!
//! Every amount handled by the contract is an `i128` in base units with
//! [`TOKEN_DECIMALS`] decimals, the Stellar asset scale. The sale asset and
//! both payment assets share that scale, so one whole token is [`ONE_UNIT`].
//!
//! A phase's `unit_price` is the price of one whole sale token in quote units
//! (USD), also scaled by [`ONE_UNIT`]: `0.40` is stored as `4_000_000`.
//!
//! ## Config / State split
//!
//! The singleton sale record is stored as two instance entries:
//!
//! - [`SaleConfig`]: written once by `init`; never mutated.
//! - [`SaleState`]: written by purchases, claims and administrative setters.

use soroban_sdk::{contracttype, Address};

/// Decimals of every asset the presale touches.
pub const TOKEN_DECIMALS: u32 = 7;

/// One whole token (or one whole quote unit) in base units.
pub const ONE_UNIT: i128 = 10_000_000;

/// Number of sale phases. Valid phase indices are `0..PHASE_COUNT`.
pub const PHASE_COUNT: u32 = 5;

/// Economics of a single sale phase plus its running sales total.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseConfig {
    /// Smallest amount a single purchase may request (base units).
    pub min_purchase: i128,
    /// Largest amount a single purchase may request (base units).
    pub max_purchase: i128,
    /// Phase capacity (base units).
    pub tokens_available: i128,
    /// Quote-unit price of one whole token, scaled by [`ONE_UNIT`].
    pub unit_price: i128,
    /// Amount sold in this phase so far. Never exceeds `tokens_available`.
    pub tokens_sold: i128,
}

impl PhaseConfig {
    pub fn remaining(&self) -> i128 {
        self.tokens_available - self.tokens_sold
    }
}

/// Immutable sale configuration, written once at initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    /// The asset being sold; entitlements are paid out in it.
    pub token: Address,
    /// Native payment asset, priced through the oracle.
    pub native_asset: Address,
    /// USD-pegged payment asset, charged 1:1 against the quote unit.
    pub stable_asset: Address,
    /// Price feed reporting the USD price of the native asset.
    pub price_feed: Address,
    /// Ledger timestamp after which purchases are rejected.
    pub end_time: u64,
}

/// Mutable sale state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleState {
    /// Active phase pointer, always in `0..PHASE_COUNT`.
    pub current_phase: u32,
    /// Whether buyers may withdraw their entitlements.
    pub claiming_enabled: bool,
    /// Sum of `tokens_available` over all phases.
    pub total_tokens: i128,
    /// Sum of `tokens_sold` over all phases.
    pub total_sold: i128,
    /// Sum of all unclaimed entitlements.
    pub total_entitled: i128,
}
