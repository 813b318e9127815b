//! # Phased Presale Contract
//!
//! Sells a fixed supply of a ledger token in five priced phases, accepting a
//! USD-pegged stable asset or the native asset (converted through a price
//! feed). Purchases only record an entitlement; buyers withdraw it once the
//! owner enables claiming.
//!
//! | Stage        | Entry Point(s)                                                      |
//! |--------------|---------------------------------------------------------------------|
//! | Bootstrap    | [`PhasedPresale::init`], `configure_phase`                          |
//! | Owner admin  | `set_current_phase`, `enable_claiming`, `whitelist_addresses`, `withdraw`, `transfer_ownership` |
//! | Sale         | [`PhasedPresale::buy_tokens`]                                       |
//! | Distribution | [`PhasedPresale::claim`]                                            |
//! | Queries      | `get_current_phase`, `phase`, `balance`, `is_whitelisted`, `quote`, ... |
//!
//! ## Architecture
//!
//! Authorization lives in [`access`], the phase table in [`phases`], the
//! whitelist in [`whitelist`], price conversion in [`pricing`] and the
//! purchase / claim flows in [`sale`]. Storage access is delegated to
//! [`storage`]. This file holds the public entry points only.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, Vec};

pub mod access;
pub mod events;
pub mod phases;
pub mod pricing;
mod sale;
mod storage;
mod types;
pub mod whitelist;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_admin;
#[cfg(test)]
mod test_claim;

pub use types::{PhaseConfig, SaleConfig, SaleState, ONE_UNIT, PHASE_COUNT, TOKEN_DECIMALS};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Authorization
    Unauthorized             = 1,
    // Configuration
    AlreadyInitialized       = 2,
    NotInitialized           = 3,
    InvalidPhaseIndex        = 4,
    InvalidPhaseConfig       = 5,
    InvalidEndTime           = 6,
    SaleAlreadyStarted       = 7,
    // Access gate
    NotWhitelisted           = 8,
    // Validation
    InvalidAmount            = 9,
    InsufficientTokenSupply  = 10,
    BelowMinimumPurchase     = 11,
    AboveMaximumPurchase     = 12,
    ArithmeticOverflow       = 13,
    // Capacity
    CapacityExceeded         = 14,
    // Payment
    PaymentTransferFailed    = 15,
    PayoutTransferFailed     = 16,
    OracleUnavailable        = 17,
    InvalidOraclePrice       = 18,
    // Claim state
    ClaimingNotEnabled       = 19,
    NothingToClaim           = 20,
    // Deadline
    PresaleEnded             = 21,
}

#[contract]
pub struct PhasedPresale;

#[contractimpl]
impl PhasedPresale {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the sale with the default phase table.
    ///
    /// Must be called exactly once after deployment; `owner` must sign.
    /// `end_time` is a ledger timestamp and must lie in the future.
    pub fn init(
        env: Env,
        owner: Address,
        token: Address,
        end_time: u64,
        native_asset: Address,
        stable_asset: Address,
        price_feed: Address,
    ) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        if end_time <= env.ledger().timestamp() {
            return Err(Error::InvalidEndTime);
        }

        access::init_owner(&env, &owner);
        storage::save_config(
            &env,
            &SaleConfig {
                token,
                native_asset,
                stable_asset,
                price_feed,
                end_time,
            },
        );
        let total_tokens = phases::install_defaults(&env);
        storage::save_state(
            &env,
            &SaleState {
                current_phase: 0,
                claiming_enabled: false,
                total_tokens,
                total_sold: 0,
                total_entitled: 0,
            },
        );
        Ok(())
    }

    /// Replace the economics of one phase. Only possible before the first sale.
    pub fn configure_phase(
        env: Env,
        caller: Address,
        index: u32,
        min_purchase: i128,
        max_purchase: i128,
        tokens_available: i128,
        unit_price: i128,
    ) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        sale::configure_phase(
            &env,
            index,
            min_purchase,
            max_purchase,
            tokens_available,
            unit_price,
        )
    }

    // ─────────────────────────────────────────────────────────
    // Owner administration
    // ─────────────────────────────────────────────────────────

    /// Point the sale at phase `index` (0..=4). Backward moves are allowed.
    pub fn set_current_phase(env: Env, caller: Address, index: u32) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        sale::set_current_phase(&env, index)
    }

    pub fn enable_claiming(env: Env, caller: Address, enabled: bool) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        sale::set_claiming(&env, enabled)
    }

    /// Grant phase-0 purchase permission. Listing an address twice is a no-op.
    /// Returns the number of newly listed addresses.
    pub fn whitelist_addresses(
        env: Env,
        caller: Address,
        addresses: Vec<Address>,
    ) -> Result<u32, Error> {
        access::require_owner(&env, &caller)?;
        Ok(whitelist::add(&env, &caller, &addresses))
    }

    /// Move collected proceeds (or unsold sale tokens) out of the contract.
    pub fn withdraw(
        env: Env,
        caller: Address,
        asset: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        access::require_owner(&env, &caller)?;
        sale::withdraw(&env, &asset, &to, amount)
    }

    pub fn transfer_ownership(env: Env, caller: Address, new_owner: Address) -> Result<(), Error> {
        access::transfer_ownership(&env, &caller, &new_owner)
    }

    // ─────────────────────────────────────────────────────────
    // Buyer entry points
    // ─────────────────────────────────────────────────────────

    /// Buy `token_amount` base units in the active phase, paying with the
    /// native asset when `use_native` is set and the stable asset otherwise.
    ///
    /// The payment is pulled from `buyer`, who must sign. Tokens are not
    /// delivered here; the amount is added to the buyer's entitlement.
    /// Returns the payment charged.
    ///
    /// Checks run in this order: deadline, phase 0 whitelist, amount, total
    /// supply, phase purchase bounds, phase capacity, oracle, payment.
    pub fn buy_tokens(
        env: Env,
        buyer: Address,
        token_amount: i128,
        use_native: bool,
    ) -> Result<i128, Error> {
        buyer.require_auth();
        sale::buy(&env, &buyer, token_amount, use_native)
    }

    /// Withdraw the caller's full entitlement. Returns the amount paid out.
    pub fn claim(env: Env, buyer: Address) -> Result<i128, Error> {
        buyer.require_auth();
        sale::claim(&env, &buyer)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn owner(env: Env) -> Result<Address, Error> {
        storage::get_owner(&env)
    }

    pub fn token(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.token)
    }

    pub fn native_asset(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.native_asset)
    }

    pub fn stable_asset(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.stable_asset)
    }

    pub fn price_feed(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.price_feed)
    }

    pub fn end_time(env: Env) -> Result<u64, Error> {
        Ok(storage::load_config(&env)?.end_time)
    }

    /// Sum of every phase's capacity.
    pub fn total_tokens(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.total_tokens)
    }

    pub fn total_sold(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.total_sold)
    }

    /// Sum of all unclaimed entitlements.
    pub fn total_entitled(env: Env) -> Result<i128, Error> {
        sale::total_entitled(&env)
    }

    pub fn current_phase(env: Env) -> Result<u32, Error> {
        Ok(storage::load_state(&env)?.current_phase)
    }

    /// Snapshot of the active phase.
    pub fn get_current_phase(env: Env) -> Result<PhaseConfig, Error> {
        let index = storage::load_state(&env)?.current_phase;
        phases::get_phase(&env, index)
    }

    pub fn phase(env: Env, index: u32) -> Result<PhaseConfig, Error> {
        phases::get_phase(&env, index)
    }

    pub fn is_whitelisted(env: Env, address: Address) -> bool {
        whitelist::is_whitelisted(&env, &address)
    }

    /// Unclaimed entitlement of `address`.
    pub fn balance(env: Env, address: Address) -> i128 {
        storage::entitlement_of(&env, &address)
    }

    pub fn claiming_enabled(env: Env) -> Result<bool, Error> {
        Ok(storage::load_state(&env)?.claiming_enabled)
    }

    /// USD price of one native token, scaled by [`ONE_UNIT`].
    pub fn native_price(env: Env) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        pricing::native_price(&env, &config)
    }

    /// Payment a purchase of `token_amount` would cost in the active phase.
    /// Purchase bounds are not checked.
    pub fn quote(env: Env, token_amount: i128, use_native: bool) -> Result<i128, Error> {
        let config = storage::load_config(&env)?;
        let index = storage::load_state(&env)?.current_phase;
        let phase = phases::get_phase(&env, index)?;
        let (_, payment) = pricing::quote(&env, &config, token_amount, phase.unit_price, use_native)?;
        Ok(payment)
    }
}
