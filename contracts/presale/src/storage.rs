//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the presale:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key          | Type          | Description                         |
//! |--------------|---------------|-------------------------------------|
//! | `Owner`      | `Address`     | Single privileged account           |
//! | `Config`     | `SaleConfig`  | Immutable assets, oracle, deadline  |
//! | `State`      | `SaleState`   | Phase pointer, claim flag, totals   |
//! | `Phase(i)`   | `PhaseConfig` | Phase table entry `i` (0..=4)       |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type   | Description                        |
//! |----------------------|--------|------------------------------------|
//! | `Whitelisted(addr)`  | `bool` | Phase-0 purchase permission        |
//! | `Entitlement(addr)`  | `i128` | Purchased but unclaimed tokens     |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//! A zero entitlement is stored as an absent key.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{PhaseConfig, SaleConfig, SaleState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Owner identity (Instance).
    Owner,
    /// Immutable sale configuration (Instance).
    Config,
    /// Mutable sale state (Instance).
    State,
    /// Phase table entry keyed by index (Instance).
    Phase(u32),
    /// Whitelist flag keyed by buyer (Persistent).
    Whitelisted(Address),
    /// Unclaimed entitlement keyed by buyer (Persistent).
    Entitlement(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn get_owner(env: &Env) -> Result<Address, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

pub fn save_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<SaleConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn save_state(env: &Env, state: &SaleState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn load_state(env: &Env) -> Result<SaleState, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

/// Store a phase table entry. The caller validates `index`.
pub fn save_phase(env: &Env, index: u32, phase: &PhaseConfig) {
    env.storage().instance().set(&DataKey::Phase(index), phase);
    bump_instance(env);
}

pub fn load_phase(env: &Env, index: u32) -> Result<PhaseConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Phase(index))
        .ok_or(Error::NotInitialized)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn is_whitelisted(env: &Env, address: &Address) -> bool {
    let key = DataKey::Whitelisted(address.clone());
    match env.storage().persistent().get::<_, bool>(&key) {
        Some(flag) => {
            bump_persistent(env, &key);
            flag
        }
        None => false,
    }
}

pub fn set_whitelisted(env: &Env, address: &Address) {
    let key = DataKey::Whitelisted(address.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
}

/// Unclaimed entitlement of `buyer`; zero when no entry exists.
pub fn entitlement_of(env: &Env, buyer: &Address) -> i128 {
    let key = DataKey::Entitlement(buyer.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Overwrite the entitlement of `buyer`. Zero removes the entry.
pub fn set_entitlement(env: &Env, buyer: &Address, amount: i128) {
    let key = DataKey::Entitlement(buyer.clone());
    if amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &amount);
        bump_persistent(env, &key);
    }
}
