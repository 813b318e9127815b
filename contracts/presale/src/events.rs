//! # Events
//!
//! Every state change publishes one event. Topics are `(symbol, subject)`;
//! the data is either a `#[contracttype]` struct or a single value.
//!
//! | Topic       | Subject  | Data                |
//! |-------------|----------|---------------------|
//! | `purchased` | buyer    | [`TokensPurchased`] |
//! | `claimed`   | buyer    | [`TokensClaimed`]   |
//! | `phase_set` | phase    | [`PhaseChanged`]    |
//! | `phase_cfg` | phase    | [`PhaseConfigured`] |
//! | `claiming`  | none     | `bool`              |
//! | `whitelist` | address  | caller `Address`    |
//! | `withdrawn` | asset    | [`FundsWithdrawn`]  |
//! | `owner_set` | new owner| previous `Address`  |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::types::PhaseConfig;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensPurchased {
    pub buyer: Address,
    pub phase: u32,
    pub amount: i128,
    pub payment_asset: Address,
    pub payment: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokensClaimed {
    pub buyer: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseChanged {
    pub previous: u32,
    pub current: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseConfigured {
    pub phase: u32,
    pub min_purchase: i128,
    pub max_purchase: i128,
    pub tokens_available: i128,
    pub unit_price: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub asset: Address,
    pub to: Address,
    pub amount: i128,
}

pub fn emit_tokens_purchased(
    env: &Env,
    buyer: &Address,
    phase: u32,
    amount: i128,
    payment_asset: &Address,
    payment: i128,
) {
    let data = TokensPurchased {
        buyer: buyer.clone(),
        phase,
        amount,
        payment_asset: payment_asset.clone(),
        payment,
    };
    env.events()
        .publish((symbol_short!("purchased"), buyer.clone()), data);
}

pub fn emit_tokens_claimed(env: &Env, buyer: &Address, amount: i128) {
    let data = TokensClaimed {
        buyer: buyer.clone(),
        amount,
    };
    env.events()
        .publish((symbol_short!("claimed"), buyer.clone()), data);
}

pub fn emit_phase_changed(env: &Env, previous: u32, current: u32) {
    env.events().publish(
        (symbol_short!("phase_set"), current),
        PhaseChanged { previous, current },
    );
}

pub fn emit_phase_configured(env: &Env, phase: u32, config: &PhaseConfig) {
    let data = PhaseConfigured {
        phase,
        min_purchase: config.min_purchase,
        max_purchase: config.max_purchase,
        tokens_available: config.tokens_available,
        unit_price: config.unit_price,
    };
    env.events()
        .publish((symbol_short!("phase_cfg"), phase), data);
}

pub fn emit_claiming_toggled(env: &Env, enabled: bool) {
    env.events()
        .publish((symbol_short!("claiming"),), enabled);
}

pub fn emit_whitelisted(env: &Env, address: &Address, by: &Address) {
    env.events()
        .publish((symbol_short!("whitelist"), address.clone()), by.clone());
}

pub fn emit_funds_withdrawn(env: &Env, asset: &Address, to: &Address, amount: i128) {
    let data = FundsWithdrawn {
        asset: asset.clone(),
        to: to.clone(),
        amount,
    };
    env.events()
        .publish((symbol_short!("withdrawn"), asset.clone()), data);
}

pub fn emit_owner_changed(env: &Env, previous: &Address, new_owner: &Address) {
    env.events()
        .publish((symbol_short!("owner_set"), new_owner.clone()), previous.clone());
}
