//! # Presale engine
//!
//! Purchase, claim and withdrawal flows. Each flow validates everything it
//! can before touching state, updates internal ledgers next, and only then
//! calls out to token contracts. A failed call returns an [`Error`], which
//! makes the host discard every write made by the invocation.

use soroban_sdk::{token, Address, Env};

use crate::events;
use crate::phases;
use crate::pricing;
use crate::storage::{entitlement_of, load_config, load_state, save_state, set_entitlement};
use crate::whitelist;
use crate::Error;

/// Buy `token_amount` base units of the sale asset in the active phase.
///
/// Returns the payment charged, denominated in the chosen payment asset.
pub fn buy(env: &Env, buyer: &Address, token_amount: i128, use_native: bool) -> Result<i128, Error> {
    let config = load_config(env)?;
    let mut state = load_state(env)?;

    if env.ledger().timestamp() > config.end_time {
        return Err(Error::PresaleEnded);
    }
    // Only the opening phase is gated.
    if state.current_phase == 0 && !whitelist::is_whitelisted(env, buyer) {
        return Err(Error::NotWhitelisted);
    }
    if token_amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    if token_amount > state.total_tokens - state.total_sold {
        return Err(Error::InsufficientTokenSupply);
    }

    let index = state.current_phase;
    let phase = phases::get_phase(env, index)?;
    if token_amount < phase.min_purchase {
        return Err(Error::BelowMinimumPurchase);
    }
    if token_amount > phase.max_purchase {
        return Err(Error::AboveMaximumPurchase);
    }

    phases::record_sale(env, index, token_amount)?;

    let (payment_asset, payment) =
        pricing::quote(env, &config, token_amount, phase.unit_price, use_native)?;

    state.total_sold += token_amount;
    state.total_entitled += token_amount;
    save_state(env, &state);

    let entitlement = entitlement_of(env, buyer)
        .checked_add(token_amount)
        .ok_or(Error::ArithmeticOverflow)?;
    set_entitlement(env, buyer, entitlement);

    let payment_client = token::Client::new(env, &payment_asset);
    match payment_client.try_transfer(buyer, &env.current_contract_address(), &payment) {
        Ok(Ok(())) => {}
        _ => return Err(Error::PaymentTransferFailed),
    }

    events::emit_tokens_purchased(env, buyer, index, token_amount, &payment_asset, payment);
    Ok(payment)
}

/// Pay out the caller's whole entitlement. Returns the amount transferred.
pub fn claim(env: &Env, buyer: &Address) -> Result<i128, Error> {
    let config = load_config(env)?;
    let mut state = load_state(env)?;

    if !state.claiming_enabled {
        return Err(Error::ClaimingNotEnabled);
    }
    let amount = entitlement_of(env, buyer);
    if amount <= 0 {
        return Err(Error::NothingToClaim);
    }

    // Zero the ledger before the payout so a re-entrant claim sees nothing.
    set_entitlement(env, buyer, 0);
    state.total_entitled -= amount;
    save_state(env, &state);

    let sale_token = token::Client::new(env, &config.token);
    match sale_token.try_transfer(&env.current_contract_address(), buyer, &amount) {
        Ok(Ok(())) => {}
        _ => return Err(Error::PayoutTransferFailed),
    }

    events::emit_tokens_claimed(env, buyer, amount);
    Ok(amount)
}

/// Move `amount` of `asset` out of engine custody to `to`.
///
/// Sale-asset withdrawals never touch the amount owed to buyers.
pub fn withdraw(env: &Env, asset: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let config = load_config(env)?;
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let client = token::Client::new(env, asset);
    let contract = env.current_contract_address();
    if *asset == config.token {
        let reserved = load_state(env)?.total_entitled;
        if client.balance(&contract) - reserved < amount {
            return Err(Error::InsufficientTokenSupply);
        }
    }

    match client.try_transfer(&contract, to, &amount) {
        Ok(Ok(())) => {}
        _ => return Err(Error::PayoutTransferFailed),
    }

    events::emit_funds_withdrawn(env, asset, to, amount);
    Ok(())
}

/// Set the active phase pointer. Any valid index is accepted, including
/// moving backwards.
pub fn set_current_phase(env: &Env, index: u32) -> Result<(), Error> {
    phases::check_index(index)?;
    let mut state = load_state(env)?;
    let previous = state.current_phase;
    state.current_phase = index;
    save_state(env, &state);
    events::emit_phase_changed(env, previous, index);
    Ok(())
}

pub fn set_claiming(env: &Env, enabled: bool) -> Result<(), Error> {
    let mut state = load_state(env)?;
    state.claiming_enabled = enabled;
    save_state(env, &state);
    events::emit_claiming_toggled(env, enabled);
    Ok(())
}

/// Reconfigure one phase before the first sale and refresh `total_tokens`.
pub fn configure_phase(
    env: &Env,
    index: u32,
    min_purchase: i128,
    max_purchase: i128,
    tokens_available: i128,
    unit_price: i128,
) -> Result<(), Error> {
    let mut state = load_state(env)?;
    if state.total_sold > 0 {
        return Err(Error::SaleAlreadyStarted);
    }

    let phase = phases::configure_phase(
        env,
        index,
        min_purchase,
        max_purchase,
        tokens_available,
        unit_price,
    )?;
    state.total_tokens = phases::total_available(env)?;
    save_state(env, &state);

    events::emit_phase_configured(env, index, &phase);
    Ok(())
}

/// Sale-asset amount the engine must still be able to pay out.
pub fn total_entitled(env: &Env) -> Result<i128, Error> {
    Ok(load_state(env)?.total_entitled)
}
