//! # Pricing
//!
//! Converts a token amount into the payment owed in either accepted asset.
//!
//! - Stable asset: `amount * unit_price / ONE_UNIT`.
//! - Native asset: `amount * unit_price / native_price`, where `native_price`
//!   is the oracle's USD quote normalised to the [`ONE_UNIT`] scale.
//!
//! All divisions truncate toward zero, which is floor for the non-negative
//! operands used here.

use soroban_sdk::{contractclient, Address, Env};

use crate::types::{SaleConfig, ONE_UNIT, TOKEN_DECIMALS};
use crate::Error;

/// Interface of the external USD price feed for the native asset.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// Latest USD price of one whole native token.
    fn latest_price(env: Env) -> i128;
    /// Decimals of the value returned by `latest_price`.
    fn decimals(env: Env) -> u32;
}

/// Rescale `raw` from `decimals` to the `ONE_UNIT` scale.
pub fn normalize_price(raw: i128, decimals: u32) -> Result<i128, Error> {
    let price = if decimals >= TOKEN_DECIMALS {
        let divisor = 10i128
            .checked_pow(decimals - TOKEN_DECIMALS)
            .ok_or(Error::InvalidOraclePrice)?;
        raw / divisor
    } else {
        let factor = 10i128
            .checked_pow(TOKEN_DECIMALS - decimals)
            .ok_or(Error::ArithmeticOverflow)?;
        raw.checked_mul(factor).ok_or(Error::ArithmeticOverflow)?
    };
    if price <= 0 {
        return Err(Error::InvalidOraclePrice);
    }
    Ok(price)
}

/// Query the feed and return the normalised native price.
pub fn native_price(env: &Env, config: &SaleConfig) -> Result<i128, Error> {
    let feed = PriceFeedClient::new(env, &config.price_feed);
    let raw = match feed.try_latest_price() {
        Ok(Ok(price)) => price,
        _ => return Err(Error::OracleUnavailable),
    };
    let decimals = match feed.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(Error::OracleUnavailable),
    };
    normalize_price(raw, decimals)
}

fn scaled_cost(amount: i128, unit_price: i128, divisor: i128) -> Result<i128, Error> {
    let cost = amount
        .checked_mul(unit_price)
        .ok_or(Error::ArithmeticOverflow)?
        / divisor;
    if cost <= 0 {
        return Err(Error::InvalidAmount);
    }
    Ok(cost)
}

pub fn stable_payment(amount: i128, unit_price: i128) -> Result<i128, Error> {
    scaled_cost(amount, unit_price, ONE_UNIT)
}

pub fn native_payment(amount: i128, unit_price: i128, native_price: i128) -> Result<i128, Error> {
    if native_price <= 0 {
        return Err(Error::InvalidOraclePrice);
    }
    scaled_cost(amount, unit_price, native_price)
}

/// Payment owed for `amount` tokens at `unit_price` and the asset it is owed in.
pub fn quote(
    env: &Env,
    config: &SaleConfig,
    amount: i128,
    unit_price: i128,
    use_native: bool,
) -> Result<(Address, i128), Error> {
    if use_native {
        let price = native_price(env, config)?;
        Ok((config.native_asset.clone(), native_payment(amount, unit_price, price)?))
    } else {
        Ok((config.stable_asset.clone(), stable_payment(amount, unit_price)?))
    }
}
