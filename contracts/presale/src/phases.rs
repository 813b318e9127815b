//! # Phase table
//!
//! Fixed-size table of [`PhaseConfig`] entries, one per sale phase. Prices,
//! purchase bounds and capacities are set before the sale starts; afterwards
//! only `tokens_sold` moves, and only through [`record_sale`].
//!
//! Default economics (whole tokens, USD per token):
//!
//! | Phase | Min | Max    | Available | Price |
//! |-------|-----|--------|-----------|-------|
//! | 0     | 3   | 2 500  | 1 500 000 | 0.40  |
//! | 1     | 3   | 5 000  |   875 000 | 0.44  |
//! | 2     | 2   | 7 500  |   875 000 | 0.46  |
//! | 3     | 2   | 7 500  |   875 000 | 0.48  |
//! | 4     | 1   | 10 000 |   875 000 | 0.50  |

use soroban_sdk::Env;

use crate::storage::{load_phase, save_phase};
use crate::types::{PhaseConfig, ONE_UNIT, PHASE_COUNT};
use crate::Error;

/// `(min, max, available)` in whole tokens and price scaled by `ONE_UNIT`.
const DEFAULT_PHASES: [(i128, i128, i128, i128); PHASE_COUNT as usize] = [
    (3, 2_500, 1_500_000, 4_000_000),
    (3, 5_000, 875_000, 4_400_000),
    (2, 7_500, 875_000, 4_600_000),
    (2, 7_500, 875_000, 4_800_000),
    (1, 10_000, 875_000, 5_000_000),
];

pub fn check_index(index: u32) -> Result<(), Error> {
    if index >= PHASE_COUNT {
        return Err(Error::InvalidPhaseIndex);
    }
    Ok(())
}

/// Write the default table and return the summed capacity.
pub fn install_defaults(env: &Env) -> i128 {
    let mut total = 0;
    for (index, (min, max, available, price)) in DEFAULT_PHASES.iter().enumerate() {
        let phase = PhaseConfig {
            min_purchase: min * ONE_UNIT,
            max_purchase: max * ONE_UNIT,
            tokens_available: available * ONE_UNIT,
            unit_price: *price,
            tokens_sold: 0,
        };
        total += phase.tokens_available;
        save_phase(env, index as u32, &phase);
    }
    total
}

/// Replace the economics of phase `index`. Resets its `tokens_sold`; the
/// caller guarantees nothing has been sold yet.
pub fn configure_phase(
    env: &Env,
    index: u32,
    min_purchase: i128,
    max_purchase: i128,
    tokens_available: i128,
    unit_price: i128,
) -> Result<PhaseConfig, Error> {
    check_index(index)?;
    if min_purchase <= 0
        || min_purchase > max_purchase
        || tokens_available <= 0
        || unit_price <= 0
    {
        return Err(Error::InvalidPhaseConfig);
    }

    let phase = PhaseConfig {
        min_purchase,
        max_purchase,
        tokens_available,
        unit_price,
        tokens_sold: 0,
    };
    save_phase(env, index, &phase);
    Ok(phase)
}

pub fn get_phase(env: &Env, index: u32) -> Result<PhaseConfig, Error> {
    check_index(index)?;
    load_phase(env, index)
}

/// Sum of `tokens_available` across the whole table.
pub fn total_available(env: &Env) -> Result<i128, Error> {
    let mut total: i128 = 0;
    for index in 0..PHASE_COUNT {
        total = total
            .checked_add(load_phase(env, index)?.tokens_available)
            .ok_or(Error::ArithmeticOverflow)?;
    }
    Ok(total)
}

/// Add `amount` to the phase's `tokens_sold`, refusing to pass its capacity.
///
/// Check and write happen inside one contract invocation, which the ledger
/// executes serially, so two purchases cannot both take the last units.
pub fn record_sale(env: &Env, index: u32, amount: i128) -> Result<PhaseConfig, Error> {
    let mut phase = get_phase(env, index)?;
    let sold = phase
        .tokens_sold
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    if sold > phase.tokens_available {
        return Err(Error::CapacityExceeded);
    }
    phase.tokens_sold = sold;
    save_phase(env, index, &phase);
    Ok(phase)
}
