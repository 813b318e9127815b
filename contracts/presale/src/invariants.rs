#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::{PhaseConfig, PhasedPresaleClient, PHASE_COUNT};

/// A phase never sells past its capacity.
pub fn assert_phase_within_capacity(index: u32, phase: &PhaseConfig) {
    assert!(
        phase.tokens_sold >= 0 && phase.tokens_sold <= phase.tokens_available,
        "phase {} sold {} of {}",
        index,
        phase.tokens_sold,
        phase.tokens_available
    );
}

/// Purchase bounds are ordered.
pub fn assert_phase_bounds_ordered(index: u32, phase: &PhaseConfig) {
    assert!(
        phase.min_purchase <= phase.max_purchase,
        "phase {} has min {} above max {}",
        index,
        phase.min_purchase,
        phase.max_purchase
    );
}

/// Outstanding entitlements are backed by recorded sales.
pub fn assert_entitlements_covered(total_entitled: i128, total_sold: i128) {
    assert!(
        total_entitled >= 0 && total_entitled <= total_sold,
        "entitled {} exceeds sold {}",
        total_entitled,
        total_sold
    );
}

/// An entitlement only grows between claims.
pub fn assert_entitlement_monotonic(before: i128, after: i128) {
    assert!(
        after >= before,
        "entitlement decreased from {} to {}",
        before,
        after
    );
}

/// Check every stateful invariant through the public client.
///
/// `buyers` is the set of addresses that have interacted with the sale;
/// their entitlements must add up to the contract-wide total.
pub fn assert_all_sale_invariants(client: &PhasedPresaleClient, buyers: &[Address]) {
    let mut sold = 0;
    let mut capacity = 0;
    for index in 0..PHASE_COUNT {
        let phase = client.phase(&index);
        assert_phase_within_capacity(index, &phase);
        assert_phase_bounds_ordered(index, &phase);
        sold += phase.tokens_sold;
        capacity += phase.tokens_available;
    }
    assert_eq!(sold, client.total_sold(), "phase totals disagree with total_sold");
    assert_eq!(capacity, client.total_tokens(), "phase capacity disagrees with total_tokens");

    let entitled: i128 = buyers.iter().map(|b| client.balance(b)).sum();
    assert_eq!(entitled, client.total_entitled(), "entitlements disagree with total_entitled");
    assert_entitlements_covered(entitled, sold);
}
