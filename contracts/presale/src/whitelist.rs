//! # Whitelist
//!
//! Additive set of addresses allowed to buy while phase 0 is active.
//! Entries never expire and there is no removal.

use soroban_sdk::{Address, Env, Vec};

use crate::events;
use crate::storage;

/// Add every address in `addresses`. Already-listed addresses are skipped
/// without error. Returns how many entries were new.
pub fn add(env: &Env, by: &Address, addresses: &Vec<Address>) -> u32 {
    let mut added = 0;
    for address in addresses.iter() {
        if storage::is_whitelisted(env, &address) {
            continue;
        }
        storage::set_whitelisted(env, &address);
        events::emit_whitelisted(env, &address, by);
        added += 1;
    }
    added
}

pub fn is_whitelisted(env: &Env, address: &Address) -> bool {
    storage::is_whitelisted(env, address)
}
