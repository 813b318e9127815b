//! # Access control
//!
//! A single stored owner identity gates every administrative entry point.
//! There is no role hierarchy: the owner may hand the role to another
//! address with [`transfer_ownership`], which removes it from the caller.

use soroban_sdk::{Address, Env};

use crate::events;
use crate::storage;
use crate::Error;

pub fn init_owner(env: &Env, owner: &Address) {
    storage::set_owner(env, owner);
}

/// Authenticate `caller` and require it to be the stored owner.
///
/// Runs first in every owner-only operation.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let owner = storage::get_owner(env)?;
    if *caller != owner {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

pub fn transfer_ownership(env: &Env, caller: &Address, new_owner: &Address) -> Result<(), Error> {
    require_owner(env, caller)?;
    storage::set_owner(env, new_owner);
    events::emit_owner_changed(env, caller, new_owner);
    Ok(())
}
