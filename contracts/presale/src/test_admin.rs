extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    vec, Address, Env,
};

use crate::test_utils::{create_token, register_presale, setup, tokens, END_TIME};
use crate::{Error, PhaseConfig, ONE_UNIT};

#[test]
fn test_init_sets_configuration() {
    let sale = setup();
    let client = &sale.client;

    assert_eq!(client.owner(), sale.owner);
    assert_eq!(client.token(), sale.token.address);
    assert_eq!(client.native_asset(), sale.native.address);
    assert_eq!(client.stable_asset(), sale.stable.address);
    assert_eq!(client.price_feed(), sale.feed);
    assert_eq!(client.end_time(), END_TIME);
    assert_eq!(client.total_tokens(), tokens(5_000_000));
    assert_eq!(client.total_sold(), 0);
    assert_eq!(client.current_phase(), 0);
    assert!(!client.claiming_enabled());
}

#[test]
fn test_init_twice_fails() {
    let sale = setup();
    let result = sale.client.try_init(
        &sale.owner,
        &sale.token.address,
        &END_TIME,
        &sale.native.address,
        &sale.stable.address,
        &sale.feed,
    );
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_init_rejects_past_end_time() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 1_000);

    let admin = Address::generate(&env);
    let token = create_token(&env, &admin);
    let client = register_presale(&env);

    let result = client.try_init(
        &admin,
        &token.address,
        &1_000,
        &token.address,
        &token.address,
        &Address::generate(&env),
    );
    assert_eq!(result, Err(Ok(Error::InvalidEndTime)));
}

#[test]
fn test_queries_before_init_fail() {
    let env = Env::default();
    let client = register_presale(&env);

    assert_eq!(client.try_total_tokens(), Err(Ok(Error::NotInitialized)));
    assert_eq!(client.try_get_current_phase(), Err(Ok(Error::NotInitialized)));
    assert_eq!(client.try_owner(), Err(Ok(Error::NotInitialized)));
}

#[test]
fn test_default_phase_table() {
    let sale = setup();
    let client = &sale.client;

    assert_eq!(
        client.get_current_phase(),
        PhaseConfig {
            min_purchase: tokens(3),
            max_purchase: tokens(2_500),
            tokens_available: tokens(1_500_000),
            unit_price: 4_000_000,
            tokens_sold: 0,
        }
    );

    let expected = [
        (3, 5_000, 875_000, 4_400_000),
        (2, 7_500, 875_000, 4_600_000),
        (2, 7_500, 875_000, 4_800_000),
        (1, 10_000, 875_000, 5_000_000),
    ];
    for (offset, (min, max, available, price)) in expected.iter().enumerate() {
        let phase = client.phase(&(offset as u32 + 1));
        assert_eq!(phase.min_purchase, tokens(*min));
        assert_eq!(phase.max_purchase, tokens(*max));
        assert_eq!(phase.tokens_available, tokens(*available));
        assert_eq!(phase.unit_price, *price);
        assert_eq!(phase.tokens_sold, 0);
    }

    assert_eq!(client.try_phase(&5), Err(Ok(Error::InvalidPhaseIndex)));
}

#[test]
fn test_set_current_phase() {
    let sale = setup();
    let client = &sale.client;

    client.set_current_phase(&sale.owner, &1);
    assert_eq!(client.current_phase(), 1);
    assert_eq!(client.get_current_phase().unit_price, 4_400_000);

    client.set_current_phase(&sale.owner, &4);
    assert_eq!(client.current_phase(), 4);

    assert_eq!(
        client.try_set_current_phase(&sale.owner, &5),
        Err(Ok(Error::InvalidPhaseIndex))
    );
    assert_eq!(
        client.try_set_current_phase(&sale.owner, &u32::MAX),
        Err(Ok(Error::InvalidPhaseIndex))
    );
    assert_eq!(client.current_phase(), 4);
}

#[test]
fn test_set_current_phase_can_move_backwards() {
    let sale = setup();
    sale.client.set_current_phase(&sale.owner, &3);
    sale.client.set_current_phase(&sale.owner, &1);
    assert_eq!(sale.client.current_phase(), 1);
}

#[test]
fn test_set_current_phase_requires_owner() {
    let sale = setup();
    let stranger = Address::generate(&sale.env);
    assert_eq!(
        sale.client.try_set_current_phase(&stranger, &2),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(sale.client.current_phase(), 0);
}

#[test]
fn test_enable_claiming() {
    let sale = setup();
    sale.client.enable_claiming(&sale.owner, &true);
    assert!(sale.client.claiming_enabled());
    sale.client.enable_claiming(&sale.owner, &false);
    assert!(!sale.client.claiming_enabled());
}

#[test]
fn test_enable_claiming_requires_owner() {
    let sale = setup();
    let stranger = Address::generate(&sale.env);
    assert_eq!(
        sale.client.try_enable_claiming(&stranger, &true),
        Err(Ok(Error::Unauthorized))
    );
    assert!(!sale.client.claiming_enabled());
}

#[test]
fn test_whitelist_addresses() {
    let sale = setup();
    let env = &sale.env;
    let a = Address::generate(env);
    let b = Address::generate(env);
    let outsider = Address::generate(env);

    let added = sale
        .client
        .whitelist_addresses(&sale.owner, &vec![env, a.clone(), b.clone()]);
    assert_eq!(added, 2);
    assert!(sale.client.is_whitelisted(&a));
    assert!(sale.client.is_whitelisted(&b));
    assert!(!sale.client.is_whitelisted(&outsider));

    // Re-listing is a no-op, not an error.
    let added = sale
        .client
        .whitelist_addresses(&sale.owner, &vec![env, a.clone()]);
    assert_eq!(added, 0);
    assert!(sale.client.is_whitelisted(&a));
}

#[test]
fn test_whitelist_requires_owner() {
    let sale = setup();
    let env = &sale.env;
    let stranger = Address::generate(env);
    assert_eq!(
        sale.client
            .try_whitelist_addresses(&stranger, &vec![env, stranger.clone()]),
        Err(Ok(Error::Unauthorized))
    );
    assert!(!sale.client.is_whitelisted(&stranger));
}

#[test]
fn test_configure_phase_updates_total() {
    let sale = setup();
    let client = &sale.client;

    client.configure_phase(&sale.owner, &0, &tokens(3), &tokens(2_500), &tokens(1_000), &4_000_000);

    assert_eq!(client.phase(&0).tokens_available, tokens(1_000));
    assert_eq!(client.total_tokens(), tokens(3_500_000) + tokens(1_000));
}

#[test]
fn test_configure_phase_validation() {
    let sale = setup();
    let client = &sale.client;
    let owner = &sale.owner;

    assert_eq!(
        client.try_configure_phase(owner, &5, &tokens(1), &tokens(2), &tokens(10), &ONE_UNIT),
        Err(Ok(Error::InvalidPhaseIndex))
    );
    assert_eq!(
        client.try_configure_phase(owner, &1, &tokens(5), &tokens(2), &tokens(10), &ONE_UNIT),
        Err(Ok(Error::InvalidPhaseConfig))
    );
    assert_eq!(
        client.try_configure_phase(owner, &1, &tokens(1), &tokens(2), &0, &ONE_UNIT),
        Err(Ok(Error::InvalidPhaseConfig))
    );
    assert_eq!(
        client.try_configure_phase(owner, &1, &tokens(1), &tokens(2), &tokens(10), &0),
        Err(Ok(Error::InvalidPhaseConfig))
    );

    let stranger = Address::generate(&sale.env);
    assert_eq!(
        client.try_configure_phase(&stranger, &1, &tokens(1), &tokens(2), &tokens(10), &ONE_UNIT),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_configure_phase_locked_after_first_sale() {
    let sale = setup();
    let buyer = sale.whitelisted_buyer();
    sale.client.buy_tokens(&buyer, &tokens(10), &false);

    assert_eq!(
        sale.client
            .try_configure_phase(&sale.owner, &2, &tokens(1), &tokens(2), &tokens(10), &ONE_UNIT),
        Err(Ok(Error::SaleAlreadyStarted))
    );
}

#[test]
fn test_transfer_ownership() {
    let sale = setup();
    let client = &sale.client;
    let successor = Address::generate(&sale.env);

    client.transfer_ownership(&sale.owner, &successor);
    assert_eq!(client.owner(), successor);

    client.set_current_phase(&successor, &2);
    assert_eq!(
        client.try_set_current_phase(&sale.owner, &3),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        client.try_transfer_ownership(&sale.owner, &sale.owner),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_withdraw_proceeds() {
    let sale = setup();
    let buyer = sale.whitelisted_buyer();
    let treasury = Address::generate(&sale.env);

    let paid = sale.client.buy_tokens(&buyer, &tokens(1_000), &false);
    sale.client
        .withdraw(&sale.owner, &sale.stable.address, &treasury, &paid);

    assert_eq!(sale.stable.balance(&treasury), paid);
    assert_eq!(sale.stable.balance(&sale.client.address), 0);
}

#[test]
fn test_withdraw_keeps_entitlements_reserved() {
    let sale = setup();
    let buyer = sale.whitelisted_buyer();
    let treasury = Address::generate(&sale.env);
    sale.client.buy_tokens(&buyer, &tokens(1_000), &false);

    let surplus = sale.token.balance(&sale.client.address) - tokens(1_000);
    assert_eq!(
        sale.client
            .try_withdraw(&sale.owner, &sale.token.address, &treasury, &(surplus + 1)),
        Err(Ok(Error::InsufficientTokenSupply))
    );

    sale.client
        .withdraw(&sale.owner, &sale.token.address, &treasury, &surplus);
    assert_eq!(sale.token.balance(&sale.client.address), tokens(1_000));
}

#[test]
fn test_withdraw_requires_owner() {
    let sale = setup();
    let stranger = Address::generate(&sale.env);
    assert_eq!(
        sale.client
            .try_withdraw(&stranger, &sale.token.address, &stranger, &1),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        sale.client
            .try_withdraw(&sale.owner, &sale.token.address, &stranger, &0),
        Err(Ok(Error::InvalidAmount))
    );
}
