extern crate std;

use crate::invariants::assert_all_sale_invariants;
use crate::test_utils::{setup, setup_unfunded, tokens};
use crate::Error;

#[test]
fn test_claim_flow() {
    let sale = setup();
    let buyer = sale.whitelisted_buyer();

    let paid = sale.client.buy_tokens(&buyer, &tokens(1_000), &false);
    assert_eq!(paid, tokens(400));
    assert_eq!(sale.client.balance(&buyer), tokens(1_000));

    assert_eq!(
        sale.client.try_claim(&buyer),
        Err(Ok(Error::ClaimingNotEnabled))
    );
    assert_eq!(sale.client.balance(&buyer), tokens(1_000));

    sale.client.enable_claiming(&sale.owner, &true);
    let claimed = sale.client.claim(&buyer);

    assert_eq!(claimed, tokens(1_000));
    assert_eq!(sale.token.balance(&buyer), tokens(1_000));
    assert_eq!(sale.client.balance(&buyer), 0);
    assert_eq!(sale.client.total_entitled(), 0);

    // The entitlement is gone; a second claim has nothing to pay.
    assert_eq!(sale.client.try_claim(&buyer), Err(Ok(Error::NothingToClaim)));
    assert_eq!(sale.token.balance(&buyer), tokens(1_000));
}

#[test]
fn test_claim_without_purchase() {
    let sale = setup();
    let buyer = sale.buyer();
    sale.client.enable_claiming(&sale.owner, &true);

    assert_eq!(sale.client.try_claim(&buyer), Err(Ok(Error::NothingToClaim)));
}

#[test]
fn test_claiming_can_be_disabled_again() {
    let sale = setup();
    let buyer = sale.whitelisted_buyer();
    sale.client.buy_tokens(&buyer, &tokens(100), &false);

    sale.client.enable_claiming(&sale.owner, &true);
    sale.client.enable_claiming(&sale.owner, &false);

    assert_eq!(
        sale.client.try_claim(&buyer),
        Err(Ok(Error::ClaimingNotEnabled))
    );
    assert_eq!(sale.client.balance(&buyer), tokens(100));
}

#[test]
fn test_claim_pays_whole_accumulated_balance() {
    let sale = setup();
    let buyer = sale.whitelisted_buyer();

    sale.client.buy_tokens(&buyer, &tokens(1_000), &false);
    sale.client.buy_tokens(&buyer, &tokens(250), &true);
    sale.client.set_current_phase(&sale.owner, &3);
    sale.client.buy_tokens(&buyer, &tokens(4_000), &false);

    sale.client.enable_claiming(&sale.owner, &true);
    assert_eq!(sale.client.claim(&buyer), tokens(5_250));
    assert_eq!(sale.token.balance(&buyer), tokens(5_250));
}

#[test]
fn test_buyers_claim_independently() {
    let sale = setup();
    let a = sale.whitelisted_buyer();
    let b = sale.whitelisted_buyer();

    sale.client.buy_tokens(&a, &tokens(300), &false);
    sale.client.buy_tokens(&b, &tokens(700), &false);
    sale.client.enable_claiming(&sale.owner, &true);

    sale.client.claim(&a);
    assert_eq!(sale.client.balance(&a), 0);
    assert_eq!(sale.client.balance(&b), tokens(700));
    assert_eq!(sale.client.total_entitled(), tokens(700));
    assert_all_sale_invariants(&sale.client, &[a.clone(), b.clone()]);

    // Buying again after a claim starts a new entitlement.
    sale.client.buy_tokens(&a, &tokens(50), &false);
    assert_eq!(sale.client.balance(&a), tokens(50));
    assert_all_sale_invariants(&sale.client, &[a, b]);
}

#[test]
fn test_failed_payout_keeps_entitlement() {
    let sale = setup_unfunded();
    let buyer = sale.whitelisted_buyer();
    sale.client.buy_tokens(&buyer, &tokens(100), &false);
    sale.client.enable_claiming(&sale.owner, &true);

    assert_eq!(
        sale.client.try_claim(&buyer),
        Err(Ok(Error::PayoutTransferFailed))
    );
    assert_eq!(sale.client.balance(&buyer), tokens(100));
    assert_eq!(sale.client.total_entitled(), tokens(100));
    assert_eq!(sale.token.balance(&buyer), 0);
}
