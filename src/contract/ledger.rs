//! Ledger primitives
//!
//! `internal_withdraw` and `internal_deposit` move an account balance and
//! the total supply together, so every balance change keeps
//! `sum(balances) == total_supply`. A transfer is a withdraw followed by a
//! deposit of the same amount and leaves the supply unchanged.

use crate::contract::state::FtContract;
use crate::host::{Gas, Host, HostError, TGAS};
use crate::token::{AccountId, FtTransfer, TokenError, U128};
use serde::Serialize;

/// Gas attached to the `ft_on_transfer` notification
pub const GAS_FOR_FT_ON_TRANSFER: Gas = 35 * TGAS;

/// Method invoked on the receiver by `ft_transfer_call`
pub const FT_ON_TRANSFER_METHOD: &str = "ft_on_transfer";

#[derive(Serialize)]
struct FtOnTransferArgs<'a> {
    sender_id: &'a AccountId,
    amount: U128,
    msg: Option<&'a str>,
    receiver_id: &'a AccountId,
}

impl FtContract {
    /// Subtract `amount` from an account and from the total supply
    ///
    /// Both values are computed before either is written, so a failure
    /// leaves the ledger untouched.
    pub fn internal_withdraw<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        account_id: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let balance = self.get_balance(host, account_id)?;
        let new_balance =
            balance
                .checked_sub(amount)
                .ok_or_else(|| TokenError::InsufficientBalance {
                    account: account_id.clone(),
                    have: balance,
                    need: amount,
                })?;
        let new_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::SupplyUnderflow)?;

        self.set_balance(host, account_id, new_balance)?;
        self.total_supply = new_supply;
        Ok(())
    }

    /// Add `amount` to an account and to the total supply
    pub fn internal_deposit<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        account_id: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let balance = self.get_balance(host, account_id)?;
        let new_balance = balance
            .checked_add(amount)
            .ok_or_else(|| TokenError::BalanceOverflow(account_id.clone()))?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.set_balance(host, account_id, new_balance)?;
        self.total_supply = new_supply;
        Ok(())
    }

    /// Move tokens between two registered accounts
    ///
    /// Emits `ft_transfer`. Attached-deposit checks belong to the calling
    /// entry point.
    pub fn internal_transfer<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
        memo: Option<&str>,
    ) -> Result<(), TokenError> {
        if sender_id == receiver_id {
            return Err(TokenError::SameAccount);
        }
        if amount == 0 {
            return Err(TokenError::InvalidAmount);
        }
        // Receiver must exist before anything is debited.
        if !self.is_registered(host, receiver_id) {
            return Err(TokenError::NotRegistered(receiver_id.clone()));
        }

        self.internal_withdraw(host, sender_id, amount)?;
        self.internal_deposit(host, receiver_id, amount)?;

        log::info!(
            "Transferred {} tokens from {} to {}",
            amount,
            sender_id,
            receiver_id
        );
        FtTransfer {
            old_owner_id: sender_id,
            new_owner_id: receiver_id,
            amount: U128(amount),
            memo,
        }
        .emit(host);

        Ok(())
    }

    /// Transfer, then notify the receiver contract with `ft_on_transfer`
    ///
    /// The notification is fire-and-forget: its outcome is never awaited
    /// and a remote failure does not return the tokens.
    pub fn internal_transfer_call<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
        memo: Option<&str>,
        msg: Option<&str>,
    ) -> Result<(), TokenError> {
        self.internal_transfer(host, sender_id, receiver_id, amount, memo)?;

        let args = serde_json::to_vec(&FtOnTransferArgs {
            sender_id,
            amount: U128(amount),
            msg,
            receiver_id,
        })
        .map_err(|e| HostError::EncodeFailed {
            key: FT_ON_TRANSFER_METHOD.to_string(),
            reason: e.to_string(),
        })?;

        host.promise_function_call(
            receiver_id,
            FT_ON_TRANSFER_METHOD,
            args,
            0,
            GAS_FOR_FT_ON_TRANSFER,
        );
        log::debug!("Scheduled {} on {}", FT_ON_TRANSFER_METHOD, receiver_id);
        Ok(())
    }
}

/// Send native currency out of the contract account
///
/// A payout must leave a positive balance behind. Refunds no larger than
/// the attached deposit may empty the account, since that deposit was
/// credited to it for this call.
pub fn send_native<H: Host + ?Sized>(
    host: &mut H,
    receiver_id: &AccountId,
    amount: u128,
) -> Result<(), TokenError> {
    if amount == 0 {
        return Err(TokenError::InvalidAmount);
    }
    let available = host.account_balance();
    let from_deposit = amount <= host.attached_deposit();
    if available < amount || (available == amount && !from_deposit) {
        return Err(TokenError::InsufficientNativeBalance { available, amount });
    }

    host.promise_transfer(receiver_id, amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::testing::*;
    use crate::host::{ExecutionContext, MockHost, MockHostConfig, PromiseAction};

    #[test]
    fn test_withdraw_insufficient_leaves_state() {
        let (mut host, mut contract) = setup();
        let bob = fund(&mut host, &mut contract, "bob.near", 5);
        let supply = contract.total_supply;

        let result = contract.internal_withdraw(&mut host, &bob, 10);

        assert!(matches!(
            result,
            Err(TokenError::InsufficientBalance { have: 5, need: 10, .. })
        ));
        assert_eq!(contract.get_balance(&host, &bob).unwrap(), 5);
        assert_eq!(contract.total_supply, supply);
    }

    #[test]
    fn test_withdraw_supply_underflow() {
        let (mut host, mut contract) = setup();
        let bob = register(&mut host, &contract, "bob.near");
        // Corrupt the invariant on purpose: balance larger than supply.
        contract.set_balance(&mut host, &bob, 10).unwrap();
        contract.total_supply = 3;

        let result = contract.internal_withdraw(&mut host, &bob, 5);

        assert!(matches!(result, Err(TokenError::SupplyUnderflow)));
        assert_eq!(contract.get_balance(&host, &bob).unwrap(), 10);
        assert_eq!(contract.total_supply, 3);
    }

    #[test]
    fn test_withdraw_and_deposit_move_supply() {
        let (mut host, mut contract) = setup();
        let owner = treasury(&host);

        contract.internal_withdraw(&mut host, &owner, 100).unwrap();
        assert_eq!(contract.total_supply, INITIAL_SUPPLY - 100);

        contract.internal_deposit(&mut host, &owner, 100).unwrap();
        assert_eq!(contract.total_supply, INITIAL_SUPPLY);
        assert_eq!(contract.get_balance(&host, &owner).unwrap(), INITIAL_SUPPLY);
    }

    #[test]
    fn test_deposit_unregistered() {
        let (mut host, mut contract) = setup();

        let result = contract.internal_deposit(&mut host, &id("ghost.near"), 1);
        assert!(matches!(result, Err(TokenError::NotRegistered(_))));
        assert_eq!(contract.total_supply, INITIAL_SUPPLY);
    }

    #[test]
    fn test_transfer_same_account() {
        let (mut host, mut contract) = setup();
        let alice = fund(&mut host, &mut contract, "alice.near", 10);

        let result = contract.internal_transfer(&mut host, &alice, &alice, 5, None);
        assert!(matches!(result, Err(TokenError::SameAccount)));
        assert_eq!(contract.get_balance(&host, &alice).unwrap(), 10);
    }

    #[test]
    fn test_transfer_zero_amount() {
        let (mut host, mut contract) = setup();
        let owner = treasury(&host);
        let bob = register(&mut host, &contract, "bob.near");

        let result = contract.internal_transfer(&mut host, &owner, &bob, 0, None);
        assert!(matches!(result, Err(TokenError::InvalidAmount)));
    }

    #[test]
    fn test_transfer_round_trip_restores_balances() {
        let (mut host, mut contract) = setup();
        let alice = fund(&mut host, &mut contract, "alice.near", 300);
        let bob = fund(&mut host, &mut contract, "bob.near", 50);

        contract
            .internal_transfer(&mut host, &alice, &bob, 120, Some("there"))
            .unwrap();
        assert_eq!(contract.get_balance(&host, &alice).unwrap(), 180);
        assert_eq!(contract.get_balance(&host, &bob).unwrap(), 170);
        assert_eq!(contract.total_supply, INITIAL_SUPPLY);

        contract
            .internal_transfer(&mut host, &bob, &alice, 120, Some("back"))
            .unwrap();
        assert_eq!(contract.get_balance(&host, &alice).unwrap(), 300);
        assert_eq!(contract.get_balance(&host, &bob).unwrap(), 50);
        assert_eq!(contract.total_supply, INITIAL_SUPPLY);

        let owner = treasury(&host);
        assert_supply_invariant(&host, &contract, &[owner, alice, bob]);
    }

    #[test]
    fn test_transfer_to_unregistered_debits_nothing() {
        let (mut host, mut contract) = setup();
        let alice = fund(&mut host, &mut contract, "alice.near", 10);

        let result = contract.internal_transfer(&mut host, &alice, &id("ghost.near"), 5, None);

        assert!(matches!(result, Err(TokenError::NotRegistered(_))));
        assert_eq!(contract.get_balance(&host, &alice).unwrap(), 10);
        assert_eq!(contract.total_supply, INITIAL_SUPPLY);
    }

    #[test]
    fn test_transfer_emits_event() {
        let (mut host, mut contract) = setup();
        let alice = fund(&mut host, &mut contract, "alice.near", 10);
        let bob = register(&mut host, &contract, "bob.near");

        contract
            .internal_transfer(&mut host, &alice, &bob, 4, Some("lunch"))
            .unwrap();

        let event = host.logs().last().unwrap();
        assert!(event.contains(r#""event":"ft_transfer""#));
        assert!(event.contains(r#""old_owner_id":"alice.near""#));
        assert!(event.contains(r#""new_owner_id":"bob.near""#));
        assert!(event.contains(r#""memo":"lunch""#));
    }

    #[test]
    fn test_transfer_call_schedules_notification() {
        let (mut host, mut contract) = setup();
        let owner = treasury(&host);
        let dex = register(&mut host, &contract, "dex.near");

        contract
            .internal_transfer_call(&mut host, &owner, &dex, 25, None, Some("swap"))
            .unwrap();

        assert_eq!(contract.get_balance(&host, &dex).unwrap(), 25);
        match host.receipts().last().unwrap() {
            PromiseAction::FunctionCall {
                receiver_id,
                method_name,
                args,
                deposit,
                gas,
            } => {
                assert_eq!(receiver_id, &dex);
                assert_eq!(method_name, "ft_on_transfer");
                assert_eq!(*deposit, U128(0));
                assert_eq!(*gas, GAS_FOR_FT_ON_TRANSFER);
                let payload: serde_json::Value = serde_json::from_str(args).unwrap();
                assert_eq!(payload["sender_id"], owner.as_str());
                assert_eq!(payload["receiver_id"], "dex.near");
                assert_eq!(payload["amount"], "25");
                assert_eq!(payload["msg"], "swap");
            }
            other => panic!("unexpected receipt {:?}", other),
        }
    }

    #[test]
    fn test_transfer_call_failure_schedules_nothing() {
        let (mut host, mut contract) = setup();
        let alice = fund(&mut host, &mut contract, "alice.near", 1);
        let dex = register(&mut host, &contract, "dex.near");

        let result = contract.internal_transfer_call(&mut host, &alice, &dex, 2, None, None);

        assert!(result.is_err());
        assert!(host.receipts().is_empty());
    }

    #[test]
    fn test_send_native_requires_headroom() {
        let (mut host, _) = setup();
        let available = host.account_balance();

        let result = send_native(&mut host, &id("bob.near"), available);
        assert!(matches!(
            result,
            Err(TokenError::InsufficientNativeBalance { .. })
        ));

        assert!(matches!(
            send_native(&mut host, &id("bob.near"), 0),
            Err(TokenError::InvalidAmount)
        ));

        send_native(&mut host, &id("bob.near"), 10).unwrap();
        assert_eq!(host.account_balance(), available - 10);
    }

    #[test]
    fn test_send_native_may_return_whole_deposit() {
        let mut host = MockHost::new(MockHostConfig {
            initial_balance: U128(0),
            ..Default::default()
        });
        let ctx = ExecutionContext::direct(id("alice.near")).with_deposit(10);

        host.execute(ctx, |h| send_native(h, &id("alice.near"), 10))
            .unwrap();
        assert_eq!(host.account_balance(), 0);

        let ctx = ExecutionContext::direct(id("alice.near")).with_deposit(10);
        let result = host.execute(ctx, |h| send_native(h, &id("alice.near"), 11));
        assert!(matches!(
            result,
            Err(TokenError::InsufficientNativeBalance { available: 10, amount: 11 })
        ));
    }
}
