//! Token purchase and cross-contract settlement
//!
//! Tokens are sold out of the contract account's own balance at a fixed
//! rate of native units per token. The leftover that does not buy a whole
//! token goes back to the buyer.
//!
//! The host exposes two identities per call. `buy_ft` treats the caller
//! as buyer, `on_buy_ft` and the settlement methods treat the transaction
//! signer as the counterparty and only accept relayed calls.

use crate::contract::guards::require_cross_contract_call;
use crate::contract::ledger::send_native;
use crate::contract::state::FtContract;
use crate::host::Host;
use crate::token::{AccountId, TokenError, U128};
use serde::{Deserialize, Serialize};

/// What a purchase produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub buyer_id: AccountId,
    /// Tokens credited to the buyer
    pub amount: U128,
    /// Native units sent back to the buyer
    pub refund: U128,
}

impl FtContract {
    /// Sell tokens for the attached deposit
    pub fn purchase<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        buyer_id: &AccountId,
    ) -> Result<PurchaseReceipt, TokenError> {
        let seller_id = host.current_account_id().clone();
        let attached = host.attached_deposit();
        if attached < self.rate {
            return Err(TokenError::BelowMinimumPurchase {
                attached,
                rate: self.rate,
            });
        }
        if !self.is_registered(host, buyer_id) {
            return Err(TokenError::NotRegistered(buyer_id.clone()));
        }

        let amount = attached / self.rate;
        self.internal_withdraw(host, &seller_id, amount)?;
        self.internal_deposit(host, buyer_id, amount)?;
        host.log_str(&format!("{} bought {} successfully", buyer_id, amount));

        let refund = attached % self.rate;
        if refund > 0 {
            send_native(host, buyer_id, refund)?;
            host.log_str(&format!("Refund {} NEAR to {}", refund, buyer_id));
        }

        log::info!(
            "{} bought {} tokens for {} (refund {})",
            buyer_id,
            amount,
            attached,
            refund
        );
        Ok(PurchaseReceipt {
            buyer_id: buyer_id.clone(),
            amount: U128(amount),
            refund: U128(refund),
        })
    }

    /// Purchase for the immediate caller
    pub fn buy_ft<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<PurchaseReceipt, TokenError> {
        let buyer_id = host.predecessor_account_id().clone();
        self.purchase(host, &buyer_id)
    }

    /// Purchase relayed by another contract, for the transaction signer
    pub fn on_buy_ft<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<PurchaseReceipt, TokenError> {
        require_cross_contract_call(host)?;
        let buyer_id = host.signer_account_id().clone();
        self.purchase(host, &buyer_id)
    }

    /// Move tokens from the signer to the contract account
    pub fn ft_on_purchase<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        amount: u128,
        memo: Option<&str>,
    ) -> Result<String, TokenError> {
        require_cross_contract_call(host)?;
        let sender_id = host.signer_account_id().clone();
        let receiver_id = host.current_account_id().clone();
        self.internal_transfer(host, &sender_id, &receiver_id, amount, memo)?;
        Ok(format!(
            "Send {} {} to {} successfully",
            amount, self.metadata.name, receiver_id
        ))
    }

    /// Move tokens from the contract account back to the signer
    pub fn ft_on_refund<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        amount: u128,
        memo: Option<&str>,
    ) -> Result<String, TokenError> {
        require_cross_contract_call(host)?;
        let sender_id = host.current_account_id().clone();
        let receiver_id = host.signer_account_id().clone();
        self.internal_transfer(host, &sender_id, &receiver_id, amount, memo)?;
        Ok(format!(
            "Refund {} {} to {} successfully",
            amount, self.metadata.name, receiver_id
        ))
    }

    /// Set the price of one token in native units
    pub fn update_rate(&mut self, rate: u128) -> Result<(), TokenError> {
        if rate == 0 {
            return Err(TokenError::InvalidRate);
        }
        log::info!("Rate changed from {} to {}", self.rate, rate);
        self.rate = rate;
        Ok(())
    }
}
