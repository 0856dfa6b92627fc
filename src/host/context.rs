//! Per-call execution context

use crate::token::amount::u128_dec_format;
use crate::token::AccountId;
use serde::{Deserialize, Serialize};

/// Environment of a single contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Originator of the transaction
    pub signer_account_id: AccountId,
    /// Immediate caller (differs from signer for relayed calls)
    pub predecessor_account_id: AccountId,
    /// Native units attached to the call
    #[serde(with = "u128_dec_format")]
    pub attached_deposit: u128,
}

impl ExecutionContext {
    /// A direct call: signer and predecessor are the same account
    pub fn direct(account_id: AccountId) -> Self {
        Self::relayed(account_id.clone(), account_id)
    }

    /// A call relayed by `predecessor` on behalf of `signer`
    pub fn relayed(signer: AccountId, predecessor: AccountId) -> Self {
        Self {
            signer_account_id: signer,
            predecessor_account_id: predecessor,
            attached_deposit: 0,
        }
    }

    /// Attach native units to the call
    pub fn with_deposit(mut self, deposit: u128) -> Self {
        self.attached_deposit = deposit;
        self
    }
}
