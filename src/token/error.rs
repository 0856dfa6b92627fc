//! Ledger errors
//!
//! Every variant is a fatal assertion: the host aborts the call and
//! discards its pending writes. Routine registration outcomes are not
//! errors, see `RegistrationOutcome`.

use crate::host::HostError;
use crate::token::account_id::AccountId;
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid account ID {account_id}: {reason}")]
    InvalidAccountId { account_id: String, reason: String },
    #[error("Account {0} is not registered")]
    NotRegistered(AccountId),
    #[error("Account {0} is already registered")]
    AlreadyRegistered(AccountId),
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    #[error("Account {account} doesn't have enough balance: have {have}, need {need}")]
    InsufficientBalance {
        account: AccountId,
        have: u128,
        need: u128,
    },
    #[error("Total supply underflow")]
    SupplyUnderflow,
    #[error("Total supply overflow")]
    SupplyOverflow,
    #[error("Balance overflow for account {0}")]
    BalanceOverflow(AccountId),
    #[error("Sender and receiver must be different")]
    SameAccount,
    #[error("Must buy at least 1 token: attached {attached}, rate {rate}")]
    BelowMinimumPurchase { attached: u128, rate: u128 },
    #[error("Rate must be greater than 0")]
    InvalidRate,
    #[error("Only for cross-contract call")]
    NotCrossContractCall,
    #[error("Requires attached deposit of exactly 1 yoctoNEAR, got {0}")]
    RequiresOneYocto(u128),
    #[error("Method {0} is private")]
    PrivateMethod(String),
    #[error("Method {0} doesn't accept deposit")]
    DepositNotAllowed(String),
    #[error("Not enough attached deposit. Required: {required}, attached: {attached}")]
    InsufficientStorageDeposit { required: u128, attached: u128 },
    #[error("Not enough balance {available} to send {amount}")]
    InsufficientNativeBalance { available: u128, amount: u128 },
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error(transparent)]
    Host(#[from] HostError),
}
