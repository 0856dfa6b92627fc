//! Host runtime interface
//!
//! The ledger runs as a single state transition inside an external host.
//! This module describes what it consumes from that host:
//! - Byte-oriented key-value storage with usage metering
//! - The three identity roles of a call (current, predecessor, signer)
//! - Attached and owned native-currency amounts
//! - Fire-and-forget native transfers and cross-contract calls
//! - An append-only log
//!
//! `MockHost` implements the interface in memory for tests and the sandbox.

pub mod collections;
pub mod context;
pub mod mock;

pub use collections::{LookupMap, StorageValue};
pub use context::ExecutionContext;
pub use mock::{CallOutcome, MockHost, MockHostConfig, PromiseAction};

use crate::token::AccountId;
use thiserror::Error;

/// Gas units
pub type Gas = u64;

/// One teragas
pub const TGAS: Gas = 1_000_000_000_000;

/// Storage usage counted for every stored record besides key and value
pub const STORAGE_RECORD_OVERHEAD: u64 = 40;

/// Host-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("Corrupt value under storage key {key}: {reason}")]
    CorruptValue { key: String, reason: String },
    #[error("Failed to encode value for storage key {key}: {reason}")]
    EncodeFailed { key: String, reason: String },
}

/// Runtime services available to a contract call
pub trait Host {
    // =========================================================================
    // Storage
    // =========================================================================

    /// Read the value stored under `key`
    fn storage_read(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Write `value` under `key`, returning the evicted value
    fn storage_write(&mut self, key: &[u8], value: &[u8]) -> Option<Vec<u8>>;

    /// Check whether `key` holds a value
    fn storage_has_key(&self, key: &[u8]) -> bool;

    /// Remove `key`, returning the evicted value
    fn storage_remove(&mut self, key: &[u8]) -> Option<Vec<u8>>;

    /// Current storage footprint of the contract in bytes
    fn storage_usage(&self) -> u64;

    /// Price of one byte of storage in native units
    fn storage_byte_cost(&self) -> u128;

    // =========================================================================
    // Identities
    // =========================================================================

    /// The contract's own account
    fn current_account_id(&self) -> &AccountId;

    /// Immediate invoker of the current method
    fn predecessor_account_id(&self) -> &AccountId;

    /// Originator of the top-level transaction
    fn signer_account_id(&self) -> &AccountId;

    // =========================================================================
    // Native currency
    // =========================================================================

    /// Native units attached to this call
    fn attached_deposit(&self) -> u128;

    /// Native balance of the contract account (attached deposit included)
    fn account_balance(&self) -> u128;

    // =========================================================================
    // Outgoing receipts and logs
    // =========================================================================

    /// Schedule a native transfer to `receiver_id`
    fn promise_transfer(&mut self, receiver_id: &AccountId, amount: u128);

    /// Schedule a function call on `receiver_id`
    fn promise_function_call(
        &mut self,
        receiver_id: &AccountId,
        method_name: &str,
        args: Vec<u8>,
        deposit: u128,
        gas: Gas,
    );

    /// Append a line to the call's log
    fn log_str(&mut self, message: &str);
}
