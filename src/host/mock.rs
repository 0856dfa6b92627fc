//! In-memory host runtime
//!
//! Models the parts of the chain runtime the ledger relies on: metered
//! key-value storage, call identities, the contract's native balance and
//! outgoing receipts. `execute` gives one call all-or-nothing semantics,
//! the way the real host discards every write of a failed call.

use crate::host::{ExecutionContext, Gas, Host, STORAGE_RECORD_OVERHEAD};
use crate::token::{parse_account_id, AccountId, U128};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Display;

// =============================================================================
// Constants
// =============================================================================

/// One native token in its smallest unit
pub const ONE_NEAR: u128 = 1_000_000_000_000_000_000_000_000;

/// Protocol price of one storage byte (10^19 per byte, 1 NEAR per 100kB)
pub const DEFAULT_STORAGE_BYTE_COST: u128 = 10_000_000_000_000_000_000;

/// Contract account used when none is configured
pub const DEFAULT_CONTRACT_ID: &str = "ft.ptit.testnet";

// =============================================================================
// Configuration
// =============================================================================

/// Parameters of a mock runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockHostConfig {
    /// The contract's own account
    pub current_account_id: AccountId,
    /// Native balance of the contract account at deployment
    pub initial_balance: U128,
    /// Price per storage byte
    pub storage_byte_cost: U128,
    /// Storage taken before any record is written (contract code etc.)
    pub base_storage_usage: u64,
}

impl Default for MockHostConfig {
    fn default() -> Self {
        Self {
            current_account_id: parse_account_id(DEFAULT_CONTRACT_ID)
                .expect("default contract id is valid"),
            initial_balance: U128(100 * ONE_NEAR),
            storage_byte_cost: U128(DEFAULT_STORAGE_BYTE_COST),
            base_storage_usage: 0,
        }
    }
}

// =============================================================================
// Receipts
// =============================================================================

/// An outgoing receipt scheduled by a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromiseAction {
    Transfer {
        receiver_id: AccountId,
        amount: U128,
    },
    FunctionCall {
        receiver_id: AccountId,
        method_name: String,
        args: String,
        deposit: U128,
        gas: Gas,
    },
}

/// Everything a finished call produced
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// Return payload, or the error string of a failed call
    pub result: Result<Vec<u8>, String>,
    pub logs: Vec<String>,
    pub receipts: Vec<PromiseAction>,
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

// =============================================================================
// Mock Host
// =============================================================================

/// In-memory implementation of `Host`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockHost {
    config: MockHostConfig,
    #[serde(with = "hex_records")]
    storage: BTreeMap<Vec<u8>, Vec<u8>>,
    account_balance: U128,
    context: ExecutionContext,
    #[serde(skip)]
    logs: Vec<String>,
    #[serde(skip)]
    receipts: Vec<PromiseAction>,
}

impl MockHost {
    /// Create a runtime with empty storage
    pub fn new(config: MockHostConfig) -> Self {
        let context = ExecutionContext::direct(config.current_account_id.clone());
        Self {
            account_balance: config.initial_balance,
            storage: BTreeMap::new(),
            context,
            logs: Vec::new(),
            receipts: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &MockHostConfig {
        &self.config
    }

    /// Replace the call context without transactional bookkeeping
    pub fn set_context(&mut self, context: ExecutionContext) {
        self.context = context;
    }

    /// Run one call with all-or-nothing semantics
    ///
    /// The attached deposit is credited to the contract before `f` runs.
    /// On `Err`, storage, native balance, logs and receipts are restored
    /// to their state before the call (the deposit returns to the caller).
    pub fn execute<T, E>(
        &mut self,
        context: ExecutionContext,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let storage_snapshot = self.storage.clone();
        let balance_snapshot = self.account_balance;

        self.logs.clear();
        self.receipts.clear();
        self.account_balance = U128(
            self.account_balance
                .0
                .saturating_add(context.attached_deposit),
        );
        self.context = context;

        let result = f(self);
        if result.is_err() {
            self.storage = storage_snapshot;
            self.account_balance = balance_snapshot;
            self.logs.clear();
            self.receipts.clear();
        }
        result
    }

    /// Run one call and collect its outcome
    pub fn call<E: Display>(
        &mut self,
        context: ExecutionContext,
        f: impl FnOnce(&mut Self) -> Result<Vec<u8>, E>,
    ) -> CallOutcome {
        let result = self.execute(context, f).map_err(|e| e.to_string());
        CallOutcome {
            result,
            logs: self.logs.clone(),
            receipts: self.receipts.clone(),
        }
    }

    /// Log lines of the latest call
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Receipts scheduled by the latest call
    pub fn receipts(&self) -> &[PromiseAction] {
        &self.receipts
    }

    /// Number of stored records
    pub fn record_count(&self) -> usize {
        self.storage.len()
    }

    /// SHA-256 over all records in key order, hex encoded
    pub fn state_root(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, value) in &self.storage {
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value);
        }
        hex::encode(hasher.finalize())
    }
}

impl Host for MockHost {
    fn storage_read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.get(key).cloned()
    }

    fn storage_write(&mut self, key: &[u8], value: &[u8]) -> Option<Vec<u8>> {
        self.storage.insert(key.to_vec(), value.to_vec())
    }

    fn storage_has_key(&self, key: &[u8]) -> bool {
        self.storage.contains_key(key)
    }

    fn storage_remove(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.storage.remove(key)
    }

    fn storage_usage(&self) -> u64 {
        self.storage
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64 + STORAGE_RECORD_OVERHEAD)
            .sum::<u64>()
            + self.config.base_storage_usage
    }

    fn storage_byte_cost(&self) -> u128 {
        self.config.storage_byte_cost.0
    }

    fn current_account_id(&self) -> &AccountId {
        &self.config.current_account_id
    }

    fn predecessor_account_id(&self) -> &AccountId {
        &self.context.predecessor_account_id
    }

    fn signer_account_id(&self) -> &AccountId {
        &self.context.signer_account_id
    }

    fn attached_deposit(&self) -> u128 {
        self.context.attached_deposit
    }

    fn account_balance(&self) -> u128 {
        self.account_balance.0
    }

    fn promise_transfer(&mut self, receiver_id: &AccountId, amount: u128) {
        self.account_balance = U128(self.account_balance.0.saturating_sub(amount));
        self.receipts.push(PromiseAction::Transfer {
            receiver_id: receiver_id.clone(),
            amount: U128(amount),
        });
    }

    fn promise_function_call(
        &mut self,
        receiver_id: &AccountId,
        method_name: &str,
        args: Vec<u8>,
        deposit: u128,
        gas: Gas,
    ) {
        self.account_balance = U128(self.account_balance.0.saturating_sub(deposit));
        self.receipts.push(PromiseAction::FunctionCall {
            receiver_id: receiver_id.clone(),
            method_name: method_name.to_string(),
            args: String::from_utf8_lossy(&args).into_owned(),
            deposit: U128(deposit),
            gas,
        });
    }

    fn log_str(&mut self, message: &str) {
        log::debug!("[{}] {}", self.config.current_account_id, message);
        self.logs.push(message.to_string());
    }
}

/// Storage records as a JSON object of hex key to hex value
mod hex_records {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        records: &BTreeMap<Vec<u8>, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let encoded: BTreeMap<String, String> = records
            .iter()
            .map(|(k, v)| (hex::encode(k), hex::encode(v)))
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, D::Error> {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(k, v)| {
                let key = hex::decode(&k).map_err(D::Error::custom)?;
                let value = hex::decode(&v).map_err(D::Error::custom)?;
                Ok((key, value))
            })
            .collect()
    }
}
