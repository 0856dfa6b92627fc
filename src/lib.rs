//! FT Ledger: a fungible token contract with a local sandbox in Rust
//!
//! This crate provides a NEP-141 style token ledger featuring:
//! - Account balances with a conserved total supply
//! - Storage-rent registration paid in the native currency
//! - Rate-based token sale with cross-contract settlement
//! - Standard event logs (`EVENT_JSON:` mint, burn, transfer)
//! - A metered in-memory host with all-or-nothing call semantics
//! - JSON sandbox persistence with backups and a call journal
//!
//! # Example
//!
//! ```rust
//! use ft_ledger::contract::dispatch;
//! use ft_ledger::host::{ExecutionContext, MockHost, MockHostConfig};
//! use ft_ledger::token::parse_account_id;
//!
//! let mut host = MockHost::new(MockHostConfig::default());
//! let contract_id = host.config().current_account_id.clone();
//!
//! // Deploy with a rate of 100 native units per token
//! let init = br#"{"owner_id":"owner.near","rate":"100","total_supply":"1000"}"#;
//! host.execute(ExecutionContext::direct(contract_id.clone()), |h| {
//!     dispatch(h, "init", init)
//! })
//! .unwrap();
//!
//! // Buy two tokens
//! let buyer = parse_account_id("alice.near").unwrap();
//! let register = ExecutionContext::direct(buyer.clone()).with_deposit(10u128.pow(22));
//! host.execute(register, |h| dispatch(h, "storage_deposit", b"")).unwrap();
//! let buy = ExecutionContext::direct(buyer).with_deposit(200);
//! let receipt = host.execute(buy, |h| dispatch(h, "buy_ft", b"")).unwrap();
//! println!("{}", String::from_utf8_lossy(&receipt));
//! ```

pub mod cli;
pub mod contract;
pub mod host;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use contract::{dispatch, view, ContractError, FtContract, PurchaseReceipt};
pub use host::{ExecutionContext, Host, HostError, MockHost, MockHostConfig, PromiseAction};
pub use storage::{Journal, SandboxConfig, Snapshot, Storage, StorageError};
pub use token::{parse_account_id, AccountId, FtMetadata, TokenError, U128};
