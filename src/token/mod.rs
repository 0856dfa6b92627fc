//! NEP-141 fungible token domain types
//!
//! Provides the value types shared by the ledger and its entry points:
//! - Validated account identifiers
//! - Decimal-string amounts for the wire boundary
//! - Token metadata
//! - Structured `nep141` event logs
//!
//! # Example
//!
//! ```rust
//! use ft_ledger::token::{parse_account_id, U128};
//!
//! let owner = parse_account_id("ft.ptit.testnet").unwrap();
//! let amount: U128 = serde_json::from_str("\"1000\"").unwrap();
//! assert_eq!(owner.as_str(), "ft.ptit.testnet");
//! assert_eq!(amount.0, 1000);
//! ```

pub mod account_id;
pub mod amount;
pub mod error;
pub mod events;
pub mod metadata;

pub use account_id::{parse_account_id, AccountId};
pub use amount::U128;
pub use error::TokenError;
pub use events::{FtBurn, FtMint, FtTransfer, EVENT_JSON_PREFIX, FT_STANDARD_NAME};
pub use metadata::{FtMetadata, FT_METADATA_SPEC};
