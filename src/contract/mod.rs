//! Fungible token contract
//!
//! The ledger is a plain state struct, `FtContract`, whose operations take
//! the host explicitly:
//! - `balances`: account balances, total supply, minting
//! - `ledger`: withdraw/deposit/transfer primitives and `ft_transfer_call`
//! - `registration`: storage-rent account registration
//! - `purchase`: rate-based token sale and cross-contract settlement
//! - `guards`: access and payment checks for entry points
//! - `dispatch`: wire method names to operations
//!
//! # Example
//!
//! ```rust
//! use ft_ledger::contract::dispatch;
//! use ft_ledger::host::{ExecutionContext, MockHost, MockHostConfig};
//!
//! let mut host = MockHost::new(MockHostConfig::default());
//! let contract_id = host.config().current_account_id.clone();
//!
//! let init = br#"{"owner_id":"owner.near","rate":"100","total_supply":"1000"}"#;
//! host.execute(ExecutionContext::direct(contract_id), |h| dispatch(h, "init", init))
//!     .unwrap();
//!
//! let supply = ft_ledger::contract::view(&host, "ft_total_supply", b"").unwrap();
//! assert_eq!(supply, b"\"1000\"");
//! ```

pub mod balances;
pub mod dispatch;
pub mod guards;
pub mod ledger;
pub mod purchase;
pub mod registration;
pub mod state;

pub use dispatch::{dispatch, is_view_method, view, ContractError, CALL_METHODS, VIEW_METHODS};
pub use guards::{
    require_cross_contract_call, require_no_deposit, require_one_yocto, require_private_caller,
};
pub use ledger::{send_native, GAS_FOR_FT_ON_TRANSFER};
pub use purchase::PurchaseReceipt;
pub use registration::{Registration, RegistrationOutcome, ResetSummary};
pub use state::FtContract;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for ledger tests

    pub use crate::host::mock::ONE_NEAR;
    use crate::contract::state::FtContract;
    use crate::host::{Host, MockHost, MockHostConfig};
    use crate::token::{parse_account_id, AccountId, FtMetadata};

    /// Supply minted to the contract account by `setup`
    pub const INITIAL_SUPPLY: u128 = 1_000_000;

    pub fn id(s: &str) -> AccountId {
        parse_account_id(s).unwrap()
    }

    /// Contract with rate 100 and nothing minted
    pub fn setup_empty() -> (MockHost, FtContract) {
        let host = MockHost::new(MockHostConfig::default());
        let contract = FtContract::new(id("owner.near"), 100, FtMetadata::with_decimals(0).unwrap())
            .unwrap();
        (host, contract)
    }

    /// Contract with `INITIAL_SUPPLY` held by the contract account
    pub fn setup() -> (MockHost, FtContract) {
        let (mut host, mut contract) = setup_empty();
        let owner = treasury(&host);
        contract.mint(&mut host, &owner, INITIAL_SUPPLY).unwrap();
        (host, contract)
    }

    pub fn treasury(host: &MockHost) -> AccountId {
        host.current_account_id().clone()
    }

    /// Create a zero balance entry without paying for storage
    pub fn register(host: &mut MockHost, contract: &FtContract, s: &str) -> AccountId {
        let account = id(s);
        contract.set_balance(host, &account, 0).unwrap();
        account
    }

    /// Register an account and move `amount` to it from the contract account
    pub fn fund(host: &mut MockHost, contract: &mut FtContract, s: &str, amount: u128) -> AccountId {
        let account = register(host, contract, s);
        let owner = treasury(host);
        contract
            .internal_transfer(host, &owner, &account, amount, None)
            .unwrap();
        account
    }

    /// Sum of the given balances equals the total supply
    pub fn assert_supply_invariant(host: &MockHost, contract: &FtContract, holders: &[AccountId]) {
        let sum: u128 = holders
            .iter()
            .map(|a| contract.get_balance(host, a).unwrap())
            .sum();
        assert_eq!(sum, contract.total_supply);
    }
}
