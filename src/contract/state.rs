//! Contract state
//!
//! The singleton ledger object. It is loaded from the host at the start of
//! every call and written back at the end; per-account records live in
//! prefixed `LookupMap`s and are touched individually.

use crate::host::{Host, HostError, LookupMap};
use crate::token::amount::u128_dec_format;
use crate::token::{AccountId, FtMetadata, TokenError, U128};
use serde::{Deserialize, Serialize};

/// Storage key of the serialized contract state
pub const STATE_KEY: &[u8] = b"STATE";

/// Key prefix of account balances
pub const BALANCES_PREFIX: &str = "a";

/// Key prefix of account registrants
pub const REGISTRANTS_PREFIX: &str = "r";

/// Key prefix of registration deposits
pub const DEPOSITS_PREFIX: &str = "d";

/// Persistent state of the token contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FtContract {
    /// Token creator
    pub owner_id: AccountId,
    /// Native units per token
    #[serde(with = "u128_dec_format")]
    pub rate: u128,
    /// Token metadata
    pub metadata: FtMetadata,
    /// Balances: account -> amount
    pub accounts: LookupMap<u128>,
    /// Registrants: account -> who paid for its storage
    pub registrants: LookupMap<AccountId>,
    /// Deposits: account -> storage deposit paid
    pub deposits: LookupMap<u128>,
    /// Sum of all balances
    #[serde(with = "u128_dec_format")]
    pub total_supply: u128,
}

impl FtContract {
    /// Create an empty ledger
    pub fn new(owner_id: AccountId, rate: u128, metadata: FtMetadata) -> Result<Self, TokenError> {
        if rate == 0 {
            return Err(TokenError::InvalidRate);
        }

        Ok(Self {
            owner_id,
            rate,
            metadata,
            accounts: LookupMap::new(BALANCES_PREFIX),
            registrants: LookupMap::new(REGISTRANTS_PREFIX),
            deposits: LookupMap::new(DEPOSITS_PREFIX),
            total_supply: 0,
        })
    }

    /// Load the state written by the previous call, if any
    pub fn load<H: Host + ?Sized>(host: &H) -> Result<Option<Self>, HostError> {
        match host.storage_read(STATE_KEY) {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| HostError::CorruptValue {
                    key: String::from_utf8_lossy(STATE_KEY).into_owned(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Persist the state for the next call
    pub fn save<H: Host + ?Sized>(&self, host: &mut H) -> Result<(), HostError> {
        let bytes = serde_json::to_vec(self).map_err(|e| HostError::EncodeFailed {
            key: String::from_utf8_lossy(STATE_KEY).into_owned(),
            reason: e.to_string(),
        })?;
        host.storage_write(STATE_KEY, &bytes);
        Ok(())
    }

    pub fn is_initialized<H: Host + ?Sized>(host: &H) -> bool {
        host.storage_has_key(STATE_KEY)
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn ft_total_supply(&self) -> U128 {
        U128(self.total_supply)
    }

    pub fn ft_metadata(&self) -> &FtMetadata {
        &self.metadata
    }

    pub fn ft_rate(&self) -> U128 {
        U128(self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockHost, MockHostConfig};
    use crate::token::parse_account_id;

    fn sample() -> FtContract {
        FtContract::new(
            parse_account_id("owner.near").unwrap(),
            100,
            FtMetadata::with_decimals(0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_rate_rejected() {
        let result = FtContract::new(
            parse_account_id("owner.near").unwrap(),
            0,
            FtMetadata::with_decimals(0).unwrap(),
        );
        assert!(matches!(result, Err(TokenError::InvalidRate)));
    }

    #[test]
    fn test_save_and_load() {
        let mut host = MockHost::new(MockHostConfig::default());
        assert!(FtContract::load(&host).unwrap().is_none());

        let mut contract = sample();
        contract.total_supply = u128::MAX;
        contract.save(&mut host).unwrap();

        assert!(FtContract::is_initialized(&host));
        assert_eq!(FtContract::load(&host).unwrap(), Some(contract));
    }

    #[test]
    fn test_amounts_persist_as_strings() {
        let mut host = MockHost::new(MockHostConfig::default());
        sample().save(&mut host).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&host.storage_read(STATE_KEY).unwrap()).unwrap();
        assert_eq!(raw["rate"], "100");
        assert_eq!(raw["total_supply"], "0");
        assert_eq!(raw["accounts"]["prefix"], "a");
    }

    #[test]
    fn test_corrupt_state_is_reported() {
        let mut host = MockHost::new(MockHostConfig::default());
        host.storage_write(STATE_KEY, b"not json");
        assert!(matches!(
            FtContract::load(&host),
            Err(HostError::CorruptValue { .. })
        ));
    }
}
