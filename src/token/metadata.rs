//! Token metadata
//!
//! Static descriptive record returned by `ft_metadata`. Only the decimals
//! can be chosen, and only once at `init`.

use crate::token::error::TokenError;
use serde::{Deserialize, Serialize};

/// Metadata spec version, also used as the event `version`
pub const FT_METADATA_SPEC: &str = "ft-1.0.0";

/// Default token name
pub const DEFAULT_NAME: &str = "PTIT TOKEN";

/// Default token symbol
pub const DEFAULT_SYMBOL: &str = "ptitNEAR";

/// Highest supported decimals (native currency has 24)
pub const MAX_DECIMALS: u8 = 24;

/// Default token icon
pub const DEFAULT_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 32 32'%3E%3Ccircle cx='16' cy='16' r='15' fill='%23b71c1c'/%3E%3Ctext x='16' y='21' font-size='12' text-anchor='middle' fill='white'%3EPTIT%3C/text%3E%3C/svg%3E";

/// Fungible token metadata (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FtMetadata {
    /// Metadata spec version
    pub spec: String,
    /// Token name (e.g., "PTIT TOKEN")
    pub name: String,
    /// Token symbol (e.g., "ptitNEAR")
    pub symbol: String,
    /// Data URL of the token icon
    pub icon: Option<String>,
    /// Decimal places
    pub decimals: u8,
}

impl FtMetadata {
    /// Create new metadata with validation
    pub fn new(
        name: String,
        symbol: String,
        icon: Option<String>,
        decimals: u8,
    ) -> Result<Self, TokenError> {
        if name.is_empty() || name.len() > 50 {
            return Err(TokenError::InvalidMetadata(
                "name must be 1-50 characters".to_string(),
            ));
        }

        if symbol.is_empty() || symbol.len() > 10 {
            return Err(TokenError::InvalidMetadata(
                "symbol must be 1-10 characters".to_string(),
            ));
        }

        if decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidMetadata(format!(
                "decimals must be 0-{}",
                MAX_DECIMALS
            )));
        }

        Ok(Self {
            spec: FT_METADATA_SPEC.to_string(),
            name,
            symbol,
            icon,
            decimals,
        })
    }

    /// The contract's token description with the chosen decimals
    pub fn with_decimals(decimals: u8) -> Result<Self, TokenError> {
        Self::new(
            DEFAULT_NAME.to_string(),
            DEFAULT_SYMBOL.to_string(),
            Some(DEFAULT_ICON.to_string()),
            decimals,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metadata() {
        let metadata = FtMetadata::with_decimals(0).unwrap();
        assert_eq!(metadata.spec, "ft-1.0.0");
        assert_eq!(metadata.name, "PTIT TOKEN");
        assert_eq!(metadata.symbol, "ptitNEAR");
        assert_eq!(metadata.decimals, 0);
        assert!(metadata.icon.unwrap().starts_with("data:image/svg+xml"));
    }

    #[test]
    fn test_metadata_validation() {
        assert!(FtMetadata::new("".to_string(), "TST".to_string(), None, 0).is_err());
        assert!(
            FtMetadata::new("Test".to_string(), "TOOLONGSYMBOL".to_string(), None, 0).is_err()
        );
        assert!(FtMetadata::with_decimals(25).is_err());
        assert!(FtMetadata::with_decimals(24).is_ok());
    }
}
