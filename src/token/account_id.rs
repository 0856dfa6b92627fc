//! Account identifiers
//!
//! Account names are the chain's own `AccountId`: 2 to 64 characters,
//! lowercase alphanumeric parts joined by single `-` or `_`, with `.`
//! separating segments (`alice.near`, `ft_pool-1.testnet`). Parsing and
//! serde both enforce that grammar.

use crate::token::error::TokenError;

pub use near_sdk::AccountId;

/// Parse an account name taken from call arguments or the command line
pub fn parse_account_id(id: &str) -> Result<AccountId, TokenError> {
    id.parse::<AccountId>()
        .map_err(|e| TokenError::InvalidAccountId {
            account_id: id.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_account_ids() {
        let long = "a".repeat(64);
        for id in [
            "alice.near",
            "ft.ptit.testnet",
            "a1",
            "bob_2-x.near",
            "0123456789",
            long.as_str(),
        ] {
            assert!(parse_account_id(id).is_ok(), "{} should be valid", id);
        }
    }

    #[test]
    fn test_invalid_account_ids() {
        let long = "a".repeat(65);
        for id in [
            "",
            "a",
            "Alice.near",
            "alice..near",
            ".alice",
            "alice.",
            "alice-.near",
            "al__ice",
            "alice near",
            "alice@near",
            long.as_str(),
        ] {
            assert!(parse_account_id(id).is_err(), "{} should be invalid", id);
        }
    }

    #[test]
    fn test_parse_reports_offending_id() {
        let err = parse_account_id("Bad").unwrap_err();
        assert!(matches!(err, TokenError::InvalidAccountId { ref account_id, .. } if account_id == "Bad"));
        assert!(err.to_string().starts_with("Invalid account ID Bad:"));
    }

    #[test]
    fn test_serde_rejects_invalid_id() {
        let ok: AccountId = serde_json::from_str("\"carol.near\"").unwrap();
        assert_eq!(ok.as_str(), "carol.near");
        assert!(serde_json::from_str::<AccountId>("\"NOPE\"").is_err());
    }
}
