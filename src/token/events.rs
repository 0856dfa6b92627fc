//! NEP-141 event logs
//!
//! Events are emitted through the host log as `EVENT_JSON:` followed by
//! `{standard, version, event, data}`.

use crate::host::Host;
use crate::token::account_id::AccountId;
use crate::token::amount::U128;
use crate::token::metadata::FT_METADATA_SPEC;
use serde::Serialize;

/// Event standard name
pub const FT_STANDARD_NAME: &str = "nep141";

/// Prefix marking a structured event in the host log
pub const EVENT_JSON_PREFIX: &str = "EVENT_JSON:";

/// Mint event data
#[derive(Clone, Debug, Serialize)]
pub struct FtMint<'a> {
    pub owner_id: &'a AccountId,
    pub amount: U128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<&'a str>,
}

/// Burn event data
#[derive(Clone, Debug, Serialize)]
pub struct FtBurn<'a> {
    pub owner_id: &'a AccountId,
    pub amount: U128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<&'a str>,
}

/// Transfer event data
#[derive(Clone, Debug, Serialize)]
pub struct FtTransfer<'a> {
    pub old_owner_id: &'a AccountId,
    pub new_owner_id: &'a AccountId,
    pub amount: U128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<&'a str>,
}

#[derive(Serialize, Debug)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
enum FtEventKind<'a> {
    FtMint(&'a [FtMint<'a>]),
    FtBurn(&'a [FtBurn<'a>]),
    FtTransfer(&'a [FtTransfer<'a>]),
}

#[derive(Serialize, Debug)]
struct EventLog<'a> {
    standard: &'static str,
    version: &'static str,
    #[serde(flatten)]
    event: FtEventKind<'a>,
}

fn emit<H: Host + ?Sized>(host: &mut H, event: FtEventKind<'_>) {
    let log = EventLog {
        standard: FT_STANDARD_NAME,
        version: FT_METADATA_SPEC,
        event,
    };
    match serde_json::to_string(&log) {
        Ok(json) => host.log_str(&format!("{}{}", EVENT_JSON_PREFIX, json)),
        // Only borrowed strings and decimal amounts; encoding cannot fail.
        Err(e) => log::warn!("Failed to encode event: {}", e),
    }
}

impl FtMint<'_> {
    pub fn emit<H: Host + ?Sized>(&self, host: &mut H) {
        emit(host, FtEventKind::FtMint(std::slice::from_ref(self)));
    }
}

impl FtBurn<'_> {
    pub fn emit<H: Host + ?Sized>(&self, host: &mut H) {
        emit(host, FtEventKind::FtBurn(std::slice::from_ref(self)));
    }
}

impl FtTransfer<'_> {
    pub fn emit<H: Host + ?Sized>(&self, host: &mut H) {
        emit(host, FtEventKind::FtTransfer(std::slice::from_ref(self)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockHost, MockHostConfig};
    use crate::token::account_id::parse_account_id;

    fn id(s: &str) -> AccountId {
        parse_account_id(s).unwrap()
    }

    #[test]
    fn test_transfer_event_format() {
        let mut host = MockHost::new(MockHostConfig::default());
        let (alice, bob) = (id("alice.near"), id("bob.near"));
        FtTransfer {
            old_owner_id: &alice,
            new_owner_id: &bob,
            amount: U128(42),
            memo: Some("rent"),
        }
        .emit(&mut host);

        let logs = host.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(
            logs[0],
            r#"EVENT_JSON:{"standard":"nep141","version":"ft-1.0.0","event":"ft_transfer","data":[{"old_owner_id":"alice.near","new_owner_id":"bob.near","amount":"42","memo":"rent"}]}"#
        );
    }

    #[test]
    fn test_mint_event_omits_missing_memo() {
        let mut host = MockHost::new(MockHostConfig::default());
        let owner = id("ft.near");
        FtMint {
            owner_id: &owner,
            amount: U128(1000),
            memo: None,
        }
        .emit(&mut host);

        let json = host.logs()[0].strip_prefix(EVENT_JSON_PREFIX).unwrap();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["event"], "ft_mint");
        assert_eq!(value["data"][0]["owner_id"], "ft.near");
        assert_eq!(value["data"][0]["amount"], "1000");
        assert!(value["data"][0].get("memo").is_none());
    }
}
