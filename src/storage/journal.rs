//! Call journal
//!
//! Bounded history of sandbox calls with their outcome and the state root
//! they left behind.

use crate::host::{CallOutcome, ExecutionContext};
use crate::token::{AccountId, U128};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Calls kept in the journal
pub const MAX_JOURNAL_ENTRIES: usize = 100;

/// One recorded call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub executed_at: DateTime<Utc>,
    pub method: String,
    pub signer_id: AccountId,
    pub predecessor_id: AccountId,
    pub attached_deposit: U128,
    pub success: bool,
    /// JSON result or error message
    pub output: String,
    pub state_root: String,
}

impl JournalEntry {
    pub fn new(
        method: &str,
        context: &ExecutionContext,
        outcome: &CallOutcome,
        state_root: String,
    ) -> Self {
        let output = match &outcome.result {
            Ok(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Err(e) => e.clone(),
        };
        Self {
            executed_at: Utc::now(),
            method: method.to_string(),
            signer_id: context.signer_account_id.clone(),
            predecessor_id: context.predecessor_account_id.clone(),
            attached_deposit: U128(context.attached_deposit),
            success: outcome.is_success(),
            output,
            state_root,
        }
    }
}

/// Most recent calls, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: VecDeque<JournalEntry>,
}

impl Journal {
    pub fn record(&mut self, entry: JournalEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_JOURNAL_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `count` entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev().take(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::parse_account_id;

    fn outcome(result: Result<Vec<u8>, String>) -> CallOutcome {
        CallOutcome {
            result,
            logs: Vec::new(),
            receipts: Vec::new(),
        }
    }

    #[test]
    fn test_entry_captures_call() {
        let ctx = ExecutionContext::direct(parse_account_id("alice.near").unwrap()).with_deposit(3);
        let entry = JournalEntry::new("buy_ft", &ctx, &outcome(Err("nope".into())), "ab".into());

        assert_eq!(entry.method, "buy_ft");
        assert_eq!(entry.attached_deposit, U128(3));
        assert!(!entry.success);
        assert_eq!(entry.output, "nope");
    }

    #[test]
    fn test_journal_is_bounded() {
        let ctx = ExecutionContext::direct(parse_account_id("alice.near").unwrap());
        let mut journal = Journal::default();

        for i in 0..(MAX_JOURNAL_ENTRIES + 10) {
            let ok = outcome(Ok(i.to_string().into_bytes()));
            journal.record(JournalEntry::new("ft_rate", &ctx, &ok, String::new()));
        }

        assert_eq!(journal.len(), MAX_JOURNAL_ENTRIES);
        let newest = journal.recent(1).next().unwrap();
        assert_eq!(newest.output, (MAX_JOURNAL_ENTRIES + 9).to_string());
    }
}
