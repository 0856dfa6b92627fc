//! CLI commands for the token sandbox
//!
//! Implements all command handlers for the CLI interface.

use crate::contract::{dispatch, view, FtContract};
use crate::host::{ExecutionContext, Host, MockHost, MockHostConfig, PromiseAction};
use crate::storage::{JournalEntry, SandboxConfig, Snapshot, Storage};
use crate::token::{parse_account_id, U128};
use serde_json::json;
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub snapshot: Snapshot,
    pub storage: Storage,
}

impl AppState {
    /// Initialize application state
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage = open_storage(&data_dir)?;

        let snapshot = if storage.exists() {
            log::debug!("Loading sandbox from {:?}", data_dir);
            storage.load()?
        } else {
            println!("🆕 No deployment found, using an empty sandbox (run `deploy` first)");
            Snapshot::new(MockHost::new(MockHostConfig::default()))
        };

        Ok(Self { snapshot, storage })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.snapshot)?;
        Ok(())
    }
}

fn open_storage(data_dir: &PathBuf) -> CliResult<Storage> {
    let config = SandboxConfig {
        data_dir: data_dir.clone(),
        ..Default::default()
    };
    Ok(Storage::new(config)?)
}

/// Parameters of a fresh deployment
#[derive(Debug, Clone)]
pub struct DeployParams {
    pub contract_id: String,
    pub owner_id: String,
    pub rate: u128,
    pub total_supply: u128,
    pub decimals: u8,
    pub balance: u128,
    pub byte_cost: u128,
    pub force: bool,
}

/// Deploy and initialize the token contract in a new sandbox
pub fn cmd_deploy(data_dir: &PathBuf, params: &DeployParams) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() && !params.force {
        println!("⚠️  Sandbox already exists at {:?}", data_dir);
        println!("   Use --force to redeploy (this will discard the current ledger)");
        return Ok(());
    }

    let contract_id = parse_account_id(&params.contract_id)?;
    let config = MockHostConfig {
        current_account_id: contract_id.clone(),
        initial_balance: U128(params.balance),
        storage_byte_cost: U128(params.byte_cost),
        ..Default::default()
    };
    let mut host = MockHost::new(config);

    let args = json!({
        "owner_id": params.owner_id,
        "rate": U128(params.rate),
        "total_supply": U128(params.total_supply),
        "decimals": params.decimals,
    })
    .to_string();
    let context = ExecutionContext::direct(contract_id.clone());
    let outcome = host.call(context.clone(), |h| dispatch(h, "init", args.as_bytes()));

    if let Err(e) = &outcome.result {
        println!("❌ Deployment failed: {}", e);
        return Ok(());
    }

    let mut snapshot = Snapshot::new(host);
    let entry = JournalEntry::new("init", &context, &outcome, snapshot.host.state_root());
    snapshot.journal.record(entry);
    storage.save(&snapshot)?;

    println!("✅ Token deployed!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   📜 Contract: {}", contract_id);
    println!("   👤 Owner: {}", params.owner_id);
    println!("   💱 Rate: {} per token", params.rate);
    println!("   🪙 Supply: {}", params.total_supply);
    println!("   🌳 State root: {}", snapshot.host.state_root());

    Ok(())
}

/// Call a contract method
pub fn cmd_call(
    state: &mut AppState,
    method: &str,
    args: &str,
    caller: &str,
    signer: Option<&str>,
    deposit: u128,
) -> CliResult<()> {
    let predecessor = parse_account_id(caller)?;
    let signer = match signer {
        Some(signer) => parse_account_id(signer)?,
        None => predecessor.clone(),
    };
    let context = ExecutionContext::relayed(signer, predecessor).with_deposit(deposit);

    let host = &mut state.snapshot.host;
    let outcome = host.call(context.clone(), |h| dispatch(h, method, args.as_bytes()));

    match &outcome.result {
        Ok(bytes) => {
            println!("✅ {} succeeded", method);
            println!("   Result: {}", String::from_utf8_lossy(bytes));
        }
        Err(e) => {
            println!("❌ {} failed: {}", method, e);
            println!("   State rolled back, deposit returned to caller");
        }
    }

    if !outcome.logs.is_empty() {
        println!("\n📜 Logs:");
        for line in &outcome.logs {
            println!("   {}", line);
        }
    }

    if !outcome.receipts.is_empty() {
        println!("\n📨 Receipts:");
        for receipt in &outcome.receipts {
            println!("   {}", describe_receipt(receipt));
        }
    }

    let entry = JournalEntry::new(method, &context, &outcome, host.state_root());
    state.snapshot.journal.record(entry);
    state.save()?;

    Ok(())
}

/// Call a read-only method
pub fn cmd_view(state: &AppState, method: &str, args: &str) -> CliResult<()> {
    let result = view(&state.snapshot.host, method, args.as_bytes())?;
    let value: serde_json::Value = serde_json::from_slice(&result)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Show sandbox and ledger state
pub fn cmd_state(state: &AppState) -> CliResult<()> {
    let host = &state.snapshot.host;

    println!("📊 Sandbox State");
    println!("   ├─ Contract: {}", host.current_account_id());
    println!("   ├─ Native balance: {}", host.account_balance());
    println!("   ├─ Storage usage: {} bytes", host.storage_usage());
    println!("   ├─ Byte cost: {}", host.storage_byte_cost());
    println!("   ├─ Records: {}", host.record_count());
    println!("   └─ State root: {}", host.state_root());

    match FtContract::load(host)? {
        Some(contract) => {
            let metadata = contract.ft_metadata();
            println!("\n🪙 {} ({})", metadata.name, metadata.symbol);
            println!("   ├─ Owner: {}", contract.owner_id);
            println!("   ├─ Total supply: {}", contract.ft_total_supply().0);
            println!("   ├─ Rate: {}", contract.ft_rate().0);
            println!("   └─ Decimals: {}", metadata.decimals);
        }
        None => println!("\n⚠️  Contract not initialized"),
    }

    let stats = state.storage.stats()?;
    println!("\n💾 Storage");
    println!("   ├─ Data directory: {:?}", stats.data_dir);
    println!("   ├─ Snapshot size: {} bytes", stats.file_size);
    println!("   └─ Backups: {}", stats.backup_count);

    Ok(())
}

/// Show recent calls
pub fn cmd_history(state: &AppState, count: usize) -> CliResult<()> {
    let journal = &state.snapshot.journal;

    if journal.is_empty() {
        println!("📭 No calls recorded");
        return Ok(());
    }

    println!("🕘 Last {} of {} call(s):", count.min(journal.len()), journal.len());
    for entry in journal.recent(count) {
        let status = if entry.success { "✅" } else { "❌" };
        println!(
            "\n{} {} by {} (signer {}, deposit {})",
            status, entry.method, entry.predecessor_id, entry.signer_id, entry.attached_deposit.0
        );
        println!("   ├─ At: {}", entry.executed_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("   ├─ Output: {}", entry.output);
        println!("   └─ State root: {}", &entry.state_root[..16.min(entry.state_root.len())]);
    }

    Ok(())
}

/// Restore the sandbox from a backup
pub fn cmd_restore(state: &mut AppState, backup: usize) -> CliResult<()> {
    let available = state.storage.list_backups();
    if !available.contains(&backup) {
        println!("❌ Backup {} not found (available: {:?})", backup, available);
        return Ok(());
    }

    state.snapshot = state.storage.restore_backup(backup)?;
    state.save()?;

    println!("♻️  Restored backup {}", backup);
    println!("   State root: {}", state.snapshot.host.state_root());
    Ok(())
}

/// Export sandbox to file
pub fn cmd_export(state: &AppState, path: &PathBuf) -> CliResult<()> {
    crate::storage::save_to_file(&state.snapshot, path)?;
    println!("📦 Sandbox exported to {:?}", path);
    Ok(())
}

/// Import sandbox from file
pub fn cmd_import(state: &mut AppState, path: &PathBuf) -> CliResult<()> {
    let snapshot = crate::storage::load_from_file(path)?;

    if let Err(e) = FtContract::load(&snapshot.host) {
        println!("❌ Imported sandbox has a corrupt contract state: {}", e);
        return Ok(());
    }

    state.snapshot = snapshot;
    state.save()?;

    println!("📥 Sandbox imported from {:?}", path);
    println!("   Records: {}", state.snapshot.host.record_count());

    Ok(())
}

fn describe_receipt(receipt: &PromiseAction) -> String {
    match receipt {
        PromiseAction::Transfer {
            receiver_id,
            amount,
        } => format!("transfer {} to {}", amount.0, receiver_id),
        PromiseAction::FunctionCall {
            receiver_id,
            method_name,
            args,
            deposit,
            gas,
        } => format!(
            "call {}.{}({}) deposit {} gas {}",
            receiver_id, method_name, args, deposit.0, gas
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deploy_params() -> DeployParams {
        DeployParams {
            contract_id: "ft.ptit.testnet".to_string(),
            owner_id: "owner.near".to_string(),
            rate: 100,
            total_supply: 1_000,
            decimals: 0,
            balance: 100 * crate::host::mock::ONE_NEAR,
            byte_cost: crate::host::mock::DEFAULT_STORAGE_BYTE_COST,
            force: false,
        }
    }

    #[test]
    fn test_deploy_then_call() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        cmd_deploy(&data_dir, &deploy_params()).unwrap();
        let mut state = AppState::new(data_dir.clone()).unwrap();
        assert_eq!(state.snapshot.journal.len(), 1);

        cmd_call(
            &mut state,
            "ft_update_rate",
            r#"{"rate":"5"}"#,
            "ft.ptit.testnet",
            None,
            0,
        )
        .unwrap();

        let reloaded = AppState::new(data_dir).unwrap();
        let contract = FtContract::load(&reloaded.snapshot.host).unwrap().unwrap();
        assert_eq!(contract.rate, 5);
        assert_eq!(reloaded.snapshot.journal.len(), 2);
    }

    #[test]
    fn test_failed_call_is_journaled() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        cmd_deploy(&data_dir, &deploy_params()).unwrap();
        let mut state = AppState::new(data_dir).unwrap();
        let root_before = state.snapshot.host.state_root();

        cmd_call(&mut state, "ft_mint", r#"{"amount":"1"}"#, "alice.near", None, 0).unwrap();

        let last = state.snapshot.journal.recent(1).next().unwrap();
        assert!(!last.success);
        assert_eq!(state.snapshot.host.state_root(), root_before);
    }

    #[test]
    fn test_deploy_refuses_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        cmd_deploy(&data_dir, &deploy_params()).unwrap();
        let mut other = deploy_params();
        other.total_supply = 5;
        cmd_deploy(&data_dir, &other).unwrap();

        let state = AppState::new(data_dir).unwrap();
        let contract = FtContract::load(&state.snapshot.host).unwrap().unwrap();
        assert_eq!(contract.total_supply, 1_000);
    }
}
