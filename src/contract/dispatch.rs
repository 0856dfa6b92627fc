//! Entry-point dispatch
//!
//! Maps wire method names to ledger operations: decodes the JSON argument
//! object, applies the method's guards, runs the operation and encodes the
//! JSON result. State is loaded before and saved after every call method;
//! views never write.

use crate::contract::guards::{
    require_cross_contract_call, require_no_deposit, require_one_yocto, require_private_caller,
};
use crate::contract::state::FtContract;
use crate::host::{Host, HostError};
use crate::token::{parse_account_id, FtMetadata, TokenError, U128};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Methods that only read state
pub const VIEW_METHODS: &[&str] = &[
    "ft_total_supply",
    "ft_balance_of",
    "ft_metadata",
    "ft_rate",
    "ft_registration_of",
];

/// Methods that may change state
pub const CALL_METHODS: &[&str] = &[
    "init",
    "ft_register",
    "storage_deposit",
    "ft_on_register",
    "buy_ft",
    "on_buy_ft",
    "ft_transfer",
    "ft_transfer_call",
    "ft_on_purchase",
    "ft_on_refund",
    "ft_mint",
    "ft_update_rate",
    "clean",
];

/// Dispatch errors
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("The contract is not initialized")]
    NotInitialized,
    #[error("The contract has already been initialized")]
    AlreadyInitialized,
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("Method {0} is not a view method")]
    NotAView(String),
    #[error("Invalid arguments for {method}: {source}")]
    InvalidArgs {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode result: {0}")]
    EncodeResult(#[from] serde_json::Error),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Host(#[from] HostError),
}

pub fn is_view_method(method: &str) -> bool {
    VIEW_METHODS.contains(&method)
}

// =============================================================================
// Arguments
// =============================================================================

// Every argument object rejects keys it does not declare.

/// Methods without parameters still take an (empty) argument object
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct InitArgs {
    owner_id: String,
    rate: U128,
    total_supply: U128,
    #[serde(default)]
    decimals: Option<u8>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegisterArgs {
    #[serde(default)]
    account_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TransferArgs {
    receiver_id: String,
    amount: U128,
    #[serde(default)]
    memo: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TransferCallArgs {
    receiver_id: String,
    amount: U128,
    #[serde(default)]
    memo: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SettlementArgs {
    amount: U128,
    #[serde(default)]
    memo: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AmountArgs {
    amount: U128,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RateArgs {
    rate: U128,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AccountArgs {
    account_id: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CleanArgs {
    account_ids: Vec<String>,
}

fn parse_args<T: DeserializeOwned>(method: &str, args: &[u8]) -> Result<T, ContractError> {
    let args = if args.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        args
    };
    serde_json::from_slice(args).map_err(|source| ContractError::InvalidArgs {
        method: method.to_string(),
        source,
    })
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ContractError> {
    Ok(serde_json::to_vec(value)?)
}

fn load<H: Host + ?Sized>(host: &H) -> Result<FtContract, ContractError> {
    FtContract::load(host)?.ok_or(ContractError::NotInitialized)
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run one entry point against the host and return its JSON result
pub fn dispatch<H: Host + ?Sized>(
    host: &mut H,
    method: &str,
    args: &[u8],
) -> Result<Vec<u8>, ContractError> {
    if is_view_method(method) {
        return view(host, method, args);
    }
    if method == "init" {
        return init(host, args);
    }

    let mut contract = load(host)?;
    let result = match method {
        "ft_register" => {
            let args: RegisterArgs = parse_args(method, args)?;
            encode(&contract.ft_register(host, args.account_id.as_deref())?)?
        }
        "storage_deposit" => {
            let args: RegisterArgs = parse_args(method, args)?;
            let payer_id = host.predecessor_account_id().clone();
            encode(&contract.register(host, &payer_id, args.account_id.as_deref())?)?
        }
        "ft_on_register" => {
            let NoArgs {} = parse_args(method, args)?;
            let payer_id = host.predecessor_account_id().clone();
            let account_id = host.signer_account_id().clone();
            encode(&contract.register(host, &payer_id, Some(account_id.as_str()))?)?
        }
        "buy_ft" => {
            let NoArgs {} = parse_args(method, args)?;
            encode(&contract.buy_ft(host)?)?
        }
        "on_buy_ft" => {
            let NoArgs {} = parse_args(method, args)?;
            encode(&contract.on_buy_ft(host)?)?
        }
        "ft_transfer" => {
            require_private_caller(host, method)?;
            require_one_yocto(host)?;
            let args: TransferArgs = parse_args(method, args)?;
            let sender_id = host.predecessor_account_id().clone();
            let receiver_id = parse_account_id(&args.receiver_id)?;
            contract.internal_transfer(
                host,
                &sender_id,
                &receiver_id,
                args.amount.0,
                args.memo.as_deref(),
            )?;
            encode(&())?
        }
        "ft_transfer_call" => {
            require_private_caller(host, method)?;
            require_one_yocto(host)?;
            let args: TransferCallArgs = parse_args(method, args)?;
            let sender_id = host.predecessor_account_id().clone();
            let receiver_id = parse_account_id(&args.receiver_id)?;
            contract.internal_transfer_call(
                host,
                &sender_id,
                &receiver_id,
                args.amount.0,
                args.memo.as_deref(),
                args.msg.as_deref(),
            )?;
            encode(&())?
        }
        "ft_on_purchase" => {
            require_cross_contract_call(host)?;
            require_one_yocto(host)?;
            let args: SettlementArgs = parse_args(method, args)?;
            encode(&contract.ft_on_purchase(host, args.amount.0, args.memo.as_deref())?)?
        }
        "ft_on_refund" => {
            require_cross_contract_call(host)?;
            require_one_yocto(host)?;
            let args: SettlementArgs = parse_args(method, args)?;
            encode(&contract.ft_on_refund(host, args.amount.0, args.memo.as_deref())?)?
        }
        "ft_mint" => {
            require_private_caller(host, method)?;
            require_no_deposit(host, method)?;
            let args: AmountArgs = parse_args(method, args)?;
            let owner_id = host.current_account_id().clone();
            contract.mint(host, &owner_id, args.amount.0)?;
            encode(&())?
        }
        "ft_update_rate" => {
            require_private_caller(host, method)?;
            require_no_deposit(host, method)?;
            let args: RateArgs = parse_args(method, args)?;
            contract.update_rate(args.rate.0)?;
            encode(&())?
        }
        "clean" => {
            require_private_caller(host, method)?;
            require_no_deposit(host, method)?;
            let args: CleanArgs = parse_args(method, args)?;
            let account_ids = args
                .account_ids
                .iter()
                .map(|id| parse_account_id(id))
                .collect::<Result<Vec<_>, _>>()?;
            encode(&contract.remove_all(host, &account_ids)?)?
        }
        _ => return Err(ContractError::UnknownMethod(method.to_string())),
    };

    contract.save(host)?;
    Ok(result)
}

/// Run a read-only entry point
pub fn view<H: Host + ?Sized>(host: &H, method: &str, args: &[u8]) -> Result<Vec<u8>, ContractError> {
    if !is_view_method(method) {
        return Err(if CALL_METHODS.contains(&method) {
            ContractError::NotAView(method.to_string())
        } else {
            ContractError::UnknownMethod(method.to_string())
        });
    }

    let contract = load(host)?;
    match method {
        "ft_total_supply" => {
            let NoArgs {} = parse_args(method, args)?;
            encode(&contract.ft_total_supply())
        }
        "ft_balance_of" => {
            let args: AccountArgs = parse_args(method, args)?;
            encode(&contract.ft_balance_of(host, &args.account_id)?)
        }
        "ft_metadata" => {
            let NoArgs {} = parse_args(method, args)?;
            encode(contract.ft_metadata())
        }
        "ft_rate" => {
            let NoArgs {} = parse_args(method, args)?;
            encode(&contract.ft_rate())
        }
        "ft_registration_of" => {
            let args: AccountArgs = parse_args(method, args)?;
            encode(&contract.registration_of(host, &args.account_id)?)
        }
        _ => Err(ContractError::UnknownMethod(method.to_string())),
    }
}

/// Create the ledger and mint the initial supply to the contract account
fn init<H: Host + ?Sized>(host: &mut H, args: &[u8]) -> Result<Vec<u8>, ContractError> {
    if FtContract::is_initialized(host) {
        return Err(ContractError::AlreadyInitialized);
    }
    require_no_deposit(host, "init")?;

    let args: InitArgs = parse_args("init", args)?;
    let owner_id = parse_account_id(&args.owner_id)?;
    let metadata = FtMetadata::with_decimals(args.decimals.unwrap_or(0))?;
    let mut contract = FtContract::new(owner_id, args.rate.0, metadata)?;

    let treasury_id = host.current_account_id().clone();
    contract.mint(host, &treasury_id, args.total_supply.0)?;
    contract.save(host)?;

    log::info!(
        "Initialized {} owned by {} (rate {}, supply {})",
        treasury_id,
        contract.owner_id,
        contract.rate,
        contract.total_supply
    );
    encode(&())
}
