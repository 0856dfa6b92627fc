//! FT Sandbox CLI Application
//!
//! A command-line interface for deploying and calling the token contract
//! against a persistent local host.

use clap::{Parser, Subcommand};
use ft_ledger::cli::{self, AppState, DeployParams};
use ft_ledger::host::mock::{DEFAULT_CONTRACT_ID, DEFAULT_STORAGE_BYTE_COST, ONE_NEAR};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ft-sandbox")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A fungible token ledger with a local sandbox", long_about = None)]
struct Cli {
    /// Data directory for sandbox storage
    #[arg(short, long, default_value = ".ft_sandbox")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy and initialize the token contract
    Deploy {
        /// Account the contract is deployed to
        #[arg(long, default_value = DEFAULT_CONTRACT_ID)]
        contract_id: String,

        /// Owner recorded in the contract state
        #[arg(short, long)]
        owner: String,

        /// Native units charged per token
        #[arg(short, long)]
        rate: u128,

        /// Tokens minted to the contract account
        #[arg(short, long)]
        supply: u128,

        /// Token decimals
        #[arg(long, default_value = "0")]
        decimals: u8,

        /// Native balance of the contract account (default 100 NEAR)
        #[arg(long)]
        balance: Option<u128>,

        /// Price of one storage byte
        #[arg(long)]
        byte_cost: Option<u128>,

        /// Discard an existing sandbox
        #[arg(long)]
        force: bool,
    },

    /// Call a contract method
    Call {
        /// Method name
        method: String,

        /// JSON arguments
        #[arg(short, long, default_value = "{}")]
        args: String,

        /// Immediate caller (predecessor)
        #[arg(short, long)]
        caller: String,

        /// Transaction signer (defaults to the caller)
        #[arg(short, long)]
        signer: Option<String>,

        /// Native units attached to the call
        #[arg(long, default_value = "0")]
        deposit: u128,
    },

    /// Call a read-only method
    View {
        /// Method name
        method: String,

        /// JSON arguments
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Display sandbox and ledger state
    State,

    /// Show recent calls
    History {
        /// Number of calls to show
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Restore the sandbox from a backup
    Restore {
        /// Backup index (0 is the most recent)
        #[arg(short, long, default_value = "0")]
        backup: usize,
    },

    /// Export sandbox to file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import sandbox from file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle deploy separately (creates the state)
    if let Commands::Deploy {
        contract_id,
        owner,
        rate,
        supply,
        decimals,
        balance,
        byte_cost,
        force,
    } = &cli.command
    {
        let params = DeployParams {
            contract_id: contract_id.clone(),
            owner_id: owner.clone(),
            rate: *rate,
            total_supply: *supply,
            decimals: *decimals,
            balance: balance.unwrap_or(100 * ONE_NEAR),
            byte_cost: byte_cost.unwrap_or(DEFAULT_STORAGE_BYTE_COST),
            force: *force,
        };
        return cli::cmd_deploy(&cli.data_dir, &params);
    }

    // Initialize application state
    let mut state = AppState::new(cli.data_dir.clone())?;

    // Process commands
    match cli.command {
        Commands::Deploy { .. } => unreachable!(),

        Commands::Call {
            method,
            args,
            caller,
            signer,
            deposit,
        } => {
            cli::cmd_call(
                &mut state,
                &method,
                &args,
                &caller,
                signer.as_deref(),
                deposit,
            )?;
        }

        Commands::View { method, args } => {
            cli::cmd_view(&state, &method, &args)?;
        }

        Commands::State => {
            cli::cmd_state(&state)?;
        }

        Commands::History { count } => {
            cli::cmd_history(&state, count)?;
        }

        Commands::Restore { backup } => {
            cli::cmd_restore(&mut state, backup)?;
        }

        Commands::Export { output } => {
            cli::cmd_export(&state, &output)?;
        }

        Commands::Import { input } => {
            cli::cmd_import(&mut state, &input)?;
        }
    }

    Ok(())
}
