//! devstack - local multi-member development stacks
//!
//! ## Usage
//!
//! ```bash
//! # Create a stack, prompting for its name and member count
//! devstack init
//!
//! # Create a two-member stack called "alpha" with the defaults
//! devstack init alpha 2
//!
//! # Besu instead of geth, PostgreSQL instead of SQLite, custom member names
//! devstack init alpha 2 -n besu -d postgres --prompt-names
//!
//! # With verbose logging
//! devstack -v init alpha 2
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use devstack_core::{
    BlockchainNodeProvider, BlockchainProvider, Database, DevstackConfig, DevstackError, LogGuard,
    ReleaseChannel, Selection, TokenProvider, init_logging,
};
use devstack_init::request::{
    DEFAULT_CHAIN_ID, DEFAULT_FIREFLY_BASE_PORT, DEFAULT_PROMETHEUS_PORT,
    DEFAULT_SERVICES_BASE_PORT,
};
use devstack_init::{
    CreatedStack, FsStackManager, FsStackRegistry, InitOptionsAssembler, Prompter, RawInitRequest,
    StackManager,
};
use tracing::{error, info};

/// devstack - local multi-member development stacks
#[derive(Parser, Debug)]
#[command(name = "devstack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.devstack/logs/)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// devstack home directory (defaults to $DEVSTACK_HOME or ~/.devstack/)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new local dev stack
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Name of the new stack
    stack_name: Option<String>,

    /// Number of members in the network
    member_count: Option<String>,

    /// Mapped port base of the core API (1 added for each member)
    #[arg(short = 'p', long, default_value_t = DEFAULT_FIREFLY_BASE_PORT)]
    firefly_base_port: u16,

    /// Mapped port base of services (100 added for each member)
    #[arg(short = 's', long, default_value_t = DEFAULT_SERVICES_BASE_PORT)]
    services_base_port: u16,

    #[arg(
        short = 'd', long, default_value = "sqlite3",
        help = options_help::<Database>("Database type to use")
    )]
    database: String,

    #[arg(
        short = 'b', long, default_value = "ethereum",
        help = options_help::<BlockchainProvider>("Blockchain to use")
    )]
    blockchain_provider: String,

    #[arg(short = 'n', long, help = options_help::<BlockchainNodeProvider>(
        "Blockchain node type to use (defaults to the provider's node, geth for ethereum)"
    ))]
    blockchain_node: Option<String>,

    #[arg(
        short = 't', long, default_value = "erc20_erc721",
        help = options_help::<TokenProvider>("Token providers to use")
    )]
    token_providers: Vec<String>,

    /// Run this many cores outside the managed stack, useful for development and debugging
    #[arg(short = 'e', long = "external", default_value_t = 0)]
    external_processes: u32,

    /// Release version to use
    #[arg(short = 'r', long = "release", default_value = "latest")]
    release_version: String,

    /// Path to a manifest.json with the version of each component. Overrides --release
    #[arg(short = 'm', long = "manifest")]
    manifest_path: Option<PathBuf>,

    #[arg(
        long = "channel", default_value = "stable",
        help = options_help::<ReleaseChannel>("Release channel to use")
    )]
    release_channel: String,

    /// Prompt for org and node names instead of using the defaults
    #[arg(long)]
    prompt_names: bool,

    /// Enable Prometheus metrics exposition and a shared Prometheus server
    #[arg(long)]
    prometheus_enabled: bool,

    /// Port for the shared Prometheus server
    #[arg(long, default_value_t = DEFAULT_PROMETHEUS_PORT)]
    prometheus_port: u16,

    /// Start the sandbox with the stack
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
    sandbox_enabled: bool,

    /// Start a transaction manager for each node
    #[arg(long)]
    fftm_enabled: bool,

    /// Enable multiparty mode. Set to false to use gateway mode
    #[arg(long = "multiparty", default_value_t = true, num_args = 0..=1, default_missing_value = "true", action = ArgAction::Set)]
    multiparty_enabled: bool,

    /// YAML file with extra config for the core
    #[arg(long = "core-config")]
    extra_core_config: Option<PathBuf>,

    /// YAML file with extra config for ethconnect
    #[arg(long = "ethconnect-config")]
    extra_ethconnect_config: Option<PathBuf>,

    /// YAML file with extra config for the transaction manager
    #[arg(long = "fftm-config")]
    extra_fftm_config: Option<PathBuf>,

    /// Block period in seconds (defaults depend on the blockchain provider)
    #[arg(long)]
    block_period: Option<u32>,

    /// Use a pre-deployed contract instead of deploying one
    #[arg(long)]
    contract_address: Option<String>,

    /// URL of a pre-existing remote node
    #[arg(long)]
    remote_node_url: Option<String>,

    /// Chain ID (Ethereum only), also used as the network ID
    #[arg(long, default_value_t = DEFAULT_CHAIN_ID)]
    chain_id: i64,

    /// Request timeout in seconds, useful for registration on public chains
    #[arg(long)]
    request_timeout: Option<u32>,
}

/// Help text for a flag taking one of a closed set of tokens.
fn options_help<T: Selection>(what: &str) -> String {
    format!("{what}. Options are: {}", T::valid_tokens().join(", "))
}

impl From<InitArgs> for RawInitRequest {
    fn from(args: InitArgs) -> Self {
        Self {
            stack_name: args.stack_name,
            member_count: args.member_count,
            database: args.database,
            blockchain_provider: args.blockchain_provider,
            blockchain_node: args.blockchain_node,
            token_providers: args.token_providers,
            release_channel: args.release_channel,
            release_version: args.release_version,
            manifest_path: args.manifest_path,
            prompt_names: args.prompt_names,
            firefly_base_port: args.firefly_base_port,
            services_base_port: args.services_base_port,
            external_processes: args.external_processes,
            prometheus_enabled: args.prometheus_enabled,
            prometheus_port: args.prometheus_port,
            sandbox_enabled: args.sandbox_enabled,
            fftm_enabled: args.fftm_enabled,
            multiparty_enabled: args.multiparty_enabled,
            extra_core_config: args.extra_core_config,
            extra_ethconnect_config: args.extra_ethconnect_config,
            extra_fftm_config: args.extra_fftm_config,
            block_period: args.block_period,
            contract_address: args.contract_address,
            remote_node_url: args.remote_node_url,
            chain_id: args.chain_id,
            request_timeout: args.request_timeout,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match DevstackConfig::load(cli.home.clone()) {
        Ok(config) => config,
        Err(e) => {
            report(&e.into());
            return ExitCode::from(1);
        }
    };

    let _guard = match setup_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("devstack error: {:#}", e);
            report(&e);
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments and config.
fn setup_logging(cli: &Cli, config: &DevstackConfig) -> devstack_core::Result<LogGuard> {
    let log_dir = cli.log_dir.clone().unwrap_or_else(|| config.log_dir.clone());
    init_logging(log_dir, cli.verbose > 0)
}

fn run(command: Command, config: &DevstackConfig) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => run_init(args, config),
    }
}

/// Validate the init input, then create the stack.
fn run_init(args: InitArgs, config: &DevstackConfig) -> anyhow::Result<()> {
    info!(stacks_dir = %config.stacks_dir.display(), "starting init");

    let registry = FsStackRegistry::new(&config.stacks_dir);
    let manager = FsStackManager::new(&config.stacks_dir);
    let mut prompter = Prompter::stdio();

    let options = InitOptionsAssembler::new(&registry).assemble(args.into(), &mut prompter)?;
    let stack_name = options.stack_name().to_string();
    let created = manager
        .init_stack(options)
        .with_context(|| format!("failed to create stack '{stack_name}'"))?;

    print!("{}", success_message(&created));
    Ok(())
}

/// What to tell the user once a stack exists.
fn success_message(created: &CreatedStack) -> String {
    format!(
        "Stack '{name}' created!\nTo start your new stack run:\n\ndevstack start {name}\n\n\
         The configuration for this stack can be found at: {path}\n",
        name = created.name,
        path = created.artifact_path.display(),
    )
}

/// Print an error and, when there is one, a hint on how to fix it.
fn report(e: &anyhow::Error) {
    eprintln!("Error: {:#}", e);
    if let Some(guidance) = e.downcast_ref::<DevstackError>().and_then(DevstackError::guidance) {
        eprintln!("Hint: {}", guidance);
    }
}
