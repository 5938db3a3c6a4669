//! Unvalidated init input.

use std::path::PathBuf;

use devstack_core::types::{Selection, TokenProvider};

/// Default base port of the core API (1 added per member).
pub const DEFAULT_FIREFLY_BASE_PORT: u16 = 5000;
/// Default base port of member services (100 added per member).
pub const DEFAULT_SERVICES_BASE_PORT: u16 = 5100;
/// Default port of the shared Prometheus server.
pub const DEFAULT_PROMETHEUS_PORT: u16 = 9090;
/// Default chain id, also used as the network id.
pub const DEFAULT_CHAIN_ID: i64 = 2021;

/// Everything the user asked for, exactly as given.
///
/// Built once from parsed arguments and then moved into the assembler; nothing
/// in here has been checked yet. Defaults match the CLI defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInitRequest {
    /// First positional argument
    pub stack_name: Option<String>,
    /// Second positional argument, kept as text so bad input can be reported verbatim
    pub member_count: Option<String>,

    pub database: String,
    pub blockchain_provider: String,
    /// Node implementation; `None` picks the provider's default node
    pub blockchain_node: Option<String>,
    pub token_providers: Vec<String>,
    pub release_channel: String,

    /// Release version of the stack components (e.g. "latest", "v1.2.0")
    pub release_version: String,
    /// Manifest with per-component versions; overrides `release_version`
    pub manifest_path: Option<PathBuf>,

    /// Ask for every org and node name instead of using `org_<n>` / `node_<n>`
    pub prompt_names: bool,

    pub firefly_base_port: u16,
    pub services_base_port: u16,
    /// Members whose core runs outside the managed stack
    pub external_processes: u32,

    pub prometheus_enabled: bool,
    pub prometheus_port: u16,
    pub sandbox_enabled: bool,
    pub fftm_enabled: bool,
    pub multiparty_enabled: bool,

    pub extra_core_config: Option<PathBuf>,
    pub extra_ethconnect_config: Option<PathBuf>,
    pub extra_fftm_config: Option<PathBuf>,

    /// Block period in seconds; `None` leaves it to the blockchain provider
    pub block_period: Option<u32>,
    /// Use this contract instead of deploying one
    pub contract_address: Option<String>,
    /// Pre-existing node, required by the `remote-rpc` node
    pub remote_node_url: Option<String>,
    pub chain_id: i64,
    /// Request timeout in seconds
    pub request_timeout: Option<u32>,
}

impl Default for RawInitRequest {
    fn default() -> Self {
        Self {
            stack_name: None,
            member_count: None,
            database: "sqlite3".to_string(),
            blockchain_provider: "ethereum".to_string(),
            blockchain_node: None,
            token_providers: TokenProvider::DEFAULT_BUNDLE
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            release_channel: "stable".to_string(),
            release_version: "latest".to_string(),
            manifest_path: None,
            prompt_names: false,
            firefly_base_port: DEFAULT_FIREFLY_BASE_PORT,
            services_base_port: DEFAULT_SERVICES_BASE_PORT,
            external_processes: 0,
            prometheus_enabled: false,
            prometheus_port: DEFAULT_PROMETHEUS_PORT,
            sandbox_enabled: true,
            fftm_enabled: false,
            multiparty_enabled: true,
            extra_core_config: None,
            extra_ethconnect_config: None,
            extra_fftm_config: None,
            block_period: None,
            contract_address: None,
            remote_node_url: None,
            chain_id: DEFAULT_CHAIN_ID,
            request_timeout: None,
        }
    }
}

impl RawInitRequest {
    /// Set the positional stack name.
    pub fn with_stack_name(mut self, name: impl Into<String>) -> Self {
        self.stack_name = Some(name.into());
        self
    }

    /// Set the positional member count.
    pub fn with_member_count(mut self, count: impl Into<String>) -> Self {
        self.member_count = Some(count.into());
        self
    }

    /// Set the database selection.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the blockchain provider and, optionally, its node.
    pub fn with_blockchain(mut self, provider: impl Into<String>, node: Option<&str>) -> Self {
        self.blockchain_provider = provider.into();
        self.blockchain_node = node.map(str::to_string);
        self
    }

    /// Replace the token providers.
    pub fn with_token_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.token_providers = providers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the release channel.
    pub fn with_release_channel(mut self, channel: impl Into<String>) -> Self {
        self.release_channel = channel.into();
        self
    }

    /// Set the number of externally managed cores.
    pub fn with_external_processes(mut self, external: u32) -> Self {
        self.external_processes = external;
        self
    }

    /// Prompt for member names.
    pub fn with_prompt_names(mut self, prompt: bool) -> Self {
        self.prompt_names = prompt;
        self
    }

    /// Point at a remote node.
    pub fn with_remote_node_url(mut self, url: impl Into<String>) -> Self {
        self.remote_node_url = Some(url.into());
        self
    }

    /// Override the release with a manifest file.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }
}
