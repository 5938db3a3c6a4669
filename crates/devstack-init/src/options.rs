//! The validated configuration handed to the stack manager.

use std::path::PathBuf;

use serde::Serialize;

use devstack_core::types::{BlockchainSelection, Database, ReleaseChannel, TokenProvider};

/// Ports the stack maps on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortOptions {
    /// Core API of member `i` listens on `firefly_base + i`
    pub firefly_base: u16,
    /// Services of member `i` start at `services_base + 100 * i`
    pub services_base: u16,
    pub prometheus: u16,
}

/// Optional components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub prometheus: bool,
    pub sandbox: bool,
    /// Transaction manager sidecar per member
    pub fftm: bool,
    pub multiparty: bool,
}

/// Which component versions to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseOptions {
    pub channel: ReleaseChannel,
    pub version: String,
    /// Overrides `version` when set
    pub manifest_path: Option<PathBuf>,
}

/// Blockchain-specific overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkOptions {
    pub chain_id: i64,
    pub block_period: Option<u32>,
    pub contract_address: Option<String>,
    pub remote_node_url: Option<String>,
    pub request_timeout: Option<u32>,
}

/// Extra config files merged into generated component configs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtraConfigPaths {
    pub core: Option<PathBuf>,
    pub ethconnect: Option<PathBuf>,
    pub fftm: Option<PathBuf>,
}

/// A fully validated stack configuration.
///
/// Only the assembler constructs this, and every field is read-only
/// afterwards. The org and node name lists always have exactly
/// `member_count` entries, and `external_processes < member_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedInitOptions {
    stack_name: String,
    member_count: u32,
    org_names: Vec<String>,
    node_names: Vec<String>,
    database: Database,
    blockchain: BlockchainSelection,
    token_providers: Vec<TokenProvider>,
    release: ReleaseOptions,
    external_processes: u32,
    ports: PortOptions,
    features: FeatureFlags,
    network: NetworkOptions,
    extra_config: ExtraConfigPaths,
}

/// Values resolved by the assembler, gathered before the final build.
pub(crate) struct ResolvedParts {
    pub stack_name: String,
    pub members: Vec<(String, String)>,
    pub database: Database,
    pub blockchain: BlockchainSelection,
    pub token_providers: Vec<TokenProvider>,
    pub release: ReleaseOptions,
    pub external_processes: u32,
    pub ports: PortOptions,
    pub features: FeatureFlags,
    pub network: NetworkOptions,
    pub extra_config: ExtraConfigPaths,
}

impl ValidatedInitOptions {
    pub(crate) fn from_parts(parts: ResolvedParts) -> Self {
        let (org_names, node_names): (Vec<_>, Vec<_>) = parts.members.into_iter().unzip();
        Self {
            stack_name: parts.stack_name,
            member_count: org_names.len() as u32,
            org_names,
            node_names,
            database: parts.database,
            blockchain: parts.blockchain,
            token_providers: parts.token_providers,
            release: parts.release,
            external_processes: parts.external_processes,
            ports: parts.ports,
            features: parts.features,
            network: parts.network,
            extra_config: parts.extra_config,
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    pub fn member_count(&self) -> u32 {
        self.member_count
    }

    pub fn org_names(&self) -> &[String] {
        &self.org_names
    }

    pub fn node_names(&self) -> &[String] {
        &self.node_names
    }

    /// (org name, node name) per member, in member order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &str)> {
        self.org_names
            .iter()
            .zip(&self.node_names)
            .map(|(org, node)| (org.as_str(), node.as_str()))
    }

    pub fn database(&self) -> Database {
        self.database
    }

    pub fn blockchain(&self) -> BlockchainSelection {
        self.blockchain
    }

    pub fn token_providers(&self) -> &[TokenProvider] {
        &self.token_providers
    }

    pub fn release(&self) -> &ReleaseOptions {
        &self.release
    }

    /// Members whose core runs outside the managed stack.
    pub fn external_processes(&self) -> u32 {
        self.external_processes
    }

    pub fn ports(&self) -> &PortOptions {
        &self.ports
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    pub fn network(&self) -> &NetworkOptions {
        &self.network
    }

    pub fn extra_config(&self) -> &ExtraConfigPaths {
        &self.extra_config
    }
}
