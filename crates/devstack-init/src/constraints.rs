//! Rules spanning more than one option.
//!
//! These run after each option has resolved on its own. Most of them fail;
//! the token provider rule normalizes instead, because no token layer exists
//! for some providers yet and the user's token selection simply does not
//! apply there.

use std::path::Path;

use tracing::warn;

use devstack_core::types::{
    BlockchainNodeProvider, BlockchainProvider, BlockchainSelection, TokenProvider, resolve_all,
};
use devstack_core::{DevstackError, Result};

/// Reject providers that resolve but cannot be used yet.
pub fn check_provider_supported(blockchain: &BlockchainSelection) -> Result<()> {
    match blockchain.provider() {
        BlockchainProvider::Corda => Err(DevstackError::UnsupportedProvider {
            provider: blockchain.provider().to_string(),
        }),
        BlockchainProvider::Ethereum | BlockchainProvider::Fabric => Ok(()),
    }
}

/// Resolve the token providers that apply to `provider`.
///
/// Providers without token support always get an empty list, whatever was
/// requested; the requested strings are not even resolved in that case.
pub fn resolve_token_providers<S: AsRef<str>>(
    provider: BlockchainProvider,
    requested: &[S],
) -> Result<Vec<TokenProvider>> {
    if !provider.supports_tokens() {
        if !requested.is_empty() {
            warn!(
                %provider,
                requested = requested.len(),
                "token providers are not available for this blockchain, clearing selection"
            );
        }
        return Ok(Vec::new());
    }
    resolve_all(requested)
}

/// The remote-rpc node has nothing to run locally, so it needs a URL.
pub fn check_remote_node(blockchain: &BlockchainSelection, remote_node_url: Option<&str>) -> Result<()> {
    let missing = remote_node_url.is_none_or(|url| url.trim().is_empty());
    if blockchain.node() == BlockchainNodeProvider::RemoteRpc && missing {
        return Err(DevstackError::MissingRemoteNodeUrl {
            node: blockchain.node().to_string(),
        });
    }
    Ok(())
}

/// A manifest override must point at a file.
pub fn check_manifest(manifest_path: Option<&Path>) -> Result<()> {
    match manifest_path {
        Some(path) if !path.is_file() => Err(DevstackError::ManifestNotFound {
            path: path.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

/// Parse and check the member count.
///
/// The count must be a positive integer and strictly greater than the number
/// of external processes, so at least one managed member is left to deploy
/// contracts.
pub fn validate_member_count(input: &str, external_processes: u32) -> Result<u32> {
    let parsed: i64 = input
        .parse()
        .map_err(|_| DevstackError::invalid_count(input, "invalid number"))?;
    if parsed <= 0 {
        return Err(DevstackError::invalid_count(
            input,
            "number of members must be greater than zero",
        ));
    }
    let members = u32::try_from(parsed)
        .map_err(|_| DevstackError::invalid_count(input, "number of members is too large"))?;

    if external_processes >= members {
        return Err(DevstackError::ExternalProcessesExceedMembers {
            external: external_processes,
            members,
        });
    }
    Ok(members)
}
