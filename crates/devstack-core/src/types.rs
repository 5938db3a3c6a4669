//! Closed option sets for stack initialization.
//!
//! Every user-selectable option (database, blockchain, token providers,
//! release channel) is a closed enum with an explicit list of valid tokens.
//! Values are only ever produced by [`resolve`] or
//! [`BlockchainSelection::from_strings`], so anything holding one of these
//! types holds a valid member of its set.

use serde::{Deserialize, Serialize};

use crate::error::{DevstackError, Result};

/// A closed set of options selectable by a token string.
pub trait Selection: Copy + Sized + 'static {
    /// Category name used in error messages (e.g. "database").
    const CATEGORY: &'static str;

    /// Every member of the set, in the order they are listed to users.
    const ALL: &'static [Self];

    /// The token that selects this value.
    fn as_str(&self) -> &'static str;

    /// The tokens of every member, in declaration order.
    fn valid_tokens() -> Vec<&'static str> {
        Self::ALL.iter().map(Selection::as_str).collect()
    }
}

/// Resolve a raw string against the closed set `T`.
///
/// Matching is exact and case-sensitive.
pub fn resolve<T: Selection>(input: &str) -> Result<T> {
    T::ALL
        .iter()
        .copied()
        .find(|value| value.as_str() == input)
        .ok_or_else(|| DevstackError::unknown_option(T::CATEGORY, input, T::valid_tokens()))
}

/// Resolve a list of raw strings against `T`, one by one.
///
/// Order and duplicates are preserved; the first unknown token fails the list.
pub fn resolve_all<T, S>(inputs: &[S]) -> Result<Vec<T>>
where
    T: Selection,
    S: AsRef<str>,
{
    inputs.iter().map(|s| resolve::<T>(s.as_ref())).collect()
}

macro_rules! impl_display_via_token {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

/// Database backing each member's core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Database {
    /// Embedded SQLite file per member
    #[default]
    #[serde(rename = "sqlite3")]
    Sqlite3,
    /// PostgreSQL container per member
    #[serde(rename = "postgres")]
    Postgres,
}

impl Selection for Database {
    const CATEGORY: &'static str = "database";
    const ALL: &'static [Self] = &[Self::Sqlite3, Self::Postgres];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite3 => "sqlite3",
            Self::Postgres => "postgres",
        }
    }
}

/// Blockchain network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockchainProvider {
    #[default]
    Ethereum,
    /// Hyperledger Fabric
    Fabric,
    /// Corda (not usable yet)
    Corda,
}

impl BlockchainProvider {
    /// Node implementation used when none is given explicitly.
    pub fn default_node(&self) -> BlockchainNodeProvider {
        match self {
            Self::Ethereum => BlockchainNodeProvider::Geth,
            Self::Fabric => BlockchainNodeProvider::Fabric,
            Self::Corda => BlockchainNodeProvider::Corda,
        }
    }

    /// Returns false for providers that have no token layer yet.
    pub fn supports_tokens(&self) -> bool {
        !matches!(self, Self::Fabric)
    }
}

impl Selection for BlockchainProvider {
    const CATEGORY: &'static str = "blockchain provider";
    const ALL: &'static [Self] = &[Self::Ethereum, Self::Fabric, Self::Corda];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Fabric => "fabric",
            Self::Corda => "corda",
        }
    }
}

/// Node implementation running the blockchain for a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlockchainNodeProvider {
    /// go-ethereum
    #[default]
    Geth,
    /// Hyperledger Besu
    Besu,
    /// Pre-existing node reached over JSON-RPC
    RemoteRpc,
    Fabric,
    Corda,
}

impl Selection for BlockchainNodeProvider {
    const CATEGORY: &'static str = "blockchain node";
    const ALL: &'static [Self] = &[
        Self::Geth,
        Self::Besu,
        Self::RemoteRpc,
        Self::Fabric,
        Self::Corda,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Geth => "geth",
            Self::Besu => "besu",
            Self::RemoteRpc => "remote-rpc",
            Self::Fabric => "fabric",
            Self::Corda => "corda",
        }
    }
}

/// A supported (provider, node) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockchainSelection {
    provider: BlockchainProvider,
    node: BlockchainNodeProvider,
}

impl BlockchainSelection {
    /// Every supported combination.
    pub const SUPPORTED: &'static [BlockchainSelection] = &[
        Self::pair(BlockchainProvider::Ethereum, BlockchainNodeProvider::Geth),
        Self::pair(BlockchainProvider::Ethereum, BlockchainNodeProvider::Besu),
        Self::pair(BlockchainProvider::Ethereum, BlockchainNodeProvider::RemoteRpc),
        Self::pair(BlockchainProvider::Fabric, BlockchainNodeProvider::Fabric),
        Self::pair(BlockchainProvider::Corda, BlockchainNodeProvider::Corda),
    ];

    const fn pair(provider: BlockchainProvider, node: BlockchainNodeProvider) -> Self {
        Self { provider, node }
    }

    /// Resolve a provider string and optional node string jointly.
    ///
    /// Without a node string the provider's default node is used. An unknown
    /// provider fails listing the providers. An unknown node, or a pair that is
    /// not in [`Self::SUPPORTED`], fails listing the valid pairings.
    pub fn from_strings(provider: &str, node: Option<&str>) -> Result<Self> {
        let resolved_provider = resolve::<BlockchainProvider>(provider)?;

        let pairing = match node {
            Some(node) => format!("{provider}/{node}"),
            None => provider.to_string(),
        };
        let unsupported = || {
            DevstackError::unknown_option(
                "blockchain provider/node pairing",
                pairing.clone(),
                Self::valid_pairings(),
            )
        };

        let resolved_node = match node {
            Some(node) => resolve::<BlockchainNodeProvider>(node).map_err(|_| unsupported())?,
            None => resolved_provider.default_node(),
        };

        let selection = Self::pair(resolved_provider, resolved_node);
        if Self::SUPPORTED.contains(&selection) {
            Ok(selection)
        } else {
            Err(unsupported())
        }
    }

    /// Supported pairings rendered as `provider/node`.
    pub fn valid_pairings() -> Vec<String> {
        Self::SUPPORTED.iter().map(ToString::to_string).collect()
    }

    pub fn provider(&self) -> BlockchainProvider {
        self.provider
    }

    pub fn node(&self) -> BlockchainNodeProvider {
        self.node
    }

    /// Reverse lookup back to the token pair.
    pub fn as_strs(&self) -> (&'static str, &'static str) {
        (self.provider.as_str(), self.node.as_str())
    }
}

impl Default for BlockchainSelection {
    fn default() -> Self {
        Self::pair(BlockchainProvider::Ethereum, BlockchainNodeProvider::Geth)
    }
}

impl std::fmt::Display for BlockchainSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider.as_str(), self.node.as_str())
    }
}

/// Token connector deployed alongside each member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenProvider {
    Erc1155,
    /// Combined ERC-20 / ERC-721 connector (the default bundle)
    Erc20Erc721,
}

impl TokenProvider {
    /// Token providers used when none are selected.
    pub const DEFAULT_BUNDLE: &'static [TokenProvider] = &[TokenProvider::Erc20Erc721];
}

impl Selection for TokenProvider {
    const CATEGORY: &'static str = "token provider";
    const ALL: &'static [Self] = &[Self::Erc1155, Self::Erc20Erc721];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Erc1155 => "erc1155",
            Self::Erc20Erc721 => "erc20_erc721",
        }
    }
}

/// Release channel the component versions are taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseChannel {
    #[default]
    Stable,
    Head,
    Alpha,
    Beta,
    Rc,
}

impl Selection for ReleaseChannel {
    const CATEGORY: &'static str = "release channel";
    const ALL: &'static [Self] = &[Self::Stable, Self::Head, Self::Alpha, Self::Beta, Self::Rc];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Head => "head",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Rc => "rc",
        }
    }
}

impl_display_via_token!(
    Database,
    BlockchainProvider,
    BlockchainNodeProvider,
    TokenProvider,
    ReleaseChannel,
);
