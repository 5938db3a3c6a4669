//! Turns a [`RawInitRequest`] into [`ValidatedInitOptions`].
//!
//! The stages run in a fixed order and each must succeed before the next
//! starts:
//!
//! 1. Resolve database and blockchain, reject unsupported providers
//! 2. Resolve token providers, cleared for providers without token support
//! 3. Resolve the release channel
//! 4. Stack name (argument or prompt)
//! 5. Member count (argument or prompt)
//! 6. Member names (prompted or defaulted)
//! 7. Build the options
//!
//! Everything that can be checked without the user is checked before the
//! first prompt, so a bad flag never costs an interactive session.

use std::io::{BufRead, Write};

use tracing::info;

use devstack_core::Result;
use devstack_core::log_init_stage;
use devstack_core::types::{BlockchainSelection, Database, ReleaseChannel, TokenProvider, resolve};

use crate::constraints::{
    check_manifest, check_provider_supported, check_remote_node, resolve_token_providers,
    validate_member_count,
};
use crate::names::{validate_member_name, validate_stack_name};
use crate::options::{
    ExtraConfigPaths, FeatureFlags, NetworkOptions, PortOptions, ReleaseOptions, ResolvedParts,
    ValidatedInitOptions,
};
use crate::prompt::Prompter;
use crate::registry::StackRegistry;
use crate::request::RawInitRequest;

/// How org and node names are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingStrategy {
    /// Ask for an org and a node name per member
    Prompted,
    /// `org_<i>` and `node_<i>`, zero-indexed
    Default,
}

impl NamingStrategy {
    pub fn from_prompt_flag(prompt_names: bool) -> Self {
        if prompt_names {
            Self::Prompted
        } else {
            Self::Default
        }
    }

    /// Produce `member_count` (org, node) name pairs.
    pub fn member_names<R: BufRead, W: Write>(
        self,
        member_count: u32,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Vec<(String, String)>> {
        match self {
            Self::Default => Ok((0..member_count)
                .map(|i| (format!("org_{i}"), format!("node_{i}")))
                .collect()),
            Self::Prompted => (0..member_count)
                .map(|i| -> Result<(String, String)> {
                    let org = prompter.ask(&format!("name for org {i}: "), validate_member_name)?;
                    let node = prompter.ask(&format!("name for node {i}: "), validate_member_name)?;
                    Ok((org, node))
                })
                .collect(),
        }
    }
}

/// Option selections resolved before any prompting.
struct Selections {
    database: Database,
    blockchain: BlockchainSelection,
    token_providers: Vec<TokenProvider>,
    release_channel: ReleaseChannel,
}

/// Builds validated init options, checking stack names against a registry.
pub struct InitOptionsAssembler<'a, G: StackRegistry + ?Sized> {
    registry: &'a G,
}

impl<'a, G: StackRegistry + ?Sized> InitOptionsAssembler<'a, G> {
    pub fn new(registry: &'a G) -> Self {
        Self { registry }
    }

    /// Run every stage against `request`, prompting through `prompter` for
    /// anything the request leaves open.
    ///
    /// Values supplied in the request fail immediately when invalid; only
    /// prompted values are asked for again.
    pub fn assemble<R: BufRead, W: Write>(
        &self,
        request: RawInitRequest,
        prompter: &mut Prompter<R, W>,
    ) -> Result<ValidatedInitOptions> {
        let selections = Self::resolve_selections(&request)?;

        prompter.say("initializing new stack...")?;

        let stack_name = self.resolve_stack_name(request.stack_name.as_deref(), prompter)?;
        let member_count = Self::resolve_member_count(
            request.member_count.as_deref(),
            request.external_processes,
            prompter,
        )?;

        let strategy = NamingStrategy::from_prompt_flag(request.prompt_names);
        log_init_stage!("member_names", strategy = ?strategy, member_count);
        let members = strategy.member_names(member_count, prompter)?;

        log_init_stage!("build");
        let options = ValidatedInitOptions::from_parts(ResolvedParts {
            stack_name,
            members,
            database: selections.database,
            blockchain: selections.blockchain,
            token_providers: selections.token_providers,
            release: ReleaseOptions {
                channel: selections.release_channel,
                version: request.release_version,
                manifest_path: request.manifest_path,
            },
            external_processes: request.external_processes,
            ports: PortOptions {
                firefly_base: request.firefly_base_port,
                services_base: request.services_base_port,
                prometheus: request.prometheus_port,
            },
            features: FeatureFlags {
                prometheus: request.prometheus_enabled,
                sandbox: request.sandbox_enabled,
                fftm: request.fftm_enabled,
                multiparty: request.multiparty_enabled,
            },
            network: NetworkOptions {
                chain_id: request.chain_id,
                block_period: request.block_period,
                contract_address: request.contract_address,
                remote_node_url: request.remote_node_url,
                request_timeout: request.request_timeout,
            },
            extra_config: ExtraConfigPaths {
                core: request.extra_core_config,
                ethconnect: request.extra_ethconnect_config,
                fftm: request.extra_fftm_config,
            },
        });

        info!(
            stack = options.stack_name(),
            members = options.member_count(),
            blockchain = %options.blockchain(),
            database = %options.database(),
            "init options validated"
        );
        Ok(options)
    }

    /// Stages 1-3: everything decided by flags alone.
    fn resolve_selections(request: &RawInitRequest) -> Result<Selections> {
        log_init_stage!("enumerations");
        let database = resolve::<Database>(&request.database)?;
        let blockchain = BlockchainSelection::from_strings(
            &request.blockchain_provider,
            request.blockchain_node.as_deref(),
        )?;
        check_provider_supported(&blockchain)?;
        check_remote_node(&blockchain, request.remote_node_url.as_deref())?;
        check_manifest(request.manifest_path.as_deref())?;

        log_init_stage!("normalization", provider = %blockchain.provider());
        let token_providers =
            resolve_token_providers(blockchain.provider(), &request.token_providers)?;

        log_init_stage!("release_channel");
        let release_channel = resolve::<ReleaseChannel>(&request.release_channel)?;

        Ok(Selections {
            database,
            blockchain,
            token_providers,
            release_channel,
        })
    }

    /// Stage 4.
    fn resolve_stack_name<R: BufRead, W: Write>(
        &self,
        argument: Option<&str>,
        prompter: &mut Prompter<R, W>,
    ) -> Result<String> {
        match argument {
            Some(name) => {
                log_init_stage!("stack_name", source = "argument");
                validate_stack_name(name, self.registry)
            }
            None => {
                log_init_stage!("stack_name", source = "prompt");
                let name =
                    prompter.ask("stack name: ", |input| validate_stack_name(input, self.registry))?;
                prompter.say(format!("You selected {name}"))?;
                Ok(name)
            }
        }
    }

    /// Stage 5.
    fn resolve_member_count<R: BufRead, W: Write>(
        argument: Option<&str>,
        external_processes: u32,
        prompter: &mut Prompter<R, W>,
    ) -> Result<u32> {
        match argument {
            Some(count) => {
                log_init_stage!("member_count", source = "argument");
                validate_member_count(count, external_processes)
            }
            None => {
                log_init_stage!("member_count", source = "prompt");
                prompter.ask("number of members: ", |input| {
                    validate_member_count(input, external_processes)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_naming_strategy_from_flag() {
        assert_eq!(NamingStrategy::from_prompt_flag(true), NamingStrategy::Prompted);
        assert_eq!(NamingStrategy::from_prompt_flag(false), NamingStrategy::Default);
    }

    #[test]
    fn test_default_names_never_prompt() {
        let mut prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        let names = NamingStrategy::Default
            .member_names(3, &mut prompter)
            .unwrap();

        assert_eq!(
            names,
            vec![
                ("org_0".to_string(), "node_0".to_string()),
                ("org_1".to_string(), "node_1".to_string()),
                ("org_2".to_string(), "node_2".to_string()),
            ]
        );
        assert!(prompter.into_output().is_empty());
    }

    #[test]
    fn test_prompted_names_alternate_org_and_node() {
        let input = "acme\n-bad\nacme-node\nglobex\nglobex.node\n";
        let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let names = NamingStrategy::Prompted
            .member_names(2, &mut prompter)
            .unwrap();

        assert_eq!(names[0], ("acme".to_string(), "acme-node".to_string()));
        assert_eq!(names[1], ("globex".to_string(), "globex.node".to_string()));

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(output.matches("name for node 0: ").count(), 2);
        assert!(output.contains("invalid name '-bad'"));
    }
}
