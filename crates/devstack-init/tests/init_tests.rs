//! End-to-end tests for stack initialization.
//!
//! These tests cover:
//! - Non-interactive builds from positional arguments and flags
//! - Interactive builds driven by scripted input
//! - Fail-fast behaviour of flag validation
//! - Hand-off to the filesystem stack manager

use std::cell::Cell;
use std::io::{self, Cursor};

use tempfile::TempDir;

use devstack_core::DevstackError;
use devstack_core::logging::init_test_logging;
use devstack_core::types::{
    BlockchainNodeProvider, BlockchainProvider, Database, ReleaseChannel, Selection,
    TokenProvider,
};
use devstack_init::manager::INIT_FILE_NAME;
use devstack_init::{
    FsStackManager, FsStackRegistry, InitOptionsAssembler, Prompter, RawInitRequest,
    StackManager, StackRegistry, ValidatedInitOptions,
};

// ============================================================
// Helpers
// ============================================================

type ScriptedPrompter = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

fn scripted(input: &str) -> ScriptedPrompter {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Registry with a fixed set of taken names that counts lookups.
struct FakeRegistry {
    taken: Vec<&'static str>,
    lookups: Cell<usize>,
}

impl FakeRegistry {
    fn empty() -> Self {
        Self::with_taken(&[])
    }

    fn with_taken(taken: &[&'static str]) -> Self {
        Self {
            taken: taken.to_vec(),
            lookups: Cell::new(0),
        }
    }
}

impl StackRegistry for FakeRegistry {
    fn exists(&self, stack_name: &str) -> io::Result<bool> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.taken.iter().any(|name| *name == stack_name))
    }
}

/// Registry whose backing store cannot be read.
struct FailingRegistry;

impl StackRegistry for FailingRegistry {
    fn exists(&self, _stack_name: &str) -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "stacks dir unreadable"))
    }
}

fn assemble(
    registry: &impl StackRegistry,
    request: RawInitRequest,
    input: &str,
) -> (devstack_core::Result<ValidatedInitOptions>, String) {
    init_test_logging();
    let mut prompter = scripted(input);
    let result = InitOptionsAssembler::new(registry).assemble(request, &mut prompter);
    let output = String::from_utf8(prompter.into_output()).unwrap();
    (result, output)
}

fn alpha_request() -> RawInitRequest {
    RawInitRequest::default()
        .with_stack_name("alpha")
        .with_member_count("2")
}

// ============================================================
// Non-interactive builds
// ============================================================

#[test]
fn test_defaults_with_positional_arguments() {
    let registry = FakeRegistry::empty();
    let (result, output) = assemble(&registry, alpha_request(), "");
    let options = result.unwrap();

    assert_eq!(options.stack_name(), "alpha");
    assert_eq!(options.member_count(), 2);
    assert_eq!(options.org_names(), ["org_0", "org_1"]);
    assert_eq!(options.node_names(), ["node_0", "node_1"]);
    assert_eq!(options.blockchain().provider(), BlockchainProvider::Ethereum);
    assert_eq!(options.blockchain().node(), BlockchainNodeProvider::Geth);
    assert_eq!(options.token_providers(), TokenProvider::DEFAULT_BUNDLE);
    assert_eq!(options.database(), Database::Sqlite3);
    assert_eq!(options.release().channel, ReleaseChannel::Stable);
    assert_eq!(options.release().version, "latest");
    assert_eq!(options.external_processes(), 0);
    assert_eq!(options.ports().firefly_base, 5000);
    assert!(options.features().sandbox);

    assert_eq!(output, "initializing new stack...\n");
    assert_eq!(registry.lookups.get(), 1);
}

#[test]
fn test_members_iterator_pairs_names() {
    let registry = FakeRegistry::empty();
    let request = RawInitRequest::default()
        .with_stack_name("trio")
        .with_member_count("3");
    let options = assemble(&registry, request, "").0.unwrap();

    let members: Vec<_> = options.members().collect();
    assert_eq!(members.len(), 3);
    assert_eq!(members[2], ("org_2", "node_2"));
}

#[test]
fn test_corda_fails_regardless_of_other_input() {
    let registry = FakeRegistry::empty();
    let request = RawInitRequest::default()
        .with_stack_name("abc")
        .with_member_count("3")
        .with_blockchain("corda", None);

    let (result, output) = assemble(&registry, request, "");
    assert!(matches!(
        result,
        Err(DevstackError::UnsupportedProvider { .. })
    ));
    assert!(output.is_empty());
    assert_eq!(registry.lookups.get(), 0);
}

#[test]
fn test_fabric_clears_token_providers() {
    let registry = FakeRegistry::empty();
    let request = alpha_request()
        .with_blockchain("fabric", Some("fabric"))
        .with_token_providers(["erc20_erc721"]);

    let options = assemble(&registry, request, "").0.unwrap();
    assert!(options.token_providers().is_empty());
    assert_eq!(options.blockchain().as_strs(), ("fabric", "fabric"));
}

#[test]
fn test_token_providers_pass_through_in_order() {
    let registry = FakeRegistry::empty();
    let request =
        alpha_request().with_token_providers(["erc1155", "erc20_erc721", "erc1155"]);

    let options = assemble(&registry, request, "").0.unwrap();
    assert_eq!(
        options.token_providers(),
        [
            TokenProvider::Erc1155,
            TokenProvider::Erc20Erc721,
            TokenProvider::Erc1155
        ]
    );
}

#[test]
fn test_external_processes_bound() {
    let registry = FakeRegistry::empty();

    let request = RawInitRequest::default()
        .with_stack_name("ext")
        .with_member_count("3")
        .with_external_processes(3);
    let (result, _) = assemble(&registry, request, "");
    assert!(matches!(
        result,
        Err(DevstackError::ExternalProcessesExceedMembers {
            external: 3,
            members: 3
        })
    ));

    let request = RawInitRequest::default()
        .with_stack_name("ext")
        .with_member_count("3")
        .with_external_processes(2);
    let options = assemble(&registry, request, "").0.unwrap();
    assert_eq!(options.external_processes(), 2);
}

#[test]
fn test_zero_member_argument_fails_without_prompting() {
    let registry = FakeRegistry::empty();
    let request = RawInitRequest::default()
        .with_stack_name("alpha")
        .with_member_count("0");

    // Input is available, but arguments are never retried
    let (result, output) = assemble(&registry, request, "2\n");
    assert!(matches!(result, Err(DevstackError::InvalidCount { .. })));
    assert!(!output.contains("number of members"));
}

#[test]
fn test_taken_stack_name_argument_fails() {
    let registry = FakeRegistry::with_taken(&["my-stack1"]);
    let request = RawInitRequest::default()
        .with_stack_name("my-stack1")
        .with_member_count("1");

    let (result, _) = assemble(&registry, request, "other\n");
    assert!(matches!(
        result,
        Err(DevstackError::StackAlreadyExists { ref name }) if name == "my-stack1"
    ));
}

#[test]
fn test_invalid_stack_name_argument_skips_registry() {
    let registry = FakeRegistry::empty();
    let request = RawInitRequest::default()
        .with_stack_name("My_Stack")
        .with_member_count("1");

    let (result, _) = assemble(&registry, request, "");
    assert!(matches!(result, Err(DevstackError::InvalidStackName { .. })));
    assert_eq!(registry.lookups.get(), 0);
}

#[test]
fn test_flag_errors_abort_before_prompting() {
    let cases = [
        RawInitRequest::default().with_database("mysql"),
        RawInitRequest::default().with_blockchain("ethereum", Some("fabric")),
        RawInitRequest::default().with_token_providers(["erc721"]),
        RawInitRequest::default().with_release_channel("nightly"),
        RawInitRequest::default().with_blockchain("ethereum", Some("remote-rpc")),
    ];

    for request in cases {
        let registry = FakeRegistry::empty();
        // A full interactive session is available but must not be used
        let (result, output) = assemble(&registry, request.clone(), "alpha\n2\n");
        let err = result.unwrap_err();
        assert!(err.is_validation_error(), "{request:?} gave {err:?}");
        assert!(output.is_empty(), "{request:?} prompted: {output}");
        assert_eq!(registry.lookups.get(), 0);
    }
}

#[test]
fn test_unknown_database_lists_choices() {
    let registry = FakeRegistry::empty();
    let (result, _) = assemble(&registry, alpha_request().with_database("mysql"), "");
    let err = result.unwrap_err();
    assert_eq!(
        err.valid_choices().unwrap(),
        ["sqlite3".to_string(), "postgres".to_string()]
    );
}

#[test]
fn test_unknown_blockchain_provider_lists_providers() {
    let registry = FakeRegistry::empty();
    let (result, output) = assemble(&registry, alpha_request().with_blockchain("tezos", None), "");
    let err = result.unwrap_err();

    assert!(matches!(
        err,
        DevstackError::UnknownOption { category: "blockchain provider", ref input, .. } if input == "tezos"
    ));
    assert_eq!(
        err.valid_choices().unwrap(),
        BlockchainProvider::valid_tokens().as_slice()
    );
    assert!(output.is_empty());
}

#[test]
fn test_remote_rpc_with_url() {
    let registry = FakeRegistry::empty();
    let request = alpha_request()
        .with_blockchain("ethereum", Some("remote-rpc"))
        .with_remote_node_url("http://localhost:8545");

    let options = assemble(&registry, request, "").0.unwrap();
    assert_eq!(options.blockchain().node(), BlockchainNodeProvider::RemoteRpc);
    assert_eq!(
        options.network().remote_node_url.as_deref(),
        Some("http://localhost:8545")
    );
}

#[test]
fn test_independent_builds_share_no_state() {
    let registry = FakeRegistry::empty();

    let fabric = alpha_request().with_blockchain("fabric", None);
    assert!(assemble(&registry, fabric, "").0.unwrap().token_providers().is_empty());

    // A fabric build earlier in the process must not leak into this one
    let ethereum = assemble(&registry, alpha_request(), "").0.unwrap();
    assert_eq!(ethereum.token_providers(), TokenProvider::DEFAULT_BUNDLE);
}

// ============================================================
// Interactive builds
// ============================================================

#[test]
fn test_prompted_stack_name_and_count() {
    let registry = FakeRegistry::with_taken(&["taken"]);
    let input = "\nMy_Stack\ntaken\nfresh\nabc\n0\n2\n";

    let (result, output) = assemble(&registry, RawInitRequest::default(), input);
    let options = result.unwrap();

    assert_eq!(options.stack_name(), "fresh");
    assert_eq!(options.member_count(), 2);
    assert_eq!(options.org_names(), ["org_0", "org_1"]);

    assert_eq!(output.matches("stack name: ").count(), 4);
    assert!(output.contains("stack name must not be empty"));
    assert!(output.contains("invalid stack name 'My_Stack'"));
    assert!(output.contains("stack 'taken' already exists"));
    assert!(output.contains("You selected fresh"));
    assert_eq!(output.matches("number of members: ").count(), 3);
    assert!(output.contains("invalid member count 'abc': invalid number"));
}

#[test]
fn test_prompted_count_respects_external_processes() {
    let registry = FakeRegistry::empty();
    let request = RawInitRequest::default()
        .with_stack_name("alpha")
        .with_external_processes(1);

    let (result, output) = assemble(&registry, request, "1\n2\n");
    assert_eq!(result.unwrap().member_count(), 2);
    assert!(output.contains("number of external processes (1)"));
}

#[test]
fn test_prompted_member_names() {
    let registry = FakeRegistry::empty();
    let request = alpha_request().with_prompt_names(true);
    let input = "acme\nacme-node\nglobex\n_bad\nglobex.node\n";

    let (result, output) = assemble(&registry, request, input);
    let options = result.unwrap();

    assert_eq!(options.org_names(), ["acme", "globex"]);
    assert_eq!(options.node_names(), ["acme-node", "globex.node"]);
    assert!(output.contains("name for org 0: "));
    assert_eq!(output.matches("name for node 1: ").count(), 2);
}

#[test]
fn test_registry_failure_aborts_prompt() {
    let (result, output) = assemble(&FailingRegistry, RawInitRequest::default(), "alpha\nbeta\n");
    let err = result.unwrap_err();

    assert!(matches!(err, DevstackError::RegistryLookupFailed { ref name, .. } if name == "alpha"));
    assert_eq!(output.matches("stack name: ").count(), 1);
}

#[test]
fn test_input_closed_mid_session() {
    let registry = FakeRegistry::empty();
    let (result, _) = assemble(&registry, RawInitRequest::default(), "alpha\n");
    assert!(matches!(
        result,
        Err(DevstackError::InputClosed { ref label }) if label == "number of members"
    ));
}

// ============================================================
// Stack manager hand-off
// ============================================================

#[test]
fn test_fs_manager_records_stack() {
    let temp = TempDir::new().unwrap();
    let stacks_dir = temp.path().join("stacks");
    let registry = FsStackRegistry::new(&stacks_dir);
    let manager = FsStackManager::new(&stacks_dir);

    let options = assemble(&registry, alpha_request(), "").0.unwrap();
    let created = manager.init_stack(options).unwrap();

    assert_eq!(created.name, "alpha");
    assert_eq!(created.stack_dir, stacks_dir.join("alpha"));
    assert_eq!(created.artifact_path, stacks_dir.join("alpha").join(INIT_FILE_NAME));

    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&created.artifact_path).unwrap()).unwrap();
    assert_eq!(record["stack_name"], "alpha");
    assert_eq!(record["member_count"], 2);
    assert_eq!(record["org_names"], serde_json::json!(["org_0", "org_1"]));
    assert_eq!(record["blockchain"]["provider"], "ethereum");
    assert_eq!(record["blockchain"]["node"], "geth");
    assert_eq!(record["token_providers"], serde_json::json!(["erc20_erc721"]));
    assert_eq!(record["release"]["channel"], "stable");
    assert!(record["created_at"].is_string());

    // The registry now sees the stack, so the same name is rejected
    let (result, _) = assemble(&registry, alpha_request(), "");
    assert!(matches!(result, Err(DevstackError::StackAlreadyExists { .. })));
}

#[test]
fn test_fs_manager_refuses_existing_dir() {
    let temp = TempDir::new().unwrap();
    let options = assemble(&FakeRegistry::empty(), alpha_request(), "").0.unwrap();

    std::fs::create_dir_all(temp.path().join("alpha")).unwrap();
    let err = FsStackManager::new(temp.path()).init_stack(options).unwrap_err();
    assert!(matches!(err, DevstackError::StackAlreadyExists { .. }));
}
