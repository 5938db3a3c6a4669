//! devstack stack initialization.
//!
//! This crate turns user input for `devstack init` into a validated stack
//! configuration: option resolution, name and cross-field validation,
//! interactive prompting, and the hand-off to a stack manager.
//!
//! ## Example
//!
//! ```no_run
//! use devstack_init::{FsStackRegistry, InitOptionsAssembler, Prompter, RawInitRequest};
//!
//! let registry = FsStackRegistry::new("/tmp/devstack/stacks");
//! let request = RawInitRequest::default()
//!     .with_stack_name("alpha")
//!     .with_member_count("2");
//!
//! let options = InitOptionsAssembler::new(&registry)
//!     .assemble(request, &mut Prompter::stdio())
//!     .unwrap();
//! assert_eq!(options.org_names(), ["org_0", "org_1"]);
//! ```

pub mod assembler;
pub mod constraints;
pub mod manager;
pub mod names;
pub mod options;
pub mod prompt;
pub mod registry;
pub mod request;

pub use assembler::{InitOptionsAssembler, NamingStrategy};
pub use manager::{CreatedStack, FsStackManager, StackManager};
pub use options::ValidatedInitOptions;
pub use prompt::Prompter;
pub use registry::{FsStackRegistry, StackRegistry};
pub use request::RawInitRequest;
