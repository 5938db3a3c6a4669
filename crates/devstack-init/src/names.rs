//! Stack and member name rules.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use devstack_core::{DevstackError, Result};

use crate::registry::StackRegistry;

/// Rule shown to users when an org or node name is rejected.
pub const MEMBER_NAME_RULE: &str = "name must be 1-64 characters, including alphanumerics (a-zA-Z0-9), dot (.), dash (-) and underscore (_), and must start/end in an alphanumeric";

/// 1-64 chars, alphanumeric at both ends.
static MEMBER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-zA-Z]([0-9a-zA-Z._-]{0,62}[0-9a-zA-Z])?$")
        .expect("Invalid member name regex")
});

/// Any character outside the stack name class.
static STACK_NAME_INVALID_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-_a-z0-9]").expect("Invalid stack name regex"));

/// Validate an org or node name.
pub fn validate_member_name(input: &str) -> Result<String> {
    if MEMBER_NAME.is_match(input) {
        Ok(input.to_string())
    } else {
        Err(DevstackError::InvalidName {
            input: input.to_string(),
            rule: MEMBER_NAME_RULE,
        })
    }
}

/// Check stack name syntax only, without consulting a registry.
pub fn check_stack_name_syntax(input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(DevstackError::EmptyName);
    }
    if STACK_NAME_INVALID_CHAR.is_match(input) {
        return Err(DevstackError::InvalidStackName {
            input: input.to_string(),
        });
    }
    Ok(())
}

/// Validate a new stack name: syntax first, then availability.
///
/// The registry is only consulted for syntactically valid names.
pub fn validate_stack_name<G>(input: &str, registry: &G) -> Result<String>
where
    G: StackRegistry + ?Sized,
{
    check_stack_name_syntax(input)?;

    let exists = registry
        .exists(input)
        .map_err(|e| DevstackError::registry_lookup(input, e))?;
    if exists {
        debug!(stack = input, "stack name already taken");
        return Err(DevstackError::StackAlreadyExists {
            name: input.to_string(),
        });
    }

    Ok(input.to_string())
}
