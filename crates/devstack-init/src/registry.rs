//! Lookup of existing stacks.

use std::io;
use std::path::PathBuf;

use tracing::debug;

/// Answers whether a stack name is already taken.
pub trait StackRegistry {
    /// Returns true if a stack called `stack_name` exists.
    ///
    /// An `Err` means the lookup itself failed, which is never the same as
    /// "does not exist".
    fn exists(&self, stack_name: &str) -> io::Result<bool>;
}

/// Registry backed by the stacks directory: one subdirectory per stack.
#[derive(Debug, Clone)]
pub struct FsStackRegistry {
    stacks_dir: PathBuf,
}

impl FsStackRegistry {
    pub fn new(stacks_dir: impl Into<PathBuf>) -> Self {
        Self {
            stacks_dir: stacks_dir.into(),
        }
    }
}

impl StackRegistry for FsStackRegistry {
    fn exists(&self, stack_name: &str) -> io::Result<bool> {
        let path = self.stacks_dir.join(stack_name);
        let exists = path.try_exists()?;
        debug!(stack = stack_name, path = %path.display(), exists, "checked stack registry");
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_stacks_dir_means_no_stacks() {
        let temp = TempDir::new().unwrap();
        let registry = FsStackRegistry::new(temp.path().join("stacks"));
        assert!(!registry.exists("alpha").unwrap());
    }

    #[test]
    fn test_existing_stack_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("alpha")).unwrap();

        let registry = FsStackRegistry::new(temp.path());
        assert!(registry.exists("alpha").unwrap());
        assert!(!registry.exists("beta").unwrap());
    }
}
