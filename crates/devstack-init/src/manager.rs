//! Hand-off of validated options to whatever creates the stack.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use devstack_core::{DevstackError, Result};

use crate::options::ValidatedInitOptions;

/// File written into every new stack directory.
pub const INIT_FILE_NAME: &str = "init.json";

/// A stack that was just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedStack {
    pub name: String,
    /// Directory holding everything generated for the stack
    pub stack_dir: PathBuf,
    /// The generated artifact users are pointed at
    pub artifact_path: PathBuf,
}

/// Creates stacks from validated options.
pub trait StackManager {
    /// Take ownership of `options` and create the stack they describe.
    fn init_stack(&self, options: ValidatedInitOptions) -> Result<CreatedStack>;
}

/// What gets written to `init.json`.
#[derive(Serialize)]
struct StackRecord<'a> {
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    options: &'a ValidatedInitOptions,
}

/// Stack manager that records each stack as a directory under `stacks_dir`.
#[derive(Debug, Clone)]
pub struct FsStackManager {
    stacks_dir: PathBuf,
}

impl FsStackManager {
    pub fn new(stacks_dir: impl Into<PathBuf>) -> Self {
        Self {
            stacks_dir: stacks_dir.into(),
        }
    }
}

impl StackManager for FsStackManager {
    fn init_stack(&self, options: ValidatedInitOptions) -> Result<CreatedStack> {
        let name = options.stack_name().to_string();
        let stack_dir = self.stacks_dir.join(&name);

        let record = StackRecord {
            created_at: Utc::now(),
            options: &options,
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| DevstackError::json("stack record", e))?;

        fs::create_dir_all(&self.stacks_dir).map_err(|e| DevstackError::DirectoryCreation {
            path: self.stacks_dir.clone(),
            source: e,
        })?;

        let artifact_path = create_stack_dir(&name, &stack_dir, |dir| {
            let path = dir.join(INIT_FILE_NAME);
            fs::write(&path, &json)
                .map_err(|e| DevstackError::io("writing stack record", &path, e))?;
            Ok(path)
        })?;

        info!(
            stack = %name,
            members = options.member_count(),
            path = %artifact_path.display(),
            "stack created"
        );

        Ok(CreatedStack {
            name,
            stack_dir,
            artifact_path,
        })
    }
}

/// Create `stack_dir` and fill it, removing it again if `fill` fails.
///
/// The directory must not exist yet. A stack created since validation
/// surfaces as [`DevstackError::StackAlreadyExists`].
fn create_stack_dir<T>(
    name: &str,
    stack_dir: &Path,
    fill: impl FnOnce(&Path) -> Result<T>,
) -> Result<T> {
    fs::create_dir(stack_dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => DevstackError::StackAlreadyExists {
            name: name.to_string(),
        },
        _ => DevstackError::DirectoryCreation {
            path: stack_dir.to_path_buf(),
            source: e,
        },
    })?;

    fill(stack_dir).inspect_err(|e| {
        warn!(stack = name, error = %e, "stack creation failed, removing directory");
        if let Err(cleanup) = fs::remove_dir_all(stack_dir) {
            warn!(
                path = %stack_dir.display(),
                error = %cleanup,
                "could not remove partially created stack"
            );
        }
    })
}
