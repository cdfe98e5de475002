// HostContext: the application context shared by every provisioning step.
// Owns the secret masker, hands out trace sources, and knows the root
// directory under which runner directories are created.

use crate::constants::variables;
use crate::secret_masker::SecretMasker;
use crate::tracing::{TraceManager, TraceSetting, Tracing};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct HostContext {
    /// Directory that receives the `{runner_name}_{index}` directories.
    root_directory: PathBuf,

    /// Secret masker shared across the whole process.
    pub secret_masker: Arc<SecretMasker>,

    trace_manager: TraceManager,
}

impl HostContext {
    /// Create a new `HostContext` rooted at `root_directory`.
    pub fn new(root_directory: impl Into<PathBuf>) -> Arc<Self> {
        let secret_masker = Arc::new(SecretMasker::new());

        let print_to_stdout = std::env::var(variables::PRINT_LOG_TO_STDOUT)
            .map(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
            .unwrap_or(false);

        let trace_setting = TraceSetting { print_to_stdout };

        Arc::new(Self {
            root_directory: root_directory.into(),
            trace_manager: TraceManager::new(secret_masker.clone(), trace_setting),
            secret_masker,
        })
    }

    /// The directory containing the running executable. Runner directories
    /// land next to the provisioner unless the operator picks another root.
    pub fn default_root_directory() -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Failed to resolve current executable")?;
        exe.parent()
            .map(Path::to_path_buf)
            .with_context(|| format!("Executable '{}' has no parent directory", exe.display()))
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Get a named trace source.
    pub fn get_trace(&self, name: &str) -> Tracing {
        self.trace_manager.get(name)
    }

    /// Register a value (credential, registration token) to be masked in all output.
    pub fn add_secret(&self, value: &str) {
        self.secret_masker.add_value(value);
    }
}
