use anyhow::Result;
use std::path::PathBuf;

/// Locates external tools (such as `tar`) on `PATH` before they are invoked,
/// so a missing tool surfaces as a clear error instead of a spawn failure.
pub struct WhichUtil;

impl WhichUtil {
    /// Locate the first occurrence of `command` on the system PATH.
    pub fn which(command: &str) -> Result<PathBuf> {
        if command.is_empty() {
            anyhow::bail!("command must not be empty");
        }

        which::which(command).map_err(|e| {
            anyhow::anyhow!(
                "{command}: command not found ({e}). Make sure '{command}' is installed and its location included in the 'PATH' environment variable."
            )
        })
    }
}
