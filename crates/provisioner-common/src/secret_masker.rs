// Secret masking for everything the provisioner logs: the operator's
// credential, the registration token, and any process arguments echoing them.

use parking_lot::RwLock;

/// Replacement text used when a secret is found.
const MASK: &str = "***";

/// A thread-safe store of secret values that replaces them in output with `***`.
#[derive(Debug, Default)]
pub struct SecretMasker {
    /// Registered values, longest first so a secret containing another is
    /// masked whole.
    secrets: RwLock<Vec<String>>,
}

impl SecretMasker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value that must never appear in output.
    /// Empty or whitespace-only values are ignored.
    pub fn add_value(&self, secret: &str) {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return;
        }

        let mut secrets = self.secrets.write();
        if secrets.iter().any(|s| s == trimmed) {
            return;
        }
        secrets.push(trimmed.to_string());
        secrets.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    /// Replace all registered secret values in `input` with `***`.
    pub fn mask_secrets(&self, input: &str) -> String {
        let secrets = self.secrets.read();
        secrets
            .iter()
            .fold(input.to_string(), |masked, secret| {
                if masked.contains(secret.as_str()) {
                    masked.replace(secret.as_str(), MASK)
                } else {
                    masked
                }
            })
    }

    /// Returns the number of registered secrets.
    pub fn secret_count(&self) -> usize {
        self.secrets.read().len()
    }
}
