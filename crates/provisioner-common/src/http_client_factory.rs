// Builds the single reqwest client used for both the GitHub API and the
// runner package download.

use crate::constants::variables;
use anyhow::{Context, Result};
use provisioner_sdk::RunnerPackage;
use reqwest::Client;

/// Creates properly configured HTTP clients for the provisioner.
pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Create a new `reqwest::Client`.
    ///
    /// - Proxies come from `HTTP_PROXY` / `HTTPS_PROXY` / `NO_PROXY`, which
    ///   reqwest reads on its own.
    /// - If `GITHUB_ACTIONS_RUNNER_TLS_NO_VERIFY` is truthy, TLS certificate
    ///   verification is disabled (dangerous!).
    /// - No request timeout is set: archive downloads can be slow.
    pub fn create_client() -> Result<Client> {
        let mut builder = Client::builder().user_agent(RunnerPackage::user_agent());

        if Self::tls_verification_disabled() {
            tracing::warn!(
                "{} is set; TLS certificate verification is disabled",
                variables::TLS_NO_VERIFY
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().context("Failed to build HTTP client")
    }

    fn tls_verification_disabled() -> bool {
        std::env::var(variables::TLS_NO_VERIFY)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
    }
}
