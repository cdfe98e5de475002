// Runner registration token retrieval.
//
// Exchanges the operator's long-lived credential for a short-lived token that
// lets new runners register against one repository.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use provisioner_common::constants::github;
use provisioner_common::{HttpStatusError, Tracing};
use provisioner_sdk::TraceWriter;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

use super::Repository;

/// Source of runner registration tokens.
///
/// The provisioner only depends on this trait, so it can be driven by the
/// real GitHub API or by a stub.
#[async_trait]
pub trait RegistrationTokenProvider: Send + Sync {
    /// Get a registration token for `repository`.
    async fn get_registration_token(&self, repository: &Repository) -> Result<String>;
}

/// Response from the runner registration token endpoint
#[derive(Debug, Deserialize)]
struct RegistrationTokenResponse {
    token: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
}

/// Issues registration tokens through the GitHub REST API.
pub struct GitHubTokenClient {
    client: Client,
    api_url: String,
    credential: String,
    trace: Tracing,
}

impl GitHubTokenClient {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        credential: impl Into<String>,
        trace: Tracing,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            credential: credential.into(),
            trace,
        }
    }
}

#[async_trait]
impl RegistrationTokenProvider for GitHubTokenClient {
    async fn get_registration_token(&self, repository: &Repository) -> Result<String> {
        self.trace.info(&format!(
            "Requesting registration token for repository {repository}."
        ));

        let url = repository.registration_token_url(&self.api_url);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.credential))
            .header(ACCEPT, github::ACCEPT)
            .header(github::API_VERSION_HEADER, github::API_VERSION)
            .send()
            .await
            .with_context(|| format!("Failed to request registration token from {url}"))?;

        let response = HttpStatusError::check(response, "Registration token request").await?;

        let text = response
            .text()
            .await
            .context("Failed to read registration token response")?;
        let body: RegistrationTokenResponse = serde_json::from_str(&text)
            .context("Failed to parse registration token response")?;

        let token = body
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("Registration token response has no 'token' field"))?;

        match body.expires_at {
            Some(expires_at) => self.trace.info(&format!(
                "Successfully retrieved registration token (expires at {expires_at})."
            )),
            None => self.trace.info("Successfully retrieved registration token."),
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGitHub, MockResponse};
    use provisioner_common::HostContext;

    fn client_for(server: &MockGitHub) -> GitHubTokenClient {
        let context = HostContext::new(".");
        GitHubTokenClient::new(
            Client::new(),
            server.url(),
            "ghp_operator_credential",
            context.get_trace("TokenClient"),
        )
    }

    #[tokio::test]
    async fn returns_token_verbatim() {
        let server = MockGitHub::builder()
            .token_response(MockResponse::json(
                201,
                r#"{"token": "abc123", "expires_at": "2026-10-18T12:00:00Z"}"#,
            ))
            .start();

        let token = client_for(&server)
            .get_registration_token(&Repository::new("octo", "hello"))
            .await
            .unwrap();

        assert_eq!(token, "abc123");
        assert_eq!(server.token_requests(), 1);
    }

    #[tokio::test]
    async fn sends_credential_and_api_headers() {
        let server = MockGitHub::builder().start();

        client_for(&server)
            .get_registration_token(&Repository::new("octo", "hello"))
            .await
            .unwrap();

        let request = server.requests().into_iter().next().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.path,
            "/repos/octo/hello/actions/runners/registration-token"
        );
        assert_eq!(
            request.header("authorization").as_deref(),
            Some("Bearer ghp_operator_credential")
        );
        assert_eq!(
            request.header("accept").as_deref(),
            Some("application/vnd.github+json")
        );
        assert_eq!(
            request.header("x-github-api-version").as_deref(),
            Some("2022-11-28")
        );
    }

    #[tokio::test]
    async fn failure_status_is_an_http_status_error() {
        let server = MockGitHub::builder()
            .token_response(MockResponse::json(401, r#"{"message": "Bad credentials"}"#))
            .start();

        let err = client_for(&server)
            .get_registration_token(&Repository::new("octo", "hello"))
            .await
            .unwrap_err();

        let status = err.downcast_ref::<HttpStatusError>().unwrap();
        assert_eq!(status.status.as_u16(), 401);
        assert!(status.body.contains("Bad credentials"));
    }

    #[tokio::test]
    async fn missing_token_field_is_an_error() {
        let server = MockGitHub::builder()
            .token_response(MockResponse::json(201, r#"{"expires_at": "soon"}"#))
            .start();

        let err = client_for(&server)
            .get_registration_token(&Repository::new("octo", "hello"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no 'token' field"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockGitHub::builder()
            .token_response(MockResponse::json(201, "<html>maintenance</html>"))
            .start();

        let err = client_for(&server)
            .get_registration_token(&Repository::new("octo", "hello"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse registration token response"));
    }
}
