// Typed errors shared by the GitHub API client and the package downloader.

use reqwest::{Response, StatusCode};

/// Maximum number of response-body bytes carried in an error message.
const MAX_BODY_LEN: usize = 512;

/// A request that came back with a non-success HTTP status.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{operation} failed with HTTP {status}: {body}")]
pub struct HttpStatusError {
    pub operation: String,
    pub status: StatusCode,
    pub body: String,
}

impl HttpStatusError {
    /// Pass a successful response through, or turn a failed one into an
    /// `HttpStatusError` carrying (a prefix of) the response body.
    pub async fn check(response: Response, operation: &str) -> Result<Response, HttpStatusError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_BODY_LEN {
            let mut cut = MAX_BODY_LEN;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }

        Err(HttpStatusError {
            operation: operation.to_string(),
            status,
            body,
        })
    }
}
