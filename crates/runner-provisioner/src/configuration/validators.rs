// Validation of operator input, run before any network call is made.

use anyhow::Result;
use url::Url;

/// Maximum length GitHub accepts for a runner name.
pub const MAX_RUNNER_NAME_LEN: usize = 64;

/// Validate an http(s) URL such as `--api-url` or `--server-url`.
pub fn validate_url(url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(anyhow::anyhow!("URL cannot be empty"));
    }

    let url = Url::parse(url_str).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url_str, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(anyhow::anyhow!(
                "URL must use HTTP or HTTPS scheme, got '{}'",
                scheme
            ));
        }
    }

    if url.host_str().is_none() {
        return Err(anyhow::anyhow!("URL must have a host"));
    }

    Ok(())
}

/// Validate a repository owner or repository name: a single, non-empty
/// path segment.
pub fn validate_repository_part(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("Repository {kind} cannot be empty"));
    }

    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(anyhow::anyhow!(
            "Repository {kind} '{value}' must not contain '/' or whitespace"
        ));
    }

    Ok(())
}

/// Validate a runner name.
///
/// The name must be:
/// - Non-empty
/// - At most 64 characters
/// - Contain only alphanumeric characters, hyphens, underscores, and periods
pub fn validate_runner_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow::anyhow!("Runner name cannot be empty"));
    }

    if name.len() > MAX_RUNNER_NAME_LEN {
        return Err(anyhow::anyhow!(
            "Runner name must be at most {} characters (got {})",
            MAX_RUNNER_NAME_LEN,
            name.len()
        ));
    }

    let is_valid = name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.');

    if !is_valid {
        return Err(anyhow::anyhow!(
            "Runner name '{}' contains invalid characters. \
             Only alphanumeric characters, hyphens, underscores, and periods are allowed.",
            name
        ));
    }

    Ok(())
}

/// Validate comma-separated labels.
pub fn validate_labels(labels: &str) -> Result<()> {
    if labels.is_empty() {
        return Ok(());
    }

    for label in labels.split(',') {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(anyhow::anyhow!("Label list contains empty labels"));
        }
        if trimmed.len() > 64 {
            return Err(anyhow::anyhow!(
                "Label '{}' exceeds the maximum length of 64 characters",
                trimmed
            ));
        }
    }

    Ok(())
}

/// Validate a runner release version such as `2.323.0` (a leading `v` is tolerated).
pub fn validate_runner_version(version: &str) -> Result<()> {
    let trimmed = version.trim().trim_start_matches('v');
    let parts: Vec<&str> = trimmed.split('.').collect();

    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return Err(anyhow::anyhow!(
            "Runner version '{}' must look like MAJOR.MINOR.PATCH",
            version
        ));
    }

    Ok(())
}
