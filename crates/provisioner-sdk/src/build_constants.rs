// Build constants for the provisioner binary, taken from compile-time
// environment variables with defaults.

/// Source control information.
pub struct Source;

impl Source {
    /// The commit hash from which this binary was built.
    /// Set via the `PROVISIONER_COMMIT_HASH` env var at compile time, or "N/A".
    pub const COMMIT_HASH: &'static str = match option_env!("PROVISIONER_COMMIT_HASH") {
        Some(h) => h,
        None => "N/A",
    };
}

/// Package metadata for the provisioner itself.
#[derive(Debug, Clone)]
pub struct RunnerPackage;

impl RunnerPackage {
    /// Pulled from `CARGO_PKG_VERSION` which is set by Cargo from `Cargo.toml`.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Name used in the HTTP user agent.
    pub const PACKAGE_NAME: &'static str = "runner-provisioner";

    /// The `User-Agent` header value sent with every request.
    pub fn user_agent() -> String {
        format!("{}/{}", Self::PACKAGE_NAME, Self::VERSION)
    }
}
