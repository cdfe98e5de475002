use provisioner_common::constants::runner_package;
use provisioner_common::{Architecture, OsPlatform, CURRENT_ARCHITECTURE, CURRENT_PLATFORM};

/// A runner release asset: platform, architecture and version, plus the
/// base URL releases are downloaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerRelease {
    pub os: OsPlatform,
    pub arch: Architecture,
    /// Version without the leading `v`, e.g. `2.323.0`.
    pub version: String,
    pub download_base_url: String,
}

impl Default for RunnerRelease {
    fn default() -> Self {
        Self {
            os: CURRENT_PLATFORM,
            arch: CURRENT_ARCHITECTURE,
            version: runner_package::DEFAULT_VERSION.to_string(),
            download_base_url: runner_package::RELEASES_DOWNLOAD_URL.to_string(),
        }
    }
}

impl RunnerRelease {
    pub fn new(os: OsPlatform, arch: Architecture, version: &str, download_base_url: &str) -> Self {
        Self {
            os,
            arch,
            version: version.trim().trim_start_matches('v').to_string(),
            download_base_url: download_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL of the release asset.
    pub fn download_url(&self) -> String {
        format!(
            "{base}/v{version}/actions-runner-{os}-{arch}-{version}.{ext}",
            base = self.download_base_url,
            version = self.version,
            os = self.os.package_name(),
            arch = self.arch.package_name(),
            ext = self.os.archive_extension(),
        )
    }

    /// Name the archive is saved under inside a runner directory.
    pub fn archive_file_name(&self) -> String {
        format!(
            "{}.{}",
            runner_package::ARCHIVE_FILE_STEM,
            self.os.archive_extension()
        )
    }
}
