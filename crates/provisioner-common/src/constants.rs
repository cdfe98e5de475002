// Constants shared across the provisioner: platform and architecture of the
// runner package, GitHub endpoints, and well-known environment variables.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Operating system a runner package is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsPlatform {
    Linux,
    MacOS,
    Windows,
}

impl fmt::Display for OsPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package_name())
    }
}

impl OsPlatform {
    /// Name used in runner release asset names.
    pub fn package_name(&self) -> &'static str {
        match self {
            OsPlatform::Linux => "linux",
            OsPlatform::MacOS => "osx",
            OsPlatform::Windows => "win",
        }
    }

    /// File extension of the release asset.
    pub fn archive_extension(&self) -> &'static str {
        match self {
            OsPlatform::Linux | OsPlatform::MacOS => "tar.gz",
            OsPlatform::Windows => "zip",
        }
    }

    /// The configuration script shipped inside the package.
    pub fn config_script(&self) -> &'static str {
        match self {
            OsPlatform::Linux | OsPlatform::MacOS => "config.sh",
            OsPlatform::Windows => "config.cmd",
        }
    }
}

impl FromStr for OsPlatform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(OsPlatform::Linux),
            "osx" | "macos" | "darwin" => Ok(OsPlatform::MacOS),
            "win" | "windows" => Ok(OsPlatform::Windows),
            other => anyhow::bail!("Unsupported OS '{other}'. Expected one of: linux, osx, win"),
        }
    }
}

/// CPU architecture a runner package is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X64,
    Arm,
    Arm64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package_name())
    }
}

impl Architecture {
    /// Name used in runner release asset names.
    pub fn package_name(&self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
        }
    }
}

impl FromStr for Architecture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Architecture::X64),
            "arm" | "armv7" => Ok(Architecture::Arm),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            other => {
                anyhow::bail!("Unsupported architecture '{other}'. Expected one of: x64, arm, arm64")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Platform detection (compile-time)
// ---------------------------------------------------------------------------

/// The current OS platform, detected at compile time.
#[cfg(target_os = "macos")]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::MacOS;
#[cfg(target_os = "windows")]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::Windows;
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::Linux;

/// The current CPU architecture, detected at compile time.
#[cfg(target_arch = "arm")]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::Arm;
#[cfg(target_arch = "aarch64")]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::Arm64;
#[cfg(not(any(target_arch = "arm", target_arch = "aarch64")))]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::X64;

// ---------------------------------------------------------------------------
// ReturnCode
// ---------------------------------------------------------------------------

/// Process exit codes.
pub mod return_code {
    pub const SUCCESS: i32 = 0;
    pub const TERMINATED_ERROR: i32 = 1;
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

pub mod github {
    pub const API_URL: &str = "https://api.github.com";
    pub const SERVER_URL: &str = "https://github.com";
    pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
    pub const API_VERSION: &str = "2022-11-28";
    pub const ACCEPT: &str = "application/vnd.github+json";
}

// ---------------------------------------------------------------------------
// Runner package
// ---------------------------------------------------------------------------

pub mod runner_package {
    /// Runner release installed when no version is given.
    pub const DEFAULT_VERSION: &str = "2.323.0";

    /// Base URL of runner release assets.
    pub const RELEASES_DOWNLOAD_URL: &str = "https://github.com/actions/runner/releases/download";

    /// Local file name (without extension) of the downloaded archive.
    pub const ARCHIVE_FILE_STEM: &str = "actions-runner";

    /// Suffix of an archive that is still being streamed to disk.
    pub const PARTIAL_SUFFIX: &str = ".partial";

    /// Upper bound of a single write while streaming the archive.
    pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;
}

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

pub mod variables {
    pub const PRINT_LOG_TO_STDOUT: &str = "ACTIONS_RUNNER_PRINT_LOG_TO_STDOUT";
    pub const TLS_NO_VERIFY: &str = "GITHUB_ACTIONS_RUNNER_TLS_NO_VERIFY";
    /// Read by the runner's configuration script; it refuses to run as root otherwise.
    pub const ALLOW_RUN_AS_ROOT: &str = "RUNNER_ALLOW_RUNASROOT";
}
