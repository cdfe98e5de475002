// Command-line surface of `create-runners` and its validated form.

use anyhow::{Context, Result};
use clap::Parser;
use provisioner_common::constants::{github, runner_package};
use provisioner_common::{Architecture, HostContext, OsPlatform};
use std::path::PathBuf;

use crate::configuration::validators;
use crate::configuration::ConfigureOptions;
use crate::github::Repository;
use crate::package::RunnerRelease;
use crate::provisioner::runner_directory_name;

/// Create multiple GitHub Actions runners.
#[derive(Parser, Debug, Clone)]
#[command(name = "create-runners", version, about = "Create multiple GitHub Actions runners.")]
pub struct Args {
    /// The GitHub owner (user or organization).
    #[arg(long)]
    pub owner: String,

    /// The GitHub repository name.
    #[arg(long)]
    pub repo: String,

    /// The GitHub personal access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// The number of runners to create.
    #[arg(long = "runner_count", visible_alias = "runner-count")]
    pub runner_count: u32,

    /// The base name for the runners. A number will be appended to this name.
    #[arg(long = "runner_name", visible_alias = "runner-name")]
    pub runner_name: String,

    /// Directory that receives the runner directories [default: directory of this executable].
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Runner package OS: linux, osx or win [default: host OS].
    #[arg(long)]
    pub os: Option<OsPlatform>,

    /// Runner package architecture: x64, arm or arm64 [default: host architecture].
    #[arg(long)]
    pub arch: Option<Architecture>,

    /// Runner release to install.
    #[arg(long = "runner-version", default_value = runner_package::DEFAULT_VERSION)]
    pub runner_version: String,

    /// Base URL runner releases are downloaded from.
    #[arg(long, default_value = runner_package::RELEASES_DOWNLOAD_URL)]
    pub download_base_url: String,

    /// GitHub REST API URL (for GitHub Enterprise Server: https://HOST/api/v3).
    #[arg(long, default_value = github::API_URL)]
    pub api_url: String,

    /// GitHub web URL the repository lives on.
    #[arg(long, default_value = github::SERVER_URL)]
    pub server_url: String,

    /// Comma-separated extra labels for every runner.
    #[arg(long)]
    pub labels: Option<String>,

    /// Replace existing runners with the same name.
    #[arg(long)]
    pub replace: bool,

    /// Allow the configuration script to run as root.
    #[arg(long)]
    pub allow_run_as_root: bool,
}

/// Everything one provisioning run needs, validated.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    pub repository: Repository,
    pub credential: String,
    pub runner_count: u32,
    pub runner_name: String,
    /// Absolute directory under which runner directories are created.
    pub root_directory: PathBuf,
    pub release: RunnerRelease,
    pub api_url: String,
    pub configure: ConfigureOptions,
}

impl ProvisionSettings {
    /// Validate `args` and fill in defaults. Fails before any network call
    /// is made.
    pub fn from_args(args: Args) -> Result<Self> {
        validators::validate_repository_part("owner", &args.owner)?;
        validators::validate_repository_part("name", &args.repo)?;

        if args.token.trim().is_empty() {
            anyhow::bail!("Token cannot be empty");
        }

        validators::validate_runner_name(&args.runner_name)?;
        if args.runner_count > 0 {
            let longest = runner_directory_name(&args.runner_name, args.runner_count - 1);
            validators::validate_runner_name(&longest)
                .with_context(|| format!("Runner name '{longest}' would be invalid"))?;
        }

        validators::validate_runner_version(&args.runner_version)?;
        validators::validate_url(&args.download_base_url)?;
        validators::validate_url(&args.api_url)?;
        validators::validate_url(&args.server_url)?;

        let labels = args.labels.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        if let Some(labels) = labels.as_deref() {
            validators::validate_labels(labels)?;
        }

        let root_directory = match args.root {
            Some(root) => root,
            None => HostContext::default_root_directory()?,
        };
        let root_directory = if root_directory.is_absolute() {
            root_directory
        } else {
            std::env::current_dir()
                .context("Failed to resolve current directory")?
                .join(root_directory)
        };

        let defaults = RunnerRelease::default();
        let release = RunnerRelease::new(
            args.os.unwrap_or(defaults.os),
            args.arch.unwrap_or(defaults.arch),
            &args.runner_version,
            &args.download_base_url,
        );

        Ok(Self {
            repository: Repository::new(args.owner, args.repo),
            credential: args.token,
            runner_count: args.runner_count,
            runner_name: args.runner_name,
            root_directory,
            configure: ConfigureOptions {
                platform: release.os,
                server_url: args.server_url.trim_end_matches('/').to_string(),
                labels,
                replace: args.replace,
                allow_run_as_root: args.allow_run_as_root,
            },
            release,
            api_url: args.api_url.trim_end_matches('/').to_string(),
        })
    }
}
