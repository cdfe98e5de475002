// Provisioner: drives one provisioning run from token to configured runners.
//
// The registration token is requested once. Each runner then goes through
// download, extraction and configuration in its own `{name}_{index}`
// directory, strictly one after another. The first failure ends the run.

use anyhow::{Context, Result};
use provisioner_common::{HostContext, HttpClientFactory, Tracing};
use provisioner_sdk::TraceWriter;
use std::path::PathBuf;
use std::sync::Arc;

use crate::command_settings::ProvisionSettings;
use crate::configuration::RunnerConfigurator;
use crate::github::{GitHubTokenClient, RegistrationTokenProvider};
use crate::package::{PackageDownloader, PackageExtractor};

/// Name of the directory (and runner) with the given index.
pub fn runner_directory_name(runner_name: &str, index: u32) -> String {
    format!("{runner_name}_{index}")
}

/// A runner that was downloaded, extracted and configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedRunner {
    pub name: String,
    pub directory: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub runners: Vec<ProvisionedRunner>,
}

pub struct Provisioner {
    context: Arc<HostContext>,
    settings: ProvisionSettings,
    token_provider: Arc<dyn RegistrationTokenProvider>,
    downloader: PackageDownloader,
    extractor: PackageExtractor,
    configurator: RunnerConfigurator,
    trace: Tracing,
}

impl Provisioner {
    pub fn new(context: Arc<HostContext>, settings: ProvisionSettings) -> Result<Self> {
        context.add_secret(&settings.credential);

        let client = HttpClientFactory::create_client()?;
        let token_provider = Arc::new(GitHubTokenClient::new(
            client.clone(),
            settings.api_url.clone(),
            settings.credential.clone(),
            context.get_trace("GitHubTokenClient"),
        ));

        Ok(Self {
            downloader: PackageDownloader::new(client, context.get_trace("PackageDownloader")),
            extractor: PackageExtractor::new(context.get_trace("PackageExtractor")),
            configurator: RunnerConfigurator::new(
                settings.configure.clone(),
                context.secret_masker.clone(),
                context.get_trace("RunnerConfigurator"),
            ),
            trace: context.get_trace("Provisioner"),
            token_provider,
            settings,
            context,
        })
    }

    /// Replace the GitHub API client used to obtain the registration token.
    pub fn with_token_provider(mut self, provider: Arc<dyn RegistrationTokenProvider>) -> Self {
        self.token_provider = provider;
        self
    }

    pub async fn provision(&self) -> Result<ProvisionReport> {
        let settings = &self.settings;
        self.trace.info(&format!(
            "Starting creation of {} runners for repository {}.",
            settings.runner_count, settings.repository
        ));

        let token = self
            .token_provider
            .get_registration_token(&settings.repository)
            .await
            .context("Failed to obtain a runner registration token")?;
        self.context.add_secret(&token);

        let mut report = ProvisionReport::default();
        for index in 0..settings.runner_count {
            let runner = self
                .provision_runner(index, &token)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create runner {}",
                        runner_directory_name(&settings.runner_name, index)
                    )
                })?;
            report.runners.push(runner);
        }

        self.trace.info("All runners created successfully.");
        Ok(report)
    }

    async fn provision_runner(&self, index: u32, token: &str) -> Result<ProvisionedRunner> {
        let settings = &self.settings;
        let name = runner_directory_name(&settings.runner_name, index);
        let directory = settings.root_directory.join(&name);
        let archive = directory.join(settings.release.archive_file_name());

        self.trace.info(&format!(
            "Downloading runner package for {} {} to {}.",
            settings.release.os,
            settings.release.arch,
            archive.display()
        ));

        // The directory is only created once the server accepted the request.
        let download = self.downloader.start(&settings.release.download_url()).await?;
        if let Some(length) = download.content_length() {
            self.trace.verbose(&format!("Runner package is {length} bytes."));
        }

        tokio::fs::create_dir_all(&directory)
            .await
            .with_context(|| format!("Failed to create directory '{}'", directory.display()))?;

        download.save_to(&archive).await?;
        self.extractor.extract(&archive, &directory).await?;
        self.configurator
            .configure(&directory, &name, &settings.repository, token)
            .await?;

        self.trace.info(&format!(
            "Runner {name} created successfully in {}.",
            directory.display()
        ));

        Ok(ProvisionedRunner { name, directory })
    }
}
