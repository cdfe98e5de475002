// RunnerConfigurator: registers an extracted runner with GitHub by running
// the package's configuration script inside the runner directory.

use anyhow::{Context, Result};
use provisioner_common::constants::variables;
use provisioner_common::{OsPlatform, SecretMasker, Tracing};
use provisioner_sdk::{ProcessExitCodeError, ProcessInvoker, TraceWriter};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::github::Repository;

/// Settings that are the same for every runner of one provisioning run.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Platform of the extracted package; selects `config.sh` or `config.cmd`.
    pub platform: OsPlatform,
    /// Web URL of the GitHub server the repository lives on.
    pub server_url: String,
    pub labels: Option<String>,
    pub replace: bool,
    pub allow_run_as_root: bool,
}

pub struct RunnerConfigurator {
    options: ConfigureOptions,
    invoker: ProcessInvoker,
    secret_masker: Arc<SecretMasker>,
    trace: Tracing,
}

impl RunnerConfigurator {
    pub fn new(options: ConfigureOptions, secret_masker: Arc<SecretMasker>, trace: Tracing) -> Self {
        let invoker = ProcessInvoker::new(Arc::new(trace.clone()) as Arc<dyn TraceWriter>);
        Self {
            options,
            invoker,
            secret_masker,
            trace,
        }
    }

    /// Run the configuration script in `runner_directory`, registering the
    /// runner as `runner_name` against `repository` with `token`.
    pub async fn configure(
        &self,
        runner_directory: &Path,
        runner_name: &str,
        repository: &Repository,
        token: &str,
    ) -> Result<()> {
        self.trace.info(&format!(
            "Configuring runner {runner_name} in {}.",
            runner_directory.display()
        ));

        let script = runner_directory.join(self.options.platform.config_script());
        if !script.is_file() {
            anyhow::bail!(
                "Configuration script '{}' not found; the runner package was not extracted correctly",
                script.display()
            );
        }

        let arguments = self.config_arguments(runner_name, repository, token);

        let mut environment = HashMap::new();
        if self.options.allow_run_as_root {
            environment.insert(variables::ALLOW_RUN_AS_ROOT.to_string(), "1".to_string());
        }

        self.invoker
            .execute(
                runner_directory,
                &script.to_string_lossy(),
                &arguments,
                Some(&environment),
            )
            .await
            .map_err(|e| self.mask_exit_error(e))
            .with_context(|| format!("Failed to configure runner {runner_name}"))?;

        self.trace.info("Runner configured successfully.");
        Ok(())
    }

    /// Arguments for the configuration script. `--unattended` keeps it from
    /// prompting, and `--name` keeps runners on one host from colliding.
    pub fn config_arguments(
        &self,
        runner_name: &str,
        repository: &Repository,
        token: &str,
    ) -> Vec<String> {
        let mut args = vec![
            "--url".to_string(),
            repository.html_url(&self.options.server_url),
            "--token".to_string(),
            token.to_string(),
            "--unattended".to_string(),
            "--name".to_string(),
            runner_name.to_string(),
        ];

        if let Some(labels) = self.options.labels.as_deref().filter(|l| !l.is_empty()) {
            args.push("--labels".to_string());
            args.push(labels.to_string());
        }

        if self.options.replace {
            args.push("--replace".to_string());
        }

        args
    }

    /// The exit-code error echoes the arguments, which include the token.
    fn mask_exit_error(&self, err: anyhow::Error) -> anyhow::Error {
        match err.downcast::<ProcessExitCodeError>() {
            Ok(exit) => ProcessExitCodeError {
                arguments: self.secret_masker.mask_secrets(&exit.arguments),
                ..exit
            }
            .into(),
            Err(other) => other,
        }
    }
}
