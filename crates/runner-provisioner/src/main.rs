// Entry point for `create-runners`.
//
// Parses the command line, builds the HostContext and hands the validated
// settings to the Provisioner. Exit code 0 on success, 1 on any failure;
// clap exits with 2 on an invalid command line.

use clap::Parser;
use provisioner_common::constants::{self, return_code};
use provisioner_common::HostContext;
use provisioner_sdk::build_constants::{RunnerPackage, Source};
use provisioner_sdk::TraceWriter;
use runner_provisioner::{Args, ProvisionSettings, Provisioner};

fn main() {
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to build Tokio runtime: {e}");
            std::process::exit(return_code::TERMINATED_ERROR);
        }
    };

    let exit_code = runtime.block_on(async move { run(args).await });

    std::process::exit(exit_code);
}

async fn run(args: Args) -> i32 {
    // Stdout is reserved for the ACTIONS_RUNNER_PRINT_LOG_TO_STDOUT echo.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Runner provisioner starting.");
    tracing::info!("  Version = {}", RunnerPackage::VERSION);
    tracing::info!("  Commit  = {}", Source::COMMIT_HASH);
    tracing::info!(
        "  Platform = {} / {}",
        constants::CURRENT_PLATFORM,
        constants::CURRENT_ARCHITECTURE
    );

    // Validation messages never echo the credential.
    let settings = match ProvisionSettings::from_args(args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid arguments: {:#}", e);
            return return_code::TERMINATED_ERROR;
        }
    };

    let context = HostContext::new(settings.root_directory.clone());
    let trace = context.get_trace("CreateRunners");
    trace.info(&format!(
        "Runner directories will be created under {}.",
        context.root_directory().display()
    ));

    let result = match Provisioner::new(context.clone(), settings) {
        Ok(provisioner) => provisioner.provision().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => {
            trace.info(&format!("Provisioned {} runner(s).", report.runners.len()));
            return_code::SUCCESS
        }
        Err(e) => {
            trace.error_chain(&e);
            return_code::TERMINATED_ERROR
        }
    }
}
