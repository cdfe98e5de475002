// runner-provisioner: prepares and registers self-hosted GitHub Actions runners.
//
// Flow:
//   main → ProvisionSettings::from_args → Provisioner::provision
//   provision → RegistrationTokenProvider (once)
//             → for each runner: PackageDownloader → PackageExtractor → RunnerConfigurator

pub mod command_settings;
pub mod configuration;
pub mod github;
pub mod package;
pub mod provisioner;

#[cfg(test)]
pub(crate) mod test_support;

pub use command_settings::{Args, ProvisionSettings};
pub use provisioner::{ProvisionReport, ProvisionedRunner, Provisioner};
