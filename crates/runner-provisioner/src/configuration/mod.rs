// Runner configuration: input validation and the call into the runner
// package's own configuration script.

pub mod runner_configurator;
pub mod validators;

pub use runner_configurator::{ConfigureOptions, RunnerConfigurator};
