// provisioner-sdk: Foundation layer for the runner provisioner.
// This crate has no dependencies on other provisioner crates and provides
// the trace-writer abstraction, process invocation, and build metadata.

pub mod build_constants;
pub mod process_invoker;
pub mod trace;
pub mod which_util;

// Re-export commonly used items at crate root
pub use build_constants::{RunnerPackage, Source};
pub use process_invoker::{ProcessExitCodeError, ProcessInvoker};
pub use trace::TraceWriter;
pub use which_util::WhichUtil;
