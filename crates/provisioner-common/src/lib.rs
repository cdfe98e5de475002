// provisioner-common: Shared services and infrastructure for the runner provisioner.
// Depends on `provisioner-sdk`.

pub mod constants;
pub mod exceptions;
pub mod host_context;
pub mod http_client_factory;
pub mod secret_masker;
pub mod tracing;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use constants::{Architecture, OsPlatform, CURRENT_ARCHITECTURE, CURRENT_PLATFORM};
pub use exceptions::HttpStatusError;
pub use host_context::HostContext;
pub use http_client_factory::HttpClientFactory;
pub use secret_masker::SecretMasker;
pub use self::tracing::{TraceEventType, TraceManager, TraceSetting, Tracing};
