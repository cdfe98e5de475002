use anyhow::{Context, Result};
use provisioner_common::Tracing;
use provisioner_sdk::{ProcessInvoker, TraceWriter, WhichUtil};
use std::path::Path;
use std::sync::Arc;

/// Unpacks a runner package with the system `tar`.
///
/// GNU tar handles the `.tar.gz` packages; the bsdtar shipped with Windows
/// also reads the `.zip` package.
pub struct PackageExtractor {
    invoker: ProcessInvoker,
    trace: Tracing,
}

impl PackageExtractor {
    pub fn new(trace: Tracing) -> Self {
        let invoker = ProcessInvoker::new(Arc::new(trace.clone()) as Arc<dyn TraceWriter>);
        Self { invoker, trace }
    }

    /// Extract `archive` into `destination`. A non-zero `tar` exit is an error.
    pub async fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        self.trace.info(&format!(
            "Extracting {} into {}.",
            archive.display(),
            destination.display()
        ));

        let tar = WhichUtil::which("tar")?;

        let arguments = tar_arguments(archive, destination);
        self.invoker
            .execute(destination, &tar.to_string_lossy(), &arguments, None)
            .await
            .with_context(|| format!("Failed to extract '{}'", archive.display()))?;

        self.trace.info("Runner package extracted successfully.");
        Ok(())
    }
}

fn tar_arguments(archive: &Path, destination: &Path) -> Vec<String> {
    let is_zip = archive
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    let mode = if is_zip { "-xf" } else { "-xzf" };

    vec![
        mode.to_string(),
        archive.to_string_lossy().into_owned(),
        "-C".to_string(),
        destination.to_string_lossy().into_owned(),
    ]
}
