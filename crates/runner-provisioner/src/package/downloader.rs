// Streaming download of the runner package.
//
// A download is split in two steps so the caller can learn whether the
// server will deliver the package before touching the filesystem:
// `PackageDownloader::start` sends the request and checks the status,
// `PackageDownload::save_to` streams the body to disk.

use anyhow::{Context, Result};
use futures::StreamExt;
use provisioner_common::constants::runner_package::{DOWNLOAD_CHUNK_SIZE, PARTIAL_SUFFIX};
use provisioner_common::{HttpStatusError, Tracing};
use provisioner_sdk::TraceWriter;
use reqwest::{Client, Response};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub struct PackageDownloader {
    client: Client,
    trace: Tracing,
}

impl PackageDownloader {
    pub fn new(client: Client, trace: Tracing) -> Self {
        Self { client, trace }
    }

    /// Send the GET request for `url` and fail unless the server answered
    /// with a success status. Nothing is written yet.
    pub async fn start(&self, url: &str) -> Result<PackageDownload> {
        self.trace.info(&format!("Downloading runner package from {url}."));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send download request to {url}"))?;

        let response = HttpStatusError::check(response, "Runner package download").await?;

        Ok(PackageDownload {
            response,
            trace: self.trace.clone(),
        })
    }
}

/// An accepted download whose body has not been read yet.
pub struct PackageDownload {
    response: Response,
    trace: Tracing,
}

impl PackageDownload {
    /// Size announced by the server, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Stream the body to `destination`, never holding more than one
    /// network chunk in memory.
    ///
    /// Bytes go to `<destination>.partial` first and the file is renamed once
    /// the stream is complete, so a truncated archive never carries the final
    /// name. On failure the partial file is removed.
    pub async fn save_to(self, destination: &Path) -> Result<u64> {
        let partial = partial_path(destination);
        let trace = self.trace.clone();

        let written = match stream_to_file(self.response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        tokio::fs::rename(&partial, destination)
            .await
            .with_context(|| {
                format!(
                    "Failed to move '{}' to '{}'",
                    partial.display(),
                    destination.display()
                )
            })?;

        trace.info(&format!(
            "Runner package downloaded successfully to {} ({written} bytes).",
            destination.display()
        ));
        Ok(written)
    }
}

async fn stream_to_file(response: Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create '{}'", path.display()))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Failed to read runner package download stream")?;
        for piece in chunk.chunks(DOWNLOAD_CHUNK_SIZE) {
            file.write_all(piece)
                .await
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            written += piece.len() as u64;
        }
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush '{}'", path.display()))?;
    Ok(written)
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}
