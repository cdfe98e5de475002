// The runner package: which release to fetch, how to fetch it, and how to
// unpack it into a runner directory.

pub mod downloader;
pub mod extractor;
pub mod runner_release;

pub use downloader::{PackageDownload, PackageDownloader};
pub use extractor::PackageExtractor;
pub use runner_release::RunnerRelease;
