use crate::trace::TraceWriter;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Error type for non-zero process exit codes.
#[derive(Debug, thiserror::Error)]
#[error(
    "Exit code {exit_code} returned from process: file name '{file_name}', arguments '{arguments}'."
)]
pub struct ProcessExitCodeError {
    pub exit_code: i32,
    pub file_name: String,
    pub arguments: String,
}

/// Runs an external tool to completion and forwards its output, line by line,
/// to a trace writer.
///
/// The child always gets an explicit working directory; the invoker never
/// touches the current directory of its own process. Stdin is closed, so
/// tools that would prompt interactively fail fast instead of hanging.
pub struct ProcessInvoker {
    trace: Arc<dyn TraceWriter>,
}

impl ProcessInvoker {
    /// Create a new `ProcessInvoker` with the given trace writer.
    pub fn new(trace: Arc<dyn TraceWriter>) -> Self {
        Self { trace }
    }

    /// Execute a process and wait for it to exit.
    ///
    /// # Arguments
    /// * `working_directory` - The working directory for the child. Must exist.
    /// * `file_name` - The executable to run.
    /// * `arguments` - Command-line arguments, passed through without shell parsing.
    /// * `environment` - Optional environment variable overrides.
    ///
    /// A non-zero exit, or death by signal, is returned as a
    /// [`ProcessExitCodeError`].
    pub async fn execute(
        &self,
        working_directory: &Path,
        file_name: &str,
        arguments: &[String],
        environment: Option<&HashMap<String, String>>,
    ) -> Result<()> {
        anyhow::ensure!(!file_name.is_empty(), "file_name must not be empty");
        anyhow::ensure!(
            working_directory.is_dir(),
            "Working directory '{}' does not exist",
            working_directory.display()
        );

        let joined_arguments = arguments.join(" ");
        self.trace.info("Starting process:");
        self.trace.info(&format!("  File name: '{file_name}'"));
        self.trace.info(&format!("  Arguments: '{joined_arguments}'"));
        self.trace.info(&format!(
            "  Working directory: '{}'",
            working_directory.display()
        ));

        let mut cmd = Command::new(file_name);
        cmd.args(arguments)
            .current_dir(working_directory)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        if let Some(env) = environment {
            cmd.envs(env);
        }

        let start = std::time::Instant::now();
        let mut child = cmd.spawn().with_context(|| {
            format!("Failed to start process '{file_name}' in '{}'", working_directory.display())
        })?;

        let pid = child.id().unwrap_or(0);
        self.trace
            .info(&format!("Process started with process id {pid}, waiting for process exit."));

        let stdout_task = child
            .stdout
            .take()
            .map(|stdout| tokio::spawn(forward_lines(stdout, self.trace.clone(), "STDOUT")));
        let stderr_task = child
            .stderr
            .take()
            .map(|stderr| tokio::spawn(forward_lines(stderr, self.trace.clone(), "STDERR")));

        let status = child
            .wait()
            .await
            .context("Failed to wait for process")?;

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            let _ = task.await;
        }

        let exit_code = status.code().unwrap_or(-1);
        self.trace.info(&format!(
            "Finished process {pid} with exit code {exit_code}, and elapsed time {:.2?}.",
            start.elapsed()
        ));

        if exit_code != 0 {
            return Err(ProcessExitCodeError {
                exit_code,
                file_name: file_name.to_string(),
                arguments: joined_arguments,
            }
            .into());
        }

        Ok(())
    }
}

/// Forward every line of `stream` to the trace. Bytes that are not UTF-8 are
/// replaced rather than ending the read; the pipe must stay drained until EOF
/// or the child dies on its next write.
async fn forward_lines<R>(stream: R, trace: Arc<dyn TraceWriter>, label: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                trace.info(line.trim_end_matches(['\n', '\r']));
            }
            Err(e) => {
                trace.verbose(&format!("{label} stream read failed: {e}"));
                break;
            }
        }
    }
    trace.verbose(&format!("{label} stream read finished."));
}
