//! Local executable launched when the target is down.

use std::future::Future;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors that prevent the remediation from running to completion.
///
/// A non-zero exit status is not one of them; see [`RemediationReport`].
#[derive(Debug, Error)]
pub enum RemediationError {
    #[error("failed to launch {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to capture output of {}: {source}", path.display())]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {}: {source}", path.display())]
    Wait {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("remediation task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What a completed remediation run produced.
#[derive(Debug, Clone)]
pub struct RemediationReport {
    /// Interleaved stdout and stderr, lossily decoded as UTF-8.
    pub output: String,
    pub status: ExitStatus,
    pub elapsed: Duration,
}

impl RemediationReport {
    /// `None` when the process was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn success(&self) -> bool {
        self.status.success()
    }
}

pub trait Remediation {
    fn invoke(&self) -> impl Future<Output = Result<RemediationReport, RemediationError>> + Send;
}

/// Runs an executable with no arguments and no stdin, without a timeout.
#[derive(Debug, Clone)]
pub struct ExecutableRemediation {
    path: PathBuf,
}

impl ExecutableRemediation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Remediation for ExecutableRemediation {
    async fn invoke(&self) -> Result<RemediationReport, RemediationError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || run_to_completion(&path)).await?
    }
}

fn run_to_completion(path: &Path) -> Result<RemediationReport, RemediationError> {
    let capture_err = |source: std::io::Error| RemediationError::Capture {
        path: path.to_path_buf(),
        source,
    };

    let start = Instant::now();

    // stdout and stderr share one pipe so their output stays interleaved.
    let (mut reader, writer) = std::io::pipe().map_err(capture_err)?;
    let stderr = writer.try_clone().map_err(capture_err)?;

    let mut child = {
        let mut command = Command::new(path);
        command.stdin(Stdio::null()).stdout(writer).stderr(stderr);
        command.spawn().map_err(|source| RemediationError::Launch {
            path: path.to_path_buf(),
            source,
        })?
        // `command` drops here, closing our copies of the write end.
    };

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);

    let status = child.wait().map_err(|source| RemediationError::Wait {
        path: path.to_path_buf(),
        source,
    })?;
    read.map_err(capture_err)?;

    Ok(RemediationReport {
        output: String::from_utf8_lossy(&output).into_owned(),
        status,
        elapsed: start.elapsed(),
    })
}
