//! Curl process executor.
//!
//! # Responsibilities
//! - Run the invocation as a child process, without an intermediate shell
//! - Redirect body and response headers into per-call temp files
//! - Read the status code from the dumped headers
//! - Enforce the optional per-call timeout
//!
//! # Design Decisions
//! - Output-destination options in the user's command are dropped; the executor owns output
//! - `--silent --show-error` keeps progress meters out while still reporting failures
//! - Status comes from the last status line, so redirects followed with `-L` report the final hop

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::time;

use crate::config::ExecutorConfig;
use crate::invocation::flags::{self, Role};
use crate::invocation::Invocation;
use crate::oracle::types::{ExecutionError, Response};
use crate::oracle::Oracle;

/// Options that would redirect output away from the capture sinks.
const OUTPUT_FLAGS: &[&str] = &[
    "-o",
    "--output",
    "-O",
    "--remote-name",
    "--remote-name-all",
    "--output-dir",
    "-J",
    "--remote-header-name",
    "-D",
    "--dump-header",
];

/// Oracle backed by a real curl binary.
#[derive(Debug, Clone)]
pub struct CurlExecutor {
    program: Option<String>,
    timeout: Option<Duration>,
}

impl CurlExecutor {
    /// Create an executor from configuration.
    pub fn new(config: &ExecutorConfig) -> Self {
        Self {
            program: config.curl_binary.clone(),
            timeout: (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs)),
        }
    }

    /// Words to run: program first, output options removed.
    fn argv(&self, command: &str) -> Result<Vec<String>, ExecutionError> {
        let mut invocation =
            Invocation::parse(command).map_err(|e| ExecutionError::InvalidCommand(e.to_string()))?;

        let roles = flags::classify(invocation.args());
        let doomed: Vec<usize> = roles
            .iter()
            .enumerate()
            .filter(|(i, role)| {
                matches!(role, Role::Flag { .. })
                    && OUTPUT_FLAGS.contains(&invocation.args()[*i].value())
            })
            .map(|(i, _)| i)
            .collect();
        for index in doomed.into_iter().rev() {
            invocation.remove_argument(index);
        }

        let mut argv: Vec<String> = invocation.args().iter().map(|a| a.value().to_string()).collect();
        if let Some(program) = &self.program {
            argv[0] = program.clone();
        }
        Ok(argv)
    }
}

#[async_trait]
impl Oracle for CurlExecutor {
    async fn execute(&self, command: &str) -> Result<Response, ExecutionError> {
        let argv = self.argv(command)?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ExecutionError::InvalidCommand(command.to_string()))?;

        let body_sink = capture_sink("curlmin-body-")?;
        let header_sink = capture_sink("curlmin-headers-")?;

        tracing::debug!(command = %command, "Executing curl");

        let mut child = Command::new(program);
        child
            .args(args)
            .arg("--dump-header")
            .arg(header_sink.path())
            .arg("--output")
            .arg(body_sink.path())
            .arg("--silent")
            .arg("--show-error")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = child.output();
        let output = match self.timeout {
            Some(limit) => time::timeout(limit, run)
                .await
                .map_err(|_| ExecutionError::Timeout(limit.as_secs()))?,
            None => run.await,
        }
        .map_err(|source| ExecutionError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(code = ?output.status.code(), stderr = %stderr, "curl failed");
            return Err(ExecutionError::Exit {
                code: output.status.code(),
                stderr,
            });
        }

        let body = tokio::fs::read(body_sink.path())
            .await
            .map_err(ExecutionError::Capture)?;
        let head = tokio::fs::read(header_sink.path())
            .await
            .map_err(ExecutionError::Capture)?;

        let status = parse_status_code(&String::from_utf8_lossy(&head));
        Ok(Response::new(status, body))
    }
}

fn capture_sink(prefix: &str) -> Result<NamedTempFile, ExecutionError> {
    tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".txt")
        .tempfile()
        .map_err(ExecutionError::Capture)
}

/// Status code of the last `HTTP/` status line, or 0.
pub(crate) fn parse_status_code(head: &str) -> u16 {
    head.lines()
        .filter(|line| line.starts_with("HTTP/"))
        .last()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .unwrap_or(0)
}
