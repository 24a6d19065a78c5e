//! Subprocess execution for the external media tools.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;

/// Characters that have no business in a binary path.
const DANGEROUS_PATH_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Stderr is truncated to its last `STDERR_TAIL_CHARS` characters.
const STDERR_TAIL_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid {tool} path: {reason}")]
    InvalidPath { tool: &'static str, reason: String },

    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} exited successfully but produced no output at {}", .path.display())]
    MissingOutput { tool: &'static str, path: PathBuf },
}

impl ToolError {
    pub fn tool(&self) -> &'static str {
        match self {
            ToolError::InvalidPath { tool, .. }
            | ToolError::Spawn { tool, .. }
            | ToolError::Failed { tool, .. }
            | ToolError::MissingOutput { tool, .. } => *tool,
        }
    }
}

/// Reject empty paths and paths carrying shell metacharacters.
pub fn validate_tool_path(tool: &'static str, path: &str) -> Result<(), ToolError> {
    if path.trim().is_empty() {
        return Err(ToolError::InvalidPath {
            tool,
            reason: "path is empty".to_string(),
        });
    }
    if path.chars().any(|c| DANGEROUS_PATH_CHARS.contains(&c)) {
        return Err(ToolError::InvalidPath {
            tool,
            reason: "contains dangerous characters".to_string(),
        });
    }
    Ok(())
}

/// Run `program` with `args` and require that it exits zero and leaves `output` behind.
///
/// Arguments are passed as a vector, never through a shell. The child is killed
/// if the returned future is dropped.
pub async fn run_tool(
    tool: &'static str,
    program: &str,
    args: &[String],
    output: &Path,
) -> Result<(), ToolError> {
    let start = Instant::now();
    tracing::debug!(tool = tool, program = %program, args = ?args, "Running external tool");

    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ToolError::Spawn { tool, source })?;

    if !result.status.success() {
        let status = match result.status.code() {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = stderr_tail(&result.stderr, STDERR_TAIL_CHARS);
        tracing::warn!(
            tool = tool,
            status = %status,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "External tool failed"
        );
        return Err(ToolError::Failed {
            tool,
            status,
            stderr,
        });
    }

    if !tokio::fs::try_exists(output).await.unwrap_or(false) {
        return Err(ToolError::MissingOutput {
            tool,
            path: output.to_path_buf(),
        });
    }

    tracing::info!(
        tool = tool,
        output = %output.display(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "External tool finished"
    );

    Ok(())
}

fn stderr_tail(stderr: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}
