//! Subprocess-backed probe invoker

use super::{ProbeCommand, ProbeError, ProbeInvoker, ProbeOutput};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Runs probes as child processes on the tokio runtime
#[derive(Debug, Clone, Default)]
pub struct SystemProbeInvoker;

impl SystemProbeInvoker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProbeInvoker for SystemProbeInvoker {
    async fn invoke(&self, command: &ProbeCommand, timeout: Duration) -> Result<ProbeOutput, ProbeError> {
        let started = Instant::now();

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future on timeout kills the child
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ProbeError::NotFound {
                    program: command.program.clone(),
                },
                _ => ProbeError::Launch {
                    program: command.program.clone(),
                    message: e.to_string(),
                },
            })?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::Timeout {
                program: command.program.clone(),
                timeout,
            })?
            .map_err(|e| ProbeError::Launch {
                program: command.program.clone(),
                message: e.to_string(),
            })?;

        Ok(ProbeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            duration: started.elapsed(),
        })
    }
}
