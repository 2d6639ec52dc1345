use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tempfile::Builder;
use tokio::process::Command;

use super::{CodeExecutor, ExecutionResult};
use crate::config::ExecutorConfig;
use crate::errors::ExecutorError;

pub struct ProcessCodeExecutor {
    interpreter: String,
    timeout_seconds: u64,
}

impl ProcessCodeExecutor {
    pub fn new(interpreter: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout_seconds,
        }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(config.interpreter.clone(), config.timeout_secs)
    }
}

#[async_trait]
impl CodeExecutor for ProcessCodeExecutor {
    async fn execute_code(&self, code: &str) -> Result<ExecutionResult, ExecutorError> {
        // Removed on drop, whichever way this function returns.
        let mut script = Builder::new()
            .prefix("codemate-snippet-")
            .suffix(".py")
            .tempfile()?;
        script.write_all(code.as_bytes())?;
        script.flush()?;

        log::debug!(
            "Running {} with {} (timeout {}s)",
            script.path().display(),
            self.interpreter,
            self.timeout_seconds
        );

        let child = Command::new(&self.interpreter)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                interpreter: self.interpreter.clone(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(
            Duration::from_secs(self.timeout_seconds),
            child.wait_with_output(),
        )
        .await
        {
            Ok(output) => output?,
            Err(_) => {
                log::warn!("Snippet exceeded {}s and was killed", self.timeout_seconds);
                return Err(ExecutorError::Timeout(self.timeout_seconds));
            }
        };

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
