//! Local execution of code snippets.
//!
//! Snippets are written to a temporary file and run by an external
//! interpreter with captured output and a hard timeout.

use async_trait::async_trait;
use crate::errors::ExecutorError;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute_code(&self, code: &str) -> Result<ExecutionResult, ExecutorError>;
}

pub mod process;

pub use process::ProcessCodeExecutor;
