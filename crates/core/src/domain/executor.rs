use async_trait::async_trait;
use thiserror::Error;

use super::Language;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("execution backend unavailable: {0}")]
    Unavailable(String),
    #[error("no response body received from execution backend")]
    EmptyResponse,
    #[error("no run record in execution backend response")]
    NoRunData,
    #[error("no output received from code execution")]
    NoOutput,
    #[error("code execution error: {0}")]
    Stderr(String),
}

/// Port to the external untrusted-code execution backend. The grader embeds
/// test input into the code beforehand, so it always passes an empty stdin;
/// the parameter exists so alternate backends that do pipe input can be
/// substituted without changing the grader.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(
        &self,
        code: &str,
        language: &Language,
        stdin: &str,
    ) -> Result<String, ExecutorError>;
}
