//! Client for a Piston-style execution backend.
//!
//! One request carries a single file plus the resolved runtime version; the
//! reply's `run.output` is the program output. Test input is never piped:
//! the grader splices it into the code beforehand, so `stdin` is normally
//! empty here.

use std::time::Duration;

use async_trait::async_trait;
use codegrade_core::domain::{CodeExecutor, ExecutorError, Language};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExecutorConfig;

pub struct PistonExecutor {
    client: reqwest::Client,
    execute_url: String,
}

impl PistonExecutor {
    pub fn new(config: &ExecutorConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            execute_url: config.execute_url.clone(),
        })
    }

    fn runtime_version(language: &Language) -> &'static str {
        match language {
            Language::Python3 => "3.10.0",
            Language::Java => "15.0.2",
            Language::Cpp => "10.2.0",
            // Everything else, JavaScript included, rides the backend default.
            _ => "3.10.0",
        }
    }

    fn file_extension(language: &Language) -> &'static str {
        match language {
            Language::Python3 => "py",
            Language::Java => "java",
            Language::Cpp => "cpp",
            _ => "txt",
        }
    }
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<FilePayload<'a>>,
    stdin: &'a str,
}

#[derive(Debug, Serialize)]
struct FilePayload<'a> {
    name: String,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    run: Option<RunRecord>,
}

#[derive(Debug, Deserialize, Default)]
struct RunRecord {
    stdout: Option<String>,
    stderr: Option<String>,
    output: Option<String>,
}

/// Applies the output/stderr fallback ladder to one run record.
fn output_from_run(run: RunRecord) -> Result<String, ExecutorError> {
    if let Some(output) = run.output.or(run.stdout) {
        return Ok(output.trim().to_string());
    }

    match run.stderr {
        Some(stderr) if !stderr.trim().is_empty() => {
            Err(ExecutorError::Stderr(stderr.trim().to_string()))
        }
        _ => Err(ExecutorError::NoOutput),
    }
}

#[async_trait]
impl CodeExecutor for PistonExecutor {
    async fn execute(
        &self,
        code: &str,
        language: &Language,
        stdin: &str,
    ) -> Result<String, ExecutorError> {
        let request = ExecuteRequest {
            language: language.tag(),
            version: Self::runtime_version(language),
            files: vec![FilePayload {
                name: format!("Main.{}", Self::file_extension(language)),
                content: code,
            }],
            stdin,
        };

        debug!(language = %language, url = %self.execute_url, "dispatching code to execution backend");

        let response = self
            .client
            .post(&self.execute_url)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ExecutorError::Unavailable(e.to_string()))?;

        let body: ExecuteResponse = response
            .json()
            .await
            .map_err(|_| ExecutorError::EmptyResponse)?;

        let run = body.run.ok_or(ExecutorError::NoRunData)?;
        output_from_run(run)
    }
}
