//! Subprocess humanizer — pipes content through an external rewrite script.
//!
//! Contract with the script: content in on stdin, rewritten text out on
//! stdout, non-zero exit (with stderr) on failure. Empty output falls back to
//! the input unchanged rather than losing the article.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::clients::{Humanizer, StepError};

#[derive(Clone)]
pub struct ScriptHumanizer {
    script_path: String,
    timeout_secs: u64,
}

impl ScriptHumanizer {
    pub fn new(script_path: String, timeout_secs: u64) -> Self {
        Self {
            script_path,
            timeout_secs,
        }
    }

    async fn run_script(&self, content: &str) -> Result<String, StepError> {
        let mut child = Command::new("python3")
            .arg(&self.script_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| StepError::Script("Failed to open script stdin".to_string()))?;
        stdin.write_all(content.as_bytes()).await?;
        drop(stdin); // close stdin so the script sees EOF

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("Humanizer exited with {}", output.status)
            } else {
                stderr
            };
            return Err(StepError::Script(message));
        }

        let result = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Humanizer produced {} bytes", result.len());

        // An empty rewrite is not worth failing the post over.
        if result.is_empty() {
            Ok(content.to_string())
        } else {
            Ok(result)
        }
    }
}

#[async_trait]
impl Humanizer for ScriptHumanizer {
    async fn humanize(&self, content: &str) -> Result<String, StepError> {
        let duration = std::time::Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(duration, self.run_script(content)).await {
            Ok(result) => result,
            Err(_) => Err(StepError::Timeout(self.timeout_secs)),
        }
    }
}
