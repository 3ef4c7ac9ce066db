use std::path::{ Path, PathBuf };
use std::process::Stdio;
use std::time::{ Duration, Instant };

use async_trait::async_trait;
use log::{ debug, info, warn };
use tokio::process::Command;

use crate::config::VerifierConfig;
use crate::errors::{ SynthError, SynthResult };
use crate::models::verification::VerifierRun;
use crate::traits::verifier_runner::VerifierRunner;

/// Runs KeY in batch mode (`java -jar key.jar --auto <file>`)
#[derive(Debug, Clone)]
pub struct KeyVerifierRunner {
    java: PathBuf,
    config: VerifierConfig,
}

impl KeyVerifierRunner {
    pub fn new(mut config: VerifierConfig) -> Self {
        let java = config.java.clone().unwrap_or_else(find_java_executable);
        debug!("Using java executable {}", java.display());

        // KeY runs from the project context, so a relative jar path must be pinned now
        if config.key_jar.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                config.key_jar = cwd.join(&config.key_jar);
            }
        }

        Self { java, config }
    }

    fn command(&self, artifact: &Path, context_dir: &Path) -> Command {
        let mut command = Command::new(&self.java);
        command
            .arg("-jar")
            .arg(&self.config.key_jar)
            .args(&self.config.args)
            .arg(artifact)
            .current_dir(context_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl VerifierRunner for KeyVerifierRunner {
    async fn run(
        &self,
        artifact: &Path,
        context_dir: &Path,
        budget: Duration,
    ) -> SynthResult<VerifierRun> {
        if !self.config.key_jar.is_file() {
            return Err(SynthError::ExternalToolError {
                tool: "KeY".to_string(),
                message: format!("KeY jar not found: {}", self.config.key_jar.display()),
            });
        }

        info!("Running KeY on {}", artifact.display());
        let start = Instant::now();
        let child = self
            .command(artifact, context_dir)
            .spawn()
            .map_err(|e| SynthError::ExternalToolError {
                tool: "KeY".to_string(),
                message: format!("failed to launch {}: {}", self.java.display(), e),
            })?;

        // Dropping the pending future on expiry kills the child
        let output = match tokio::time::timeout(budget, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("KeY exceeded its budget of {}s", budget.as_secs());
                return Ok(VerifierRun::timed_out(String::new()));
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            text.push('\n');
            text.push_str(&stderr);
        }

        debug!(
            "KeY finished in {} ms with status {:?}",
            start.elapsed().as_millis(),
            output.status.code()
        );

        Ok(VerifierRun {
            exit_status: output.status.code(),
            output: text,
            timed_out: false,
        })
    }

    fn name(&self) -> &str {
        "KeY"
    }
}

/// `$JAVA`, then `$JAVA_HOME/bin/java`, then whatever `java` resolves to on `PATH`
fn find_java_executable() -> PathBuf {
    if let Some(java) = std::env::var_os("JAVA").map(PathBuf::from) {
        if java.is_file() {
            return java;
        }
    }

    if let Some(home) = std::env::var_os("JAVA_HOME").map(PathBuf::from) {
        let binary = if cfg!(windows) { "java.exe" } else { "java" };
        let candidate = home.join("bin").join(binary);
        if candidate.is_file() {
            return candidate;
        }
    }

    PathBuf::from("java")
}
