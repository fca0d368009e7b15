use crate::config::MeshCliConfig;
use crate::error::CollectorError;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Something that can produce the `--info` report of a mesh node
pub trait InfoSource {
    fn fetch_info(&self) -> impl Future<Output = Result<String, CollectorError>> + Send;
}

/// Runs the Meshtastic command-line client against a networked node
#[derive(Debug, Clone)]
pub struct MeshCli {
    program: PathBuf,
    host: String,
    timeout: Duration,
}

impl MeshCli {
    pub fn new(config: &MeshCliConfig) -> Self {
        Self {
            program: config.program.clone(),
            host: config.host.clone(),
            timeout: config.timeout,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--host")
            .arg(&self.host)
            .arg("--info")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

impl InfoSource for MeshCli {
    async fn fetch_info(&self) -> Result<String, CollectorError> {
        let program = self.program.display().to_string();
        info!("Querying node {host} via {program}", host = self.host);

        // The child is killed when the output future is dropped on timeout
        let mut command = self.command();
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                CollectorError::Command(format!("failed to start {program}: {e}"))
            })?,
            Err(_) => {
                return Err(CollectorError::Command(format!(
                    "{program} did not finish within {timeout:?}",
                    timeout = self.timeout
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollectorError::Command(format!(
                "{program} exited with {status}: {stderr}",
                status = output.status,
                stderr = stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("Received {len} bytes of node report", len = stdout.len());
        Ok(stdout)
    }
}
