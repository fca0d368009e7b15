use crate::error::CollectorError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INFLUX_HOST: &str = "localhost";
pub const DEFAULT_INFLUX_PORT: u16 = 8086;
pub const DEFAULT_MESHTASTIC_BIN: &str = "meshtastic";
pub const DEFAULT_WINDOW_SECS: i64 = 60;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one collection run, built once at startup.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub influx: InfluxConfig,
    pub mesh: MeshCliConfig,
    /// Nodes not heard within this many seconds are skipped
    pub window_secs: i64,
    pub fail_on_write_error: bool,
    pub dry_run: bool,
}

/// InfluxDB 1.x connection settings
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub ssl: bool,
    pub timeout: Duration,
}

/// How to invoke the Meshtastic command-line client
#[derive(Debug, Clone)]
pub struct MeshCliConfig {
    pub program: PathBuf,
    pub host: String,
    pub timeout: Duration,
}

impl CollectorConfig {
    pub fn new(influx: InfluxConfig, mesh: MeshCliConfig) -> Self {
        Self {
            influx,
            mesh,
            window_secs: DEFAULT_WINDOW_SECS,
            fail_on_write_error: false,
            dry_run: false,
        }
    }

    /// Reject settings that would only fail later in the run.
    pub fn validate(&self) -> Result<(), CollectorError> {
        if self.mesh.host.trim().is_empty() {
            return Err(CollectorError::Config(
                "mesh node host is empty (set MESH_NODE_HOST)".to_string(),
            ));
        }
        if self.mesh.program.as_os_str().is_empty() {
            return Err(CollectorError::Config(
                "meshtastic binary path is empty".to_string(),
            ));
        }
        if self.influx.database.trim().is_empty() {
            return Err(CollectorError::Config(
                "InfluxDB database is empty (set INFLUXDB_DB)".to_string(),
            ));
        }
        if self.influx.host.trim().is_empty() {
            return Err(CollectorError::Config(
                "InfluxDB host is empty (set INFLUXDB_HOST)".to_string(),
            ));
        }
        Ok(())
    }
}

impl InfluxConfig {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_INFLUX_HOST.to_string(),
            port: DEFAULT_INFLUX_PORT,
            username: None,
            password: None,
            database: database.into(),
            ssl: false,
            timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!(
            "{scheme}://{host}:{port}",
            host = self.host.trim(),
            port = self.port
        )
    }
}

impl MeshCliConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_MESHTASTIC_BIN),
            host: host.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}
