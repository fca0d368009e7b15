use crate::output::OutputFormat;
use clap::Parser;
use meshflux_core::{CollectorConfig, InfluxConfig, MeshCliConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "meshflux")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Meshtastic node to query (hostname or IP address)
    #[arg(long, env = "MESH_NODE_HOST")]
    pub mesh_host: Option<String>,

    /// Path to the meshtastic command-line client
    #[arg(long, env = "MESHTASTIC_BIN", default_value = "meshtastic")]
    pub meshtastic_bin: PathBuf,

    /// How long to wait for the meshtastic client (e.g. 30s, 2m)
    #[arg(long, env = "MESH_COMMAND_TIMEOUT", default_value = "60s", value_parser = humantime::parse_duration)]
    pub command_timeout: Duration,

    /// Only nodes heard within this many seconds are written
    #[arg(long, env = "TIME_OFFSET", default_value_t = 60, allow_negative_numbers = true)]
    pub time_offset: i64,

    /// InfluxDB host
    #[arg(long, env = "INFLUXDB_HOST", default_value = "localhost")]
    pub influx_host: String,

    /// InfluxDB HTTP port
    #[arg(long, env = "INFLUXDB_PORT", default_value_t = 8086)]
    pub influx_port: u16,

    /// InfluxDB user
    #[arg(long, env = "INFLUXDB_USER")]
    pub influx_user: Option<String>,

    /// InfluxDB password
    #[arg(long, env = "INFLUXDB_PASSWORD", hide_env_values = true)]
    pub influx_password: Option<String>,

    /// InfluxDB database to write to
    #[arg(long, env = "INFLUXDB_DB")]
    pub influx_db: Option<String>,

    /// Connect to InfluxDB over HTTPS
    #[arg(long, env = "INFLUXDB_SSL")]
    pub influx_ssl: bool,

    /// Timeout for the InfluxDB write (e.g. 10s)
    #[arg(long, env = "INFLUXDB_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub write_timeout: Duration,

    /// Collect and print points without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 when the database write fails
    #[arg(long, env = "FAIL_ON_WRITE_ERROR")]
    pub fail_on_write_error: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn collector_config(&self) -> CollectorConfig {
        let influx = InfluxConfig {
            host: self.influx_host.clone(),
            port: self.influx_port,
            username: self.influx_user.clone(),
            password: self.influx_password.clone(),
            database: self.influx_db.clone().unwrap_or_default(),
            ssl: self.influx_ssl,
            timeout: self.write_timeout,
        };
        let mesh = MeshCliConfig {
            program: self.meshtastic_bin.clone(),
            host: self.mesh_host.clone().unwrap_or_default(),
            timeout: self.command_timeout,
        };

        CollectorConfig {
            window_secs: self.time_offset,
            fail_on_write_error: self.fail_on_write_error,
            dry_run: self.dry_run,
            ..CollectorConfig::new(influx, mesh)
        }
    }
}
