//! Core library for meshflux
//!
//! This crate provides the collection pipeline: querying a Meshtastic node
//! through its command-line client, extracting the node table from the
//! report, selecting recently heard nodes and writing their telemetry to
//! InfluxDB as line protocol.

pub mod collect;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod influx;
pub mod line_protocol;
pub mod run;

// Re-export commonly used types
pub use config::{CollectorConfig, InfluxConfig, MeshCliConfig};
pub use error::CollectorError;
pub use fetch::{InfoSource, MeshCli};
pub use influx::{InfluxClient, PointSink, WriteOutcome};
pub use line_protocol::Point;
pub use run::{Batch, Collector, RunReport, run};
