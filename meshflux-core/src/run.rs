use crate::collect::recent_points;
use crate::config::CollectorConfig;
use crate::error::CollectorError;
use crate::extract::parse_nodes;
use crate::fetch::{InfoSource, MeshCli};
use crate::influx::{InfluxClient, PointSink, WriteOutcome, write_best_effort};
use crate::line_protocol::{Point, encode_batch};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Points built from one node report, ready for upload
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub polled_at: DateTime<Utc>,
    pub nodes_seen: usize,
    pub points: Vec<Point>,
    pub lines: Vec<String>,
}

/// Summary of one collection run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub polled_at: DateTime<Utc>,
    pub nodes_seen: usize,
    pub points: Vec<Point>,
    pub lines: Vec<String>,
    pub write: WriteOutcome,
}

/// The configured node query and database client for one run
#[derive(Debug)]
pub struct Collector {
    source: MeshCli,
    sink: InfluxClient,
    window_secs: i64,
    dry_run: bool,
}

impl Collector {
    pub fn new(config: &CollectorConfig) -> Result<Self, CollectorError> {
        config.validate()?;

        Ok(Self {
            sink: InfluxClient::new(&config.influx)?,
            source: MeshCli::new(&config.mesh),
            window_secs: config.window_secs,
            dry_run: config.dry_run,
        })
    }

    pub async fn collect(&self) -> Result<Batch, CollectorError> {
        collect_batch(&self.source, Utc::now(), self.window_secs).await
    }

    pub async fn upload(&self, batch: Batch) -> RunReport {
        upload_batch(&self.sink, batch, self.dry_run).await
    }
}

/// Collect once from the configured node and write to the configured database.
pub async fn run(config: &CollectorConfig) -> Result<RunReport, CollectorError> {
    let collector = Collector::new(config)?;
    let batch = collector.collect().await?;
    Ok(collector.upload(batch).await)
}

/// Query the node and turn its recently heard peers into points.
pub async fn collect_batch<I: InfoSource>(
    source: &I,
    now: DateTime<Utc>,
    window_secs: i64,
) -> Result<Batch, CollectorError> {
    let report = source.fetch_info().await?;
    let nodes = parse_nodes(&report)?;
    info!("Node report lists {count} nodes", count = nodes.len());

    let points = recent_points(&nodes, now, window_secs);
    let lines = encode_batch(&points);

    Ok(Batch {
        polled_at: now,
        nodes_seen: nodes.len(),
        points,
        lines,
    })
}

/// Write the batch unless this is a dry run.
pub async fn upload_batch<S: PointSink>(sink: &S, batch: Batch, dry_run: bool) -> RunReport {
    let write = if dry_run {
        info!("Dry run, not uploading {count} points", count = batch.lines.len());
        WriteOutcome::Skipped {
            points: batch.lines.len(),
        }
    } else {
        write_best_effort(sink, &batch.lines).await
    };

    RunReport {
        polled_at: batch.polled_at,
        nodes_seen: batch.nodes_seen,
        points: batch.points,
        lines: batch.lines,
        write,
    }
}

/// Both stages back to back, with the node query and database injected.
pub async fn collect_and_write<I, S>(
    source: &I,
    sink: &S,
    now: DateTime<Utc>,
    window_secs: i64,
    dry_run: bool,
) -> Result<RunReport, CollectorError>
where
    I: InfoSource,
    S: PointSink,
{
    let batch = collect_batch(source, now, window_secs).await?;
    Ok(upload_batch(sink, batch, dry_run).await)
}
