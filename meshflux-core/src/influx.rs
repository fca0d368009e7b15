use crate::config::InfluxConfig;
use crate::error::CollectorError;
use reqwest::Url;
use serde::Serialize;
use std::future::Future;
use tracing::{debug, error, info};

/// Destination for a batch of line-protocol lines
pub trait PointSink {
    fn write_lines(&self, lines: &[String])
    -> impl Future<Output = Result<(), CollectorError>> + Send;
}

/// What happened to the batch at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome {
    Written { points: usize },
    /// Nothing to write, no request was made
    Empty,
    /// Dry run, no request was made
    Skipped { points: usize },
    /// The database rejected or never received the batch
    Failed { error: String },
}

impl WriteOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, WriteOutcome::Failed { .. })
    }
}

/// Write client for the InfluxDB 1.x HTTP API
#[derive(Debug, Clone)]
pub struct InfluxClient {
    client: reqwest::Client,
    write_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl InfluxClient {
    pub fn new(config: &InfluxConfig) -> Result<Self, CollectorError> {
        let base_url = config.base_url();
        let mut write_url = Url::parse(&base_url)
            .and_then(|url| url.join("write"))
            .map_err(|e| CollectorError::Connection(format!("invalid address {base_url}: {e}")))?;
        write_url
            .query_pairs_mut()
            .append_pair("db", &config.database)
            .append_pair("precision", "ns");

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CollectorError::Connection(e.to_string()))?;

        debug!("InfluxDB write endpoint: {write_url}");
        Ok(Self {
            client,
            write_url,
            username: config.username.clone().filter(|u| !u.is_empty()),
            password: config.password.clone(),
        })
    }

    pub fn write_url(&self) -> &Url {
        &self.write_url
    }
}

impl PointSink for InfluxClient {
    async fn write_lines(&self, lines: &[String]) -> Result<(), CollectorError> {
        let mut request = self
            .client
            .post(self.write_url.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(lines.join("\n"));
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollectorError::Write(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollectorError::Write(format!(
                "{status}: {body}",
                body = body.trim()
            )));
        }

        Ok(())
    }
}

/// Write the batch once; failures are logged and reported, never raised.
pub async fn write_best_effort<S: PointSink>(sink: &S, lines: &[String]) -> WriteOutcome {
    if lines.is_empty() {
        info!("No points to upload");
        return WriteOutcome::Empty;
    }

    match sink.write_lines(lines).await {
        Ok(()) => {
            info!("Uploaded {count} points", count = lines.len());
            WriteOutcome::Written {
                points: lines.len(),
            }
        }
        Err(e) => {
            error!("{e}");
            WriteOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
