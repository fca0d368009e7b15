//! InfluxDB line protocol encoding

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Number;
use strum::{Display, EnumIter};
use tracing::warn;

/// Measurement every node point is written to
pub const MEASUREMENT: &str = "nodeinfo";

const NANOS_PER_SECOND: i64 = 1_000_000_000;

const MEASUREMENT_SPECIAL: &[char] = &[',', ' ', '\\'];
const TAG_SPECIAL: &[char] = &[',', '=', ' ', '\\'];

/// Telemetry fields written per node, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Metric {
    BatteryLevel,
    Voltage,
    ChannelUtilization,
    AirUtilTx,
    Uptime,
    Snr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: Metric,
    pub value: Number,
}

/// A single time-series point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub measurement: String,
    pub tags: Vec<(String, String)>,
    pub fields: Vec<Field>,
    pub timestamp_ns: i64,
}

/// Convert epoch seconds to epoch nanoseconds, `None` past the year 2262.
pub fn seconds_to_nanos(seconds: i64) -> Option<i64> {
    seconds.checked_mul(NANOS_PER_SECOND)
}

impl Point {
    pub fn new(measurement: impl Into<String>, timestamp_ns: i64) -> Self {
        Self {
            measurement: measurement.into(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp_ns,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    pub fn field(mut self, name: Metric, value: Number) -> Self {
        self.fields.push(Field { name, value });
        self
    }

    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp_ns)
    }

    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as one line of line protocol.
    ///
    /// Returns `None` for a point without fields; InfluxDB rejects such lines.
    pub fn to_line(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }

        let mut line = escape(&self.measurement, MEASUREMENT_SPECIAL);
        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(&escape(key, TAG_SPECIAL));
            line.push('=');
            line.push_str(&escape(value, TAG_SPECIAL));
        }

        let field_set = self
            .fields
            .iter()
            .map(|f| format!("{name}={value}", name = f.name, value = f.value))
            .collect::<Vec<_>>()
            .join(",");

        line.push(' ');
        line.push_str(&field_set);
        line.push(' ');
        line.push_str(&self.timestamp_ns.to_string());
        Some(line)
    }
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        // A line break would end the point early
        let c = if matches!(c, '\n' | '\r') { ' ' } else { c };
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render a batch, dropping points that have no fields.
pub fn encode_batch(points: &[Point]) -> Vec<String> {
    points
        .iter()
        .filter_map(|point| {
            let line = point.to_line();
            if line.is_none() {
                warn!(
                    "Skipping point for {tags:?} at {time}: no fields",
                    tags = point.tags,
                    time = point.time()
                );
            }
            line
        })
        .collect()
}
