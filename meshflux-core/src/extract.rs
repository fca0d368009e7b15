use crate::error::CollectorError;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// Text printed right before the node table in the `--info` report
pub const NODES_MARKER: &str = "Nodes in mesh: ";
/// Heading of the section that follows the node table
pub const PREFERENCES_MARKER: &str = "Preferences:";

/// A node entry as reported by the mesh node
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Epoch seconds of the last packet received from this node
    pub last_heard: Option<i64>,
    pub device_metrics: Option<DeviceMetrics>,
    pub snr: Option<Number>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetrics {
    pub battery_level: Option<Number>,
    pub voltage: Option<Number>,
    pub channel_utilization: Option<Number>,
    pub air_util_tx: Option<Number>,
    pub uptime_seconds: Option<Number>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub short_name: Option<String>,
}

impl NodeRecord {
    /// Short name of the node, empty when the node has not announced one
    pub fn short_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.short_name.as_deref())
            .unwrap_or("")
    }
}

/// Node table in report order, keyed by node id (e.g. `!abcd1234`)
pub type NodeTable = Vec<(String, NodeRecord)>;

/// Cut the JSON node table out of an `--info` report.
///
/// Literal `\r` and `\n` escape sequences are removed from the fragment
/// before it is returned.
pub fn node_table_fragment(report: &str) -> Result<String, CollectorError> {
    let start = report
        .find(NODES_MARKER)
        .map(|pos| pos + NODES_MARKER.len())
        .ok_or_else(|| CollectorError::Parse(format!("marker {NODES_MARKER:?} not found")))?;
    let len = report[start..]
        .find(PREFERENCES_MARKER)
        .ok_or_else(|| {
            CollectorError::Parse(format!(
                "marker {PREFERENCES_MARKER:?} not found after node table"
            ))
        })?;

    Ok(report[start..start + len]
        .replace("\\r", "")
        .replace("\\n", ""))
}

/// Parse the node table embedded in an `--info` report.
pub fn parse_nodes(report: &str) -> Result<NodeTable, CollectorError> {
    let fragment = node_table_fragment(report)?;
    let raw: Map<String, Value> = serde_json::from_str(fragment.trim())?;

    raw.into_iter()
        .map(|(id, value)| {
            serde_json::from_value::<NodeRecord>(value)
                .map(|record| (id.clone(), record))
                .map_err(|e| CollectorError::Parse(format!("node {id}: {e}")))
        })
        .collect()
}
