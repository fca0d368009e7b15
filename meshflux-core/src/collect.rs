use crate::extract::{NodeRecord, NodeTable};
use crate::line_protocol::{MEASUREMENT, Metric, Point, seconds_to_nanos};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub const SHORT_NAME_TAG: &str = "shortName";

/// Whether a node was heard strictly after `now - window_secs`.
pub fn heard_recently(record: &NodeRecord, now: DateTime<Utc>, window_secs: i64) -> bool {
    let cutoff = now.timestamp().saturating_sub(window_secs);
    record.last_heard.is_some_and(|heard| heard > cutoff)
}

/// Build the point for one node, with the metrics it actually reported.
pub fn node_point(record: &NodeRecord, last_heard: i64) -> Option<Point> {
    let timestamp_ns = seconds_to_nanos(last_heard)?;
    let mut point = Point::new(MEASUREMENT, timestamp_ns).tag(SHORT_NAME_TAG, record.short_name());

    if let Some(metrics) = &record.device_metrics {
        let present = [
            (Metric::BatteryLevel, &metrics.battery_level),
            (Metric::Voltage, &metrics.voltage),
            (Metric::ChannelUtilization, &metrics.channel_utilization),
            (Metric::AirUtilTx, &metrics.air_util_tx),
            (Metric::Uptime, &metrics.uptime_seconds),
        ];
        for (metric, value) in present {
            if let Some(value) = value {
                point = point.field(metric, value.clone());
            }
        }
    }
    if let Some(snr) = &record.snr {
        point = point.field(Metric::Snr, snr.clone());
    }

    Some(point)
}

/// Turn every recently heard node into a point, in report order.
pub fn recent_points(nodes: &NodeTable, now: DateTime<Utc>, window_secs: i64) -> Vec<Point> {
    let mut points = Vec::new();

    for (id, record) in nodes {
        let Some(last_heard) = record
            .last_heard
            .filter(|_| heard_recently(record, now, window_secs))
        else {
            debug!("Skipping {id}: last heard {heard:?}", heard = record.last_heard);
            continue;
        };
        match node_point(record, last_heard) {
            Some(point) => {
                if let Some(line) = point.to_line() {
                    info!("{line}");
                }
                points.push(point);
            }
            None => warn!("Skipping {id}: lastHeard {last_heard} is out of range"),
        }
    }

    points
}
