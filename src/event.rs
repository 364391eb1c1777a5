use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What the timestamp of an [`Event`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
pub enum TimestampDesc {
    #[serde(rename = "Added Time")]
    AddedTime,
    #[serde(rename = "File Downloaded")]
    FileDownloaded,
    #[serde(rename = "Content Modification Time")]
    ModificationTime,
}

impl TimestampDesc {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampDesc::AddedTime => "Added Time",
            TimestampDesc::FileDownloaded => "File Downloaded",
            TimestampDesc::ModificationTime => "Content Modification Time",
        }
    }
}

impl fmt::Display for TimestampDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Producer-specific fields attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "data_type")]
pub enum EventData {
    #[serde(rename = "p2p:bittorrent:transmission")]
    Transmission {
        destination: Option<String>,
        seedtime: Option<i64>,
    },
    #[serde(rename = "p2p:bittorrent:utorrent")]
    UTorrent {
        caption: String,
        path: String,
        seedtime: Option<i64>,
    },
}

/// A dated record of torrent activity. Built once by a plugin, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub timestamp_desc: TimestampDesc,
    #[serde(flatten)]
    pub data: EventData,
}

impl Event {
    pub fn new(timestamp: DateTime<Utc>, timestamp_desc: TimestampDesc, data: EventData) -> Self {
        Self { timestamp, timestamp_desc, data }
    }

    pub fn data_type(&self) -> &'static str {
        match self.data {
            EventData::Transmission { .. } => "p2p:bittorrent:transmission",
            EventData::UTorrent { .. } => "p2p:bittorrent:utorrent",
        }
    }

    pub fn destination(&self) -> Option<&str> {
        match &self.data {
            EventData::Transmission { destination, .. } => destination.as_deref(),
            _ => None,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match &self.data {
            EventData::UTorrent { caption, .. } => Some(caption),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match &self.data {
            EventData::UTorrent { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn seedtime(&self) -> Option<i64> {
        match self.data {
            EventData::Transmission { seedtime, .. } | EventData::UTorrent { seedtime, .. } => seedtime,
        }
    }
}

/// Converts a Unix timestamp in seconds, `None` when chrono cannot represent it.
pub(crate) fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}
