// plugins/transmission.rs
use std::borrow::Cow;

use log::warn;

use super::fields::{self, optional};
use super::BencodePlugin;
use crate::bencode::BValue;
use crate::error::PluginError;
use crate::event::{from_unix_seconds, Event, EventData, TimestampDesc};

const NAME: &str = "transmission";

const TORRENTS: &str = "torrents";
const DESTINATION: &str = "destination";
const SEEDING_TIME: &str = "seeding-time-seconds";
const ADDED_DATE: &str = "added-date";
const DONE_DATE: &str = "done-date";

/// Transmission resume data.
///
/// Accepts either a `torrents` dictionary mapping torrent identifiers to
/// per-torrent records, or a root that is itself a single per-torrent record
/// (Transmission writes one `.resume` file per torrent). A torrent whose
/// record or fields have the wrong type is skipped; the others are still
/// extracted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransmissionPlugin;

fn is_record(value: &BValue) -> bool {
    value.get(DESTINATION).is_some() && value.get(SEEDING_TIME).is_some()
}

/// Per-torrent records in encounter order, labelled for logging.
fn records(root: &BValue) -> Vec<(Cow<'_, str>, &BValue)> {
    match root.get(TORRENTS) {
        Some(BValue::Dict(torrents)) => torrents
            .iter()
            .map(|(id, record)| (String::from_utf8_lossy(id), record))
            .collect(),
        _ => vec![(Cow::Borrowed("<root>"), root)],
    }
}

fn wrong_type(key: &'static str) -> impl FnOnce(&'static str) -> String {
    move |found| format!("'{}' is a {}", key, found)
}

struct Record {
    destination: Option<String>,
    seedtime: Option<i64>,
    added: Option<i64>,
    done: Option<i64>,
}

impl Record {
    fn from_bvalue(value: &BValue) -> Result<Self, String> {
        if value.as_dict().is_none() {
            return Err(format!("record is a {}, not a dictionary", value.type_name()));
        }
        let destination = optional(fields::bytes(value, DESTINATION))
            .map_err(wrong_type(DESTINATION))?
            .map(|b| String::from_utf8_lossy(b).into_owned());
        let seedtime = optional(fields::integer(value, SEEDING_TIME)).map_err(wrong_type(SEEDING_TIME))?;
        let added = optional(fields::integer(value, ADDED_DATE)).map_err(wrong_type(ADDED_DATE))?;
        let done = optional(fields::integer(value, DONE_DATE)).map_err(wrong_type(DONE_DATE))?;

        Ok(Record { destination, seedtime, added, done })
    }

    fn push_event(&self, events: &mut Vec<Event>, secs: i64, desc: TimestampDesc) {
        match from_unix_seconds(secs) {
            Some(timestamp) => events.push(Event::new(
                timestamp,
                desc,
                EventData::Transmission {
                    destination: self.destination.clone(),
                    seedtime: self.seedtime,
                },
            )),
            None => warn!("Transmission: {} timestamp {} out of range, skipped", desc, secs),
        }
    }

    fn events(&self, events: &mut Vec<Event>) {
        if let Some(added) = self.added {
            self.push_event(events, added, TimestampDesc::AddedTime);
        }
        // done-date is 0 until the download completes
        if let Some(done) = self.done.filter(|&d| d != 0) {
            self.push_event(events, done, TimestampDesc::FileDownloaded);
        }
    }
}

impl BencodePlugin for TransmissionPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn matches(&self, root: &BValue) -> bool {
        if root.as_dict().is_none() {
            return false;
        }
        match root.get(TORRENTS) {
            Some(BValue::Dict(torrents)) => torrents.values().any(is_record),
            _ => is_record(root),
        }
    }

    fn extract(&self, root: &BValue) -> Result<Vec<Event>, PluginError> {
        if root.as_dict().is_none() {
            return Err(PluginError::new(
                NAME,
                format!("root is a {}, not a dictionary", root.type_name()),
            ));
        }

        let mut events = Vec::new();
        for (id, value) in records(root) {
            match Record::from_bvalue(value) {
                Ok(record) => record.events(&mut events),
                Err(reason) => warn!("Transmission: skipping torrent {}: {}", id, reason),
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decode;
    use chrono::{TimeZone, Utc};

    fn torrent(fields: &str) -> String {
        format!("d{}e", fields)
    }

    fn destination(path: &str) -> String {
        format!("11:destination{}:{}", path.len(), path)
    }

    // Two torrents: one completed, one only added.
    fn two_torrents() -> Vec<u8> {
        let first = torrent(&format!(
            "10:added-datei1383924680e{}9:done-datei1383935064e20:seeding-time-secondsi4e",
            destination("/Users/brian/Downloads")
        ));
        let second = torrent("10:added-datei1383991200e");
        format!("d8:torrentsd2:t1{}2:t2{}ee", first, second).into_bytes()
    }

    #[test]
    fn test_matches_shapes() {
        let plugin = TransmissionPlugin;
        assert!(plugin.matches(&decode(&two_torrents()).unwrap()));

        let single = torrent(&format!("{}20:seeding-time-secondsi0e", destination("/tmp")));
        assert!(plugin.matches(&decode(single.as_bytes()).unwrap()));

        assert!(!plugin.matches(&decode(b"d11:destination4:/tmpe").unwrap()));
        assert!(!plugin.matches(&decode(b"d8:torrentsi1ee").unwrap()));
        assert!(!plugin.matches(&decode(b"l11:destinatione").unwrap()));
    }

    #[test]
    fn test_extract_two_torrents() {
        let events = TransmissionPlugin.extract(&decode(&two_torrents()).unwrap()).unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].timestamp_desc, TimestampDesc::AddedTime);
        assert_eq!(events[0].timestamp, Utc.with_ymd_and_hms(2013, 11, 8, 15, 31, 20).unwrap());
        assert_eq!(events[0].destination(), Some("/Users/brian/Downloads"));
        assert_eq!(events[0].seedtime(), Some(4));

        assert_eq!(events[1].timestamp_desc, TimestampDesc::FileDownloaded);
        assert_eq!(events[1].timestamp, Utc.with_ymd_and_hms(2013, 11, 8, 18, 24, 24).unwrap());
        assert_eq!(events[1].destination(), Some("/Users/brian/Downloads"));
        assert_eq!(events[1].seedtime(), Some(4));

        assert_eq!(events[2].timestamp_desc, TimestampDesc::AddedTime);
        assert_eq!(events[2].timestamp, Utc.with_ymd_and_hms(2013, 11, 9, 10, 0, 0).unwrap());
        assert_eq!(events[2].destination(), None);
        assert_eq!(events[2].seedtime(), None);
    }

    #[test]
    fn test_zero_done_date_is_not_completed() {
        let single = torrent(&format!(
            "10:added-datei1383924680e{}9:done-datei0e20:seeding-time-secondsi0e",
            destination("/tmp")
        ));
        let events = TransmissionPlugin.extract(&decode(single.as_bytes()).unwrap()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_desc, TimestampDesc::AddedTime);
        assert_eq!(events[0].destination(), Some("/tmp"));
    }

    #[test]
    fn test_corrupt_torrent_is_skipped() {
        let good = torrent(&format!("10:added-datei1383924680e{}20:seeding-time-secondsi4e", destination("/a")));
        let bad_destination = torrent("10:added-datei1383924680e11:destinationi7e20:seeding-time-secondsi4e");
        let bad_added = torrent(&format!("10:added-date3:now{}20:seeding-time-secondsi4e", destination("/c")));
        let input = format!("d8:torrentsd1:a{}1:b{}1:c{}1:di5eee", good, bad_destination, bad_added);

        let events = TransmissionPlugin.extract(&decode(input.as_bytes()).unwrap()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].destination(), Some("/a"));
    }

    #[test]
    fn test_out_of_range_timestamp_skips_event() {
        let single = torrent(&format!(
            "10:added-datei9223372036854775807e{}9:done-datei1383935064e20:seeding-time-secondsi4e",
            destination("/tmp")
        ));
        let events = TransmissionPlugin.extract(&decode(single.as_bytes()).unwrap()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_desc, TimestampDesc::FileDownloaded);
    }

    #[test]
    fn test_extract_rejects_non_dict_root() {
        let err = TransmissionPlugin.extract(&BValue::List(Vec::new())).unwrap_err();
        assert_eq!(err.plugin, "transmission");
    }
}
