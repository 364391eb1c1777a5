// plugins/utorrent.rs
use log::warn;

use super::BencodePlugin;
use crate::bencode::BValue;
use crate::config::PathEncoding;
use crate::error::PluginError;
use crate::event::{from_unix_seconds, Event, EventData, TimestampDesc};

const NAME: &str = "utorrent";

const FILEGUARD: &[u8] = b".fileguard";
const CAPTION: &str = "caption";
const PATH: &str = "path";
const SEEDTIME: &str = "seedtime";
const MODTIMES: &[u8] = b"modtimes";
const COMPLETED_ON: &[u8] = b"completed_on";
const ADDED_ON: &[u8] = b"added_on";

/// uTorrent `resume.dat`.
///
/// The root maps torrent paths to per-torrent dictionaries, alongside
/// bookkeeping entries such as `.fileguard`. Timestamp fields are emitted in
/// the order they appear inside each entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct UTorrentPlugin {
    encoding: PathEncoding,
}

/// Torrent entries are keyed by a path or a `.torrent` file name; anything
/// else (`.fileguard`, `rec`, ...) is client bookkeeping.
fn is_torrent_key(key: &[u8]) -> bool {
    !key.starts_with(b".")
        && (key.contains(&b'\\') || key.contains(&b'/') || key.ends_with(b".torrent"))
}

/// Splits on the last separator used by the key itself: `(directory, name)`.
fn split_path(key: &str) -> (&str, &str) {
    let sep = if key.contains('\\') { '\\' } else { '/' };
    key.rsplit_once(sep).unwrap_or(("", key))
}

impl UTorrentPlugin {
    pub fn new(encoding: PathEncoding) -> Self {
        Self { encoding }
    }

    fn text_field(&self, entry: &BValue, key: &str) -> Option<String> {
        entry.get(key).and_then(BValue::as_bytes).map(|b| self.encoding.decode(b))
    }

    fn entry_events(&self, key: &[u8], entry: &BValue, events: &mut Vec<Event>) {
        let Some(fields) = entry.as_dict() else {
            return;
        };

        let name = self.encoding.decode(key);
        let (directory, file_name) = split_path(&name);
        let caption = self.text_field(entry, CAPTION).unwrap_or_else(|| file_name.to_string());
        let path = self.text_field(entry, PATH).unwrap_or_else(|| directory.to_string());
        let seedtime = entry.get(SEEDTIME).and_then(BValue::as_integer);

        let mut push = |value: &BValue, desc: TimestampDesc| {
            let secs = match value {
                BValue::Integer(0) => return,
                BValue::Integer(secs) => *secs,
                other => {
                    warn!("uTorrent: {} for {} is a {}, skipped", desc, name, other.type_name());
                    return;
                }
            };
            match from_unix_seconds(secs) {
                Some(timestamp) => events.push(Event::new(
                    timestamp,
                    desc,
                    EventData::UTorrent {
                        caption: caption.clone(),
                        path: path.clone(),
                        seedtime,
                    },
                )),
                None => warn!("uTorrent: {} timestamp {} for {} out of range, skipped", desc, secs, name),
            }
        };

        for (field, value) in fields {
            match field.as_slice() {
                MODTIMES => match value {
                    BValue::List(modtimes) => {
                        for modtime in modtimes {
                            push(modtime, TimestampDesc::ModificationTime);
                        }
                    }
                    other => push(other, TimestampDesc::ModificationTime),
                },
                COMPLETED_ON => push(value, TimestampDesc::FileDownloaded),
                ADDED_ON => push(value, TimestampDesc::AddedTime),
                _ => {}
            }
        }
    }
}

impl BencodePlugin for UTorrentPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn matches(&self, root: &BValue) -> bool {
        root.as_dict().is_some_and(|d| d.contains_key(FILEGUARD))
    }

    fn extract(&self, root: &BValue) -> Result<Vec<Event>, PluginError> {
        let entries = root.as_dict().ok_or_else(|| {
            PluginError::new(NAME, format!("root is a {}, not a dictionary", root.type_name()))
        })?;

        let mut events = Vec::new();
        for (key, entry) in entries {
            if is_torrent_key(key) {
                self.entry_events(key, entry, &mut events);
            }
        }
        Ok(events)
    }
}
