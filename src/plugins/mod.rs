// plugins/mod.rs - resume-file plugins and the registry that dispatches to them

pub mod transmission;
pub mod utorrent;

use log::debug;

use crate::bencode::BValue;
use crate::config::Config;
use crate::error::{ParseError, PluginError};
use crate::event::Event;

pub use transmission::TransmissionPlugin;
pub use utorrent::UTorrentPlugin;

/// Recognizes one client's resume-file layout and extracts events from it.
///
/// `matches` only looks at the shape of the root value; it must return
/// `false` rather than fail on malformed nested content.
pub trait BencodePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, root: &BValue) -> bool;

    fn extract(&self, root: &BValue) -> Result<Vec<Event>, PluginError>;
}

/// Append-only, ordered set of plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn BencodePlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transmission first, then uTorrent.
    pub fn with_default_plugins(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(TransmissionPlugin);
        registry.register(UTorrentPlugin::new(config.utorrent_path_encoding));
        registry
    }

    pub fn register<P: BencodePlugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Box::new(plugin));
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// First registered plugin whose `matches` accepts `root`.
    pub fn find(&self, root: &BValue) -> Option<&dyn BencodePlugin> {
        self.plugins
            .iter()
            .map(|p| &**p)
            .find(|p| p.matches(root))
    }

    /// Runs the first matching plugin. An unrecognized layout is not an
    /// error and yields no events.
    pub fn dispatch(&self, root: &BValue) -> Result<Vec<Event>, ParseError> {
        match self.find(root) {
            Some(plugin) => {
                let events = plugin.extract(root)?;
                debug!("{} plugin extracted {} events", plugin.name(), events.len());
                Ok(events)
            }
            None => {
                debug!("No plugin matched {} root", root.type_name());
                Ok(Vec::new())
            }
        }
    }
}

/// Shared field readers for plugins.
pub(crate) mod fields {
    use crate::bencode::BValue;

    /// Why a field could not be read.
    pub enum FieldError {
        Missing,
        WrongType(&'static str),
    }

    pub fn integer(value: &BValue, key: &str) -> Result<i64, FieldError> {
        match value.get(key) {
            None => Err(FieldError::Missing),
            Some(BValue::Integer(i)) => Ok(*i),
            Some(other) => Err(FieldError::WrongType(other.type_name())),
        }
    }

    pub fn bytes<'a>(value: &'a BValue, key: &str) -> Result<&'a [u8], FieldError> {
        match value.get(key) {
            None => Err(FieldError::Missing),
            Some(BValue::ByteString(b)) => Ok(b),
            Some(other) => Err(FieldError::WrongType(other.type_name())),
        }
    }

    /// Present-or-absent reading: `Ok(None)` when missing.
    pub fn optional<T>(result: Result<T, FieldError>) -> Result<Option<T>, &'static str> {
        match result {
            Ok(v) => Ok(Some(v)),
            Err(FieldError::Missing) => Ok(None),
            Err(FieldError::WrongType(found)) => Err(found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::decode;
    use crate::event::{EventData, TimestampDesc};
    use chrono::TimeZone;
    use chrono::Utc;

    struct Always(&'static str);

    impl BencodePlugin for Always {
        fn name(&self) -> &'static str {
            self.0
        }

        fn matches(&self, _root: &BValue) -> bool {
            true
        }

        fn extract(&self, _root: &BValue) -> Result<Vec<Event>, PluginError> {
            Ok(vec![Event::new(
                Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                TimestampDesc::AddedTime,
                EventData::Transmission { destination: Some(self.0.to_string()), seedtime: None },
            )])
        }
    }

    struct Failing;

    impl BencodePlugin for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn matches(&self, _root: &BValue) -> bool {
            true
        }

        fn extract(&self, _root: &BValue) -> Result<Vec<Event>, PluginError> {
            Err(PluginError::new("failing", "cannot extract"))
        }
    }

    #[test]
    fn test_default_registration_order() {
        let registry = PluginRegistry::with_default_plugins(&Config::default());
        assert_eq!(registry.plugin_names(), vec!["transmission", "utorrent"]);
    }

    #[test]
    fn test_first_match_wins() {
        let mut registry = PluginRegistry::new();
        registry.register(Always("first"));
        registry.register(Always("second"));

        let root = decode(b"de").unwrap();
        let events = registry.dispatch(&root).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].destination(), Some("first"));
        assert_eq!(registry.find(&root).map(|p| p.name()), Some("first"));
    }

    #[test]
    fn test_no_match_is_empty() {
        let registry = PluginRegistry::with_default_plugins(&Config::default());
        let root = decode(b"d8:announce3:urle").unwrap();
        assert!(registry.find(&root).is_none());
        assert!(registry.dispatch(&root).unwrap().is_empty());

        let empty = PluginRegistry::new();
        assert!(empty.dispatch(&root).unwrap().is_empty());
    }

    #[test]
    fn test_plugin_error_names_producer() {
        let mut registry = PluginRegistry::new();
        registry.register(Failing);

        let err = registry.dispatch(&BValue::Integer(1)).unwrap_err();
        assert_eq!(err.to_string(), "failing plugin: cannot extract");
    }
}
