use log::debug;

use crate::bencode::{BValue, DecodeError, Decoder};
use crate::config::Config;
use crate::error::ParseError;
use crate::event::Event;
use crate::plugins::PluginRegistry;

/// Decodes resume files and hands them to the first matching plugin.
///
/// Holds no per-file state, so one parser can be shared across threads.
pub struct BencodeParser {
    decoder: Decoder,
    registry: PluginRegistry,
}

impl BencodeParser {
    pub fn new(config: &Config) -> Self {
        Self::with_registry(config, PluginRegistry::with_default_plugins(config))
    }

    pub fn with_registry(config: &Config, registry: PluginRegistry) -> Self {
        Self {
            decoder: Decoder::with_max_depth(config.max_depth),
            registry,
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.decoder.max_depth()
    }

    pub fn decode(&self, input: &[u8]) -> Result<BValue, DecodeError> {
        self.decoder.decode(input)
    }

    /// Decode then dispatch. A file no plugin recognizes yields no events.
    pub fn parse(&self, input: &[u8]) -> Result<Vec<Event>, ParseError> {
        let root = self.decode(input)?;
        debug!("Decoded {} byte {}", input.len(), root.type_name());
        self.registry.dispatch(&root)
    }
}

impl Default for BencodeParser {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
