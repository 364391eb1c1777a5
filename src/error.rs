use thiserror::Error;

use crate::bencode::DecodeError;

/// A plugin was asked to extract from a value it cannot handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{plugin} plugin: {message}")]
pub struct PluginError {
    pub plugin: &'static str,
    pub message: String,
}

impl PluginError {
    pub fn new(plugin: &'static str, message: impl Into<String>) -> Self {
        Self { plugin, message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Bencode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}
