// lib.rs - Library interface for BitTorrent resume-file event extraction

pub mod bencode;
pub mod config;
pub mod error;
pub mod event;
pub mod parser;
pub mod plugins;

// Re-export commonly used types for easier testing
pub use bencode::{decode, BDict, BValue, DecodeError, Decoder};
pub use config::{Config, PathEncoding};
pub use error::{ParseError, PluginError};
pub use event::{Event, EventData, TimestampDesc};
pub use parser::BencodeParser;
pub use plugins::{BencodePlugin, PluginRegistry, TransmissionPlugin, UTorrentPlugin};
