pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;

pub use bvalue::{BDict, BValue};   // re-export
pub use decode::{decode, looks_like_bencode, Decoder, DEFAULT_MAX_DEPTH};   // re-export
pub use encode::{bvalue_to_json, encode_bvalue};   // re-export
pub use error::DecodeError;   // re-export
