use thiserror::Error;

/// A structural fault in bencoded input. Every variant records the byte
/// offset where decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	#[error("Unexpected end of input at offset {offset}")]
	UnexpectedEnd { offset: usize },

	#[error("Unexpected byte 0x{byte:02x} at offset {offset}")]
	UnexpectedByte { offset: usize, byte: u8 },

	#[error("Invalid Integer at offset {offset}: {reason}")]
	InvalidInteger { offset: usize, reason: String },

	#[error("Integer out of 64-bit range at offset {offset}")]
	IntegerOverflow { offset: usize },

	#[error("Invalid String Length at offset {offset}: {reason}")]
	InvalidLength { offset: usize, reason: String },

	#[error("Dict key must be a ByteString, found byte 0x{byte:02x} at offset {offset}")]
	NonStringKey { offset: usize, byte: u8 },

	#[error("Trailing data after value at offset {offset}")]
	TrailingData { offset: usize },

	#[error("Nesting deeper than {max_depth} levels at offset {offset}")]
	DepthExceeded { offset: usize, max_depth: usize },
}

impl DecodeError {
	pub fn offset(&self) -> usize {
		match self {
			DecodeError::UnexpectedEnd { offset }
			| DecodeError::UnexpectedByte { offset, .. }
			| DecodeError::InvalidInteger { offset, .. }
			| DecodeError::IntegerOverflow { offset }
			| DecodeError::InvalidLength { offset, .. }
			| DecodeError::NonStringKey { offset, .. }
			| DecodeError::TrailingData { offset }
			| DecodeError::DepthExceeded { offset, .. } => *offset,
		}
	}
}
