use indexmap::IndexMap;

/// Dictionary keyed by raw bytes, iterated in the order keys were decoded.
pub type BDict = IndexMap<Vec<u8>, BValue>;

#[derive(Debug, Clone)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes, never assumed to be text
	Integer(i64),
	List(Vec<BValue>),
	Dict(BDict) // encounter order, not sorted
}

// IndexMap equality ignores order; dictionaries here compare key sequences too.
impl PartialEq for BValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(BValue::ByteString(a), BValue::ByteString(b)) => a == b,
			(BValue::Integer(a), BValue::Integer(b)) => a == b,
			(BValue::List(a), BValue::List(b)) => a == b,
			(BValue::Dict(a), BValue::Dict(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
			_ => false,
		}
	}
}

impl Eq for BValue {}

impl BValue {
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	/// Byte string interpreted as UTF-8, `None` if it is not one.
	pub fn as_str(&self) -> Option<&str> {
		self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Looks up `key` when `self` is a dictionary.
	pub fn get(&self, key: &str) -> Option<&BValue> {
		self.as_dict().and_then(|d| d.get(key.as_bytes()))
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}
}
