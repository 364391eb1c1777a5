use super::error::DecodeError;
use crate::bencode::bvalue::{BDict, BValue};

/// Nesting cap applied by [`decode`].
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Decodes `input` as exactly one bencoded value using the default depth cap.
pub fn decode(input: &[u8]) -> Result<BValue, DecodeError> {
    Decoder::default().decode(input)
}

/// Cheap signature check: resume files are a single top-level dictionary.
pub fn looks_like_bencode(input: &[u8]) -> bool {
    input.first() == Some(&b'd') && input.last() == Some(&b'e')
}

/// Bencode decoder with a configurable nesting cap.
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    max_depth: usize,
}

impl Default for Decoder {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Decoder {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decodes the whole buffer. Anything after the first complete value is
    /// an error, and no partial value is ever returned.
    pub fn decode(&self, input: &[u8]) -> Result<BValue, DecodeError> {
        let mut cursor = Cursor { input, pos: 0, max_depth: self.max_depth };
        let value = cursor.decode_value(0)?;

        if cursor.pos != input.len() {
            return Err(DecodeError::TrailingData { offset: cursor.pos });
        }
        Ok(value)
    }
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Result<u8, DecodeError> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEnd { offset: self.pos })
    }

    /// `depth` is the number of containers enclosing the value.
    fn decode_value(&mut self, depth: usize) -> Result<BValue, DecodeError> {
        match self.peek()? {
            b'i' => self.decode_integer(),
            b'l' => self.decode_list(depth),
            b'd' => self.decode_dict(depth),
            c if c.is_ascii_digit() => self.decode_string().map(BValue::ByteString),
            c => Err(DecodeError::UnexpectedByte { offset: self.pos, byte: c }),
        }
    }

    /// `i<digits>e`, with an optional leading '-'.
    fn decode_integer(&mut self) -> Result<BValue, DecodeError> {
        let start = self.pos;
        self.pos += 1; // skip 'i'

        let digits_start = self.pos;
        if self.peek()? == b'-' {
            self.pos += 1;
        }
        let first_digit = self.pos;

        loop {
            match self.peek()? {
                b'e' => break,
                c if c.is_ascii_digit() => self.pos += 1,
                c => {
                    return Err(DecodeError::InvalidInteger {
                        offset: self.pos,
                        reason: format!("non-digit byte 0x{:02x}", c),
                    })
                }
            }
        }

        let digits = &self.input[first_digit..self.pos];
        if digits.is_empty() {
            return Err(DecodeError::InvalidInteger {
                offset: start,
                reason: "no digits".to_string(),
            });
        }
        if digits[0] == b'0' && (digits.len() > 1 || first_digit != digits_start) {
            // Leading zeros and "-0" are not allowed
            return Err(DecodeError::InvalidInteger {
                offset: start,
                reason: "leading zero".to_string(),
            });
        }

        // All bytes were checked to be ASCII above.
        let num_str = std::str::from_utf8(&self.input[digits_start..self.pos])
            .map_err(|_| DecodeError::InvalidInteger {
                offset: start,
                reason: "non-ASCII data".to_string(),
            })?;
        let parsed = num_str
            .parse::<i64>()
            .map_err(|_| DecodeError::IntegerOverflow { offset: start })?;

        self.pos += 1; // skip 'e'
        Ok(BValue::Integer(parsed))
    }

    /// `<length>:<bytes>`
    fn decode_string(&mut self) -> Result<Vec<u8>, DecodeError> {
        let start = self.pos;
        let mut length: usize = 0;

        loop {
            match self.peek()? {
                b':' => break,
                c if c.is_ascii_digit() => {
                    if self.pos > start && self.input[start] == b'0' {
                        return Err(DecodeError::InvalidLength {
                            offset: start,
                            reason: "leading zero".to_string(),
                        });
                    }
                    length = length
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(c - b'0')))
                        .ok_or_else(|| DecodeError::InvalidLength {
                            offset: start,
                            reason: "length overflows".to_string(),
                        })?;
                    self.pos += 1;
                }
                c => {
                    return Err(DecodeError::InvalidLength {
                        offset: self.pos,
                        reason: format!("non-digit byte 0x{:02x}", c),
                    })
                }
            }
        }

        if self.pos == start {
            return Err(DecodeError::InvalidLength {
                offset: start,
                reason: "missing length".to_string(),
            });
        }

        self.pos += 1; // skip ':'
        let remaining = self.input.len() - self.pos;
        if length > remaining {
            return Err(DecodeError::UnexpectedEnd { offset: start });
        }

        let data = self.input[self.pos..self.pos + length].to_vec();
        self.pos += length;
        Ok(data)
    }

    fn enter(&self, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.max_depth {
            return Err(DecodeError::DepthExceeded {
                offset: self.pos,
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    /// `l<items>e`
    fn decode_list(&mut self, depth: usize) -> Result<BValue, DecodeError> {
        self.enter(depth)?;
        self.pos += 1; // skip 'l'

        let mut items = Vec::new();
        while self.peek()? != b'e' {
            items.push(self.decode_value(depth + 1)?);
        }

        self.pos += 1; // skip 'e'
        Ok(BValue::List(items))
    }

    /// `d<key><value>...e`. Keys are kept in the order they appear; a repeated
    /// key keeps its first position and takes the last value.
    fn decode_dict(&mut self, depth: usize) -> Result<BValue, DecodeError> {
        self.enter(depth)?;
        self.pos += 1; // skip 'd'

        let mut map = BDict::new();
        loop {
            let c = self.peek()?;
            if c == b'e' {
                break;
            }
            if !c.is_ascii_digit() {
                return Err(DecodeError::NonStringKey { offset: self.pos, byte: c });
            }

            let key = self.decode_string()?;
            let value = self.decode_value(depth + 1)?;
            map.insert(key, value);
        }

        self.pos += 1; // skip 'e'
        Ok(BValue::Dict(map))
    }
}
