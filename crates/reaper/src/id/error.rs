use core::fmt;

/// Errors produced when parsing an [`ObjectId`](crate::ObjectId) from its hex
/// representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseIdError {
    /// The input was not exactly [`ID_HEX_LEN`](crate::ID_HEX_LEN) characters
    /// long.
    InvalidLength { len: usize },
    /// A character outside `[0-9a-fA-F]` was found at `index`.
    InvalidCharacter { character: char, index: usize },
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { len } => {
                write!(f, "invalid length: {len} (expected {})", crate::ID_HEX_LEN)
            }
            Self::InvalidCharacter { character, index } => {
                write!(f, "invalid hex character {character:?} at index {index}")
            }
        }
    }
}

impl core::error::Error for ParseIdError {}

impl ParseIdError {
    pub(crate) fn from_hex(err: hex::FromHexError, len: usize) -> Self {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => Self::InvalidCharacter {
                character: c,
                index,
            },
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                Self::InvalidLength { len }
            }
        }
    }
}
