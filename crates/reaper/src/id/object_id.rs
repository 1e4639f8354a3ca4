use super::ParseIdError;
use core::{fmt, str::FromStr};

/// Number of raw bytes in an [`ObjectId`].
pub const ID_LEN: usize = 32;

/// Number of characters in the hex form of an [`ObjectId`].
pub const ID_HEX_LEN: usize = ID_LEN * 2;

/// Number of hex characters printed by [`ObjectId::short`].
const SHORT_HEX_LEN: usize = 8;

/// A content-addressed object identifier.
///
/// An `ObjectId` is the 32-byte content hash that names one object in a
/// repository. It is opaque to the deletion core: it is only compared, hashed,
/// ordered and formatted.
///
/// The canonical text form is 64 lower-case hex characters. Parsing accepts
/// either case.
///
/// # Example
///
/// ```
/// use reaper::ObjectId;
///
/// let hex = "5f0b4e3c8a9d2b1f00112233445566778899aabbccddeeff0011223344556677";
/// let id: ObjectId = hex.parse().unwrap();
/// assert_eq!(id.to_string(), hex);
/// assert_eq!(id.short(), "5f0b4e3c");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Returns the raw identifier bytes.
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Returns `true` for the all-zero identifier, which never names a real
    /// object.
    pub fn is_null(&self) -> bool {
        self.0 == [0; ID_LEN]
    }

    /// Encodes the identifier into a fixed-size hex buffer without allocating.
    pub fn encode(&self) -> HexId {
        let mut buf = [0_u8; ID_HEX_LEN];
        hex::encode_to_slice(self.0, &mut buf)
            .expect("hex buffer is exactly twice the id length");
        HexId(buf)
    }

    /// Returns the first eight hex characters, the form used in short
    /// diagnostics.
    pub fn short(&self) -> String {
        self.encode().as_str()[..SHORT_HEX_LEN].to_owned()
    }
}

impl FromStr for ObjectId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0_u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| ParseIdError::from_hex(e, s.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ID_LEN]> for ObjectId {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().as_str())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.encode().as_str()).finish()
    }
}

/// Stack-allocated hex form of an [`ObjectId`].
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct HexId([u8; ID_HEX_LEN]);

impl HexId {
    /// Borrows the encoded identifier as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ever filled by `hex::encode_to_slice`, which writes ASCII.
        core::str::from_utf8(&self.0).expect("hex output is ASCII")
    }
}

impl AsRef<str> for HexId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
impl serde::Serialize for ObjectId {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.encode().as_str())
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
