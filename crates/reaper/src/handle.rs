//! Addressing units understood by a [`Backend`](crate::Backend).
//!
//! A [`Handle`] pairs the namespace an object lives in ([`FileType`]) with its
//! [`ObjectId`]. One deletion run works on a single [`FileType`]; the handle is
//! rebuilt for every identifier and never stored.

use crate::ObjectId;
use core::{fmt, str::FromStr};

/// The logical namespace an object belongs to inside a repository.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    /// Pack files holding the actual data blobs.
    Pack,
    Key,
    Lock,
    Snapshot,
    Index,
    /// The single repository config file.
    Config,
}

impl FileType {
    /// All file types, in repository layout order.
    pub const ALL: [Self; 6] = [
        Self::Pack,
        Self::Key,
        Self::Lock,
        Self::Snapshot,
        Self::Index,
        Self::Config,
    ];

    /// Name of the directory (or file, for [`FileType::Config`]) this type is
    /// stored under.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Pack => "data",
            Self::Key => "keys",
            Self::Lock => "locks",
            Self::Snapshot => "snapshots",
            Self::Index => "index",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
impl serde::Serialize for FileType {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.dir_name())
    }
}

/// Returned when a string does not name a known [`FileType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFileTypeError {
    pub input: String,
}

impl fmt::Display for ParseFileTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown file type: {:?}", self.input)
    }
}

impl core::error::Error for ParseFileTypeError {}

impl FromStr for FileType {
    type Err = ParseFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "data" | "pack" | "packs" => Ok(Self::Pack),
            "keys" | "key" => Ok(Self::Key),
            "locks" | "lock" => Ok(Self::Lock),
            "snapshots" | "snapshot" => Ok(Self::Snapshot),
            "index" => Ok(Self::Index),
            "config" => Ok(Self::Config),
            _ => Err(ParseFileTypeError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Fully-qualified address of one object: its [`FileType`] plus its
/// [`ObjectId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    pub file_type: FileType,
    pub id: ObjectId,
}

impl Handle {
    pub const fn new(file_type: FileType, id: ObjectId) -> Self {
        Self { file_type, id }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}/{}>", self.file_type, self.id.short())
    }
}
