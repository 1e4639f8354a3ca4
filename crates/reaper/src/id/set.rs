use super::ObjectId;
use std::collections::{BTreeSet, btree_set};

/// A deduplicated set of [`ObjectId`]s scheduled for removal.
///
/// Backed by a [`BTreeSet`], so iteration is in ascending identifier order.
/// The deletion core never depends on that order for correctness; it only
/// makes runs reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSet(BTreeSet<ObjectId>);

impl IdSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds an identifier, returning `false` if it was already present.
    pub fn insert(&mut self, id: ObjectId) -> bool {
        self.0.insert(id)
    }

    /// Removes an identifier, returning `true` if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> bool {
        self.0.remove(id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, ObjectId> {
        self.0.iter()
    }
}

impl FromIterator<ObjectId> for IdSet {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<ObjectId> for IdSet {
    fn extend<I: IntoIterator<Item = ObjectId>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for IdSet {
    type Item = ObjectId;
    type IntoIter = btree_set::IntoIter<ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a ObjectId;
    type IntoIter = btree_set::Iter<'a, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
