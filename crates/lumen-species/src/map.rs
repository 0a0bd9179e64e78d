//! Insertion-ordered species maps.

use indexmap::map::{IntoIter, Iter, IterMut};
use indexmap::IndexMap;

/// Named species in insertion order.
///
/// Inserting an existing name replaces the species but keeps its original
/// position, so block order in multi-species files is stable.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesMap<T> {
    inner: IndexMap<String, T>,
}

impl<T> Default for SpeciesMap<T> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<T> SpeciesMap<T> {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `name`, returning the previous species.
    pub fn insert(&mut self, name: impl Into<String>, species: T) -> Option<T> {
        self.inner.insert(name.into(), species)
    }

    /// Look up a species.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.inner.get(name)
    }

    /// Look up a species mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.inner.get_mut(name)
    }

    /// Remove a species, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.inner.shift_remove(name)
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// `(name, species)` pairs in order.
    pub fn iter(&self) -> Iter<'_, String, T> {
        self.inner.iter()
    }

    /// Mutable `(name, species)` pairs in order.
    pub fn iter_mut(&mut self) -> IterMut<'_, String, T> {
        self.inner.iter_mut()
    }

    /// The `i`-th species.
    pub fn get_index(&self, i: usize) -> Option<(&str, &T)> {
        self.inner.get_index(i).map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a, T> IntoIterator for &'a SpeciesMap<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<T> IntoIterator for SpeciesMap<T> {
    type Item = (String, T);
    type IntoIter = IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for SpeciesMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
