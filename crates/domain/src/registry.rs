//! Registries — id → human-readable name lookups supplied by the host.
//!
//! An empty registry means the host has not delivered it yet; the
//! eligibility filter treats that case specially.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::id::{AreaId, CategoryId, LabelId};

/// Mapping from an id to its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameRegistry<K: Eq + Hash> {
    names: HashMap<K, String>,
}

pub type LabelRegistry = NameRegistry<LabelId>;
pub type AreaRegistry = NameRegistry<AreaId>;
pub type CategoryRegistry = NameRegistry<CategoryId>;

impl<K: Eq + Hash> Default for NameRegistry<K> {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> NameRegistry<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or rename) an entry.
    pub fn insert(&mut self, id: impl Into<K>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    /// Name for `id`, if the registry knows it.
    #[must_use]
    pub fn resolve<Q>(&self, id: &Q) -> Option<&str>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.names.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl<K, I, N> FromIterator<(I, N)> for NameRegistry<K>
where
    K: Eq + Hash,
    I: Into<K>,
    N: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }
}
