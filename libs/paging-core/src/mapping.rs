//! Property mapping tables: external sort key → internal entity fields.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::warn;

use crate::sort::clauses;
use crate::{Error, Result};

/// Target of one external key: the internal fields it expands into, in
/// order, and whether the requested direction is flipped for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyMappingValue {
    pub destination_properties: Vec<String>,
    pub revert: bool,
}

impl PropertyMappingValue {
    pub fn new<I, S>(destination_properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            destination_properties: destination_properties.into_iter().map(Into::into).collect(),
            revert: false,
        }
    }

    /// Same fields, opposite direction (e.g. "age" ascending is
    /// "date of birth" descending).
    pub fn reverted(mut self) -> Self {
        self.revert = true;
        self
    }
}

/// One mapping table. Keys are matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct PropertyMapping {
    map: HashMap<String, PropertyMappingValue>,
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: PropertyMappingValue) -> Self {
        self.map.insert(key.into().trim().to_lowercase(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyMappingValue> {
        self.map.get(&key.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every internal field referenced by the table.
    pub fn destination_fields(&self) -> impl Iterator<Item = &str> {
        self.map
            .values()
            .flat_map(|v| v.destination_properties.iter().map(String::as_str))
    }

    /// Strict check: every clause key in `raw` must be present in the table.
    /// An empty string is valid.
    pub fn validate_order_by(&self, raw: &str) -> Result<()> {
        for (key, _) in clauses(raw) {
            if self.get(key).is_none() {
                return Err(Error::InvalidOrderByField(key.to_string()));
            }
        }
        Ok(())
    }

    pub fn valid_mapping_exists_for(&self, raw: &str) -> bool {
        self.validate_order_by(raw).is_ok()
    }
}

/// Registry of mapping tables keyed by `(shape, entity)` tags.
///
/// Built once at start-up through [`register`](Self::register); there is no
/// mutation API afterwards, so a shared `Arc` needs no locking.
#[derive(Clone, Debug)]
pub struct PropertyMappingService<S, T> {
    tables: HashMap<(S, T), PropertyMapping>,
}

impl<S, T> Default for PropertyMappingService<S, T>
where
    S: Copy + Eq + Hash + Debug,
    T: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> PropertyMappingService<S, T>
where
    S: Copy + Eq + Hash + Debug,
    T: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Register the table for a pair. The first registration wins.
    #[must_use]
    pub fn register(mut self, shape: S, entity: T, mapping: PropertyMapping) -> Self {
        if self.tables.contains_key(&(shape, entity)) {
            warn!(?shape, ?entity, "duplicate property mapping registration ignored");
            return self;
        }
        self.tables.insert((shape, entity), mapping);
        self
    }

    pub fn get_property_mapping(&self, shape: S, entity: T) -> Result<&PropertyMapping> {
        self.tables
            .get(&(shape, entity))
            .ok_or_else(|| Error::MappingNotFound {
                shape: format!("{shape:?}"),
                entity: format!("{entity:?}"),
            })
    }

    pub fn is_registered(&self, shape: S, entity: T) -> bool {
        self.tables.contains_key(&(shape, entity))
    }
}
