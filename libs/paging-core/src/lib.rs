//! Store-agnostic sorting and paging primitives.
//!
//! - [`PropertyMappingService`] translates externally exposed sort keys into
//!   internal entity fields.
//! - [`resolve_order_by`] turns a raw `"field [asc|desc], ..."` string into an
//!   explicit [`OrderBy`] over internal fields.
//! - [`PagedList`] bundles one materialized page with its metadata.
//!
//! Nothing here touches a database; the store adapter consumes [`OrderBy`]
//! and produces [`PagedList`].

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod mapping;
pub mod page;
pub mod sort;

pub use mapping::{PropertyMapping, PropertyMappingService, PropertyMappingValue};
pub use page::{PageRequest, PageSizeCfg, PagedList, PaginationMetadata};
pub use sort::resolve_order_by;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    /// Flip the direction (used for mapping entries with `revert` set).
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// One ordering key over an internal entity field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub field: String,
    pub dir: SortDir,
}

impl OrderKey {
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }
}

/// Ordered list of sort keys: index 0 is the primary key, the rest are
/// tie-breakers in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderBy(pub Vec<OrderKey>);

impl OrderBy {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> &[OrderKey] {
        &self.0
    }

    pub fn push(&mut self, key: OrderKey) {
        self.0.push(key);
    }

    /// Compact `"+a,-b"` rendering, handy for log fields.
    pub fn to_signed_tokens(&self) -> String {
        self.0
            .iter()
            .map(|k| match k.dir {
                SortDir::Asc => format!("+{}", k.field),
                SortDir::Desc => format!("-{}", k.field),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_signed_tokens())
    }
}

/// Errors raised by mapping lookup and strict order-by validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No table registered for the requested pair. This is a wiring bug,
    /// not a user input problem.
    #[error("no property mapping registered for {shape} -> {entity}")]
    MappingNotFound { shape: String, entity: String },

    #[error("invalid orderby field: {0}")]
    InvalidOrderByField(String),
}

impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MappingNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
