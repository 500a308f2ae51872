//! Ordering + offset pagination over `sea_orm::Select`.
//! Order-by strings are resolved by `paging_core`; this module only maps
//! internal field names to columns and talks to the database.

use std::collections::HashMap;

use paging_core::{resolve_order_by, OrderBy, PageRequest, PagedList, PropertyMapping, SortDir};
use sea_orm::{
    sea_query::{Expr, LikeExpr, Order, SimpleExpr},
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Select,
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Internal field name → column. Names are matched case-insensitively.
#[derive(Clone)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, E::Column>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, field: impl Into<String>, col: E::Column) -> Self {
        self.map.insert(field.into().to_lowercase(), col);
        self
    }

    pub fn get(&self, field: &str) -> Option<&E::Column> {
        self.map.get(&field.to_lowercase())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Fields named by `mapping` that have no column here.
    pub fn missing_from(&self, mapping: &PropertyMapping) -> Vec<String> {
        let mut missing: Vec<String> = mapping
            .destination_fields()
            .filter(|f| !self.contains(f))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// A mapping table names a field the entity does not expose.
    #[error("no column mapped for field '{0}'")]
    UnmappedField(String),

    #[error(transparent)]
    Mapping(#[from] paging_core::Error),
}

/// Apply a resolved ordering (or a raw order-by string) to a select.
pub trait SortApplyExt<E: EntityTrait>: Sized {
    fn apply_order(self, order: &OrderBy, fields: &FieldMap<E>) -> Result<Self, PageError>;

    /// Resolve `raw` against `mapping` (unknown keys are skipped) and apply
    /// the result. An empty or fully unknown `raw` leaves the select as is.
    fn apply_sort(
        self,
        raw: &str,
        mapping: &PropertyMapping,
        fields: &FieldMap<E>,
    ) -> Result<Self, PageError> {
        let order = resolve_order_by(raw, mapping);
        self.apply_order(&order, fields)
    }
}

impl<E> SortApplyExt<E> for Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_order(self, order: &OrderBy, fields: &FieldMap<E>) -> Result<Self, PageError> {
        if order.is_empty() {
            return Ok(self);
        }

        // Resolve everything first so a bad table never yields a half-ordered query.
        let cols = order
            .keys()
            .iter()
            .map(|key| {
                fields
                    .get(&key.field)
                    .copied()
                    .map(|col| (col, key.dir))
                    .ok_or_else(|| PageError::UnmappedField(key.field.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(order = %order, "applying order");
        let mut query = self;
        for (col, dir) in cols {
            let sea_order = match dir {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };
            query = query.order_by(col, sea_order);
        }
        Ok(query)
    }
}

/* ---------- LIKE helpers ---------- */

fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            c => out.push(c),
        }
    }
    out
}

fn like_contains(s: &str) -> String {
    format!("%{}%", like_escape(s))
}

/// `col LIKE '%needle%'` with wildcard characters in `needle` matched literally.
pub fn contains<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    Expr::col(col).like(LikeExpr::new(like_contains(needle)).escape('\\'))
}

/// OR of [`contains`] over several columns.
pub fn contains_any<C: ColumnTrait + Copy>(cols: &[C], needle: &str) -> Condition {
    cols.iter()
        .fold(Condition::any(), |cond, col| cond.add(contains(*col, needle)))
}

/* ---------- pagination ---------- */

/// Count the filtered select, then fetch one window of it.
///
/// The count runs over the same select that is windowed, so `total_count`
/// reflects the filter. Pages past the end come back empty with the metadata
/// still filled in.
#[instrument(
    name = "routine_db.paginate",
    skip_all,
    fields(page = page.page_number, page_size = page.page_size)
)]
pub async fn paginate<E, C, D, F>(
    select: Select<E>,
    conn: &C,
    page: PageRequest,
    model_to_domain: F,
) -> Result<PagedList<D>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait + Send + Sync,
    F: FnMut(E::Model) -> D + Send,
{
    let total_count = select.clone().count(conn).await?;
    debug!(total_count, "counted filtered rows");

    let offset = page.offset();
    if offset >= total_count {
        return Ok(PagedList::empty(page, total_count));
    }

    let rows = select
        .offset(offset)
        .limit(page.page_size.max(1))
        .all(conn)
        .await?;

    let items = rows.into_iter().map(model_to_domain).collect();
    Ok(PagedList::new(
        items,
        page.page_number,
        page.page_size,
        total_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_escape_handles_wildcards() {
        assert_eq!(like_escape("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(like_contains("acme"), "%acme%");
    }
}
