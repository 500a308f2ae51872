//! Lenient `"field [asc|desc], ..."` resolution against a mapping table.

use tracing::debug;

use crate::{OrderBy, OrderKey, PropertyMapping, SortDir};

/// Split a raw order-by string into `(key, direction)` clauses.
///
/// Empty clauses are dropped. The direction is whatever follows the first run
/// of whitespace; only a case-insensitive `desc` means descending.
pub(crate) fn clauses(raw: &str) -> impl Iterator<Item = (&str, SortDir)> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|clause| match clause.split_once(char::is_whitespace) {
            Some((key, rest)) if rest.trim().eq_ignore_ascii_case("desc") => (key, SortDir::Desc),
            Some((key, _)) => (key, SortDir::Asc),
            None => (clause, SortDir::Asc),
        })
}

/// Resolve `raw` into an ordering over internal fields.
///
/// Unknown keys are skipped, so `"bogus"` resolves exactly like `""`: an
/// empty [`OrderBy`], meaning the query keeps whatever order it had. Each
/// matched entry contributes its destination fields in listed order, with the
/// direction flipped when the entry is marked `revert`.
pub fn resolve_order_by(raw: &str, mapping: &PropertyMapping) -> OrderBy {
    let mut order = OrderBy::empty();

    for (key, dir) in clauses(raw) {
        let Some(value) = mapping.get(key) else {
            debug!(key, "skipping unknown orderby key");
            continue;
        };

        let dir = if value.revert { dir.reverse() } else { dir };
        for field in &value.destination_properties {
            order.push(OrderKey::new(field.clone(), dir));
        }
    }

    order
}
