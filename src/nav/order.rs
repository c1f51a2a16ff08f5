//! Display ordering of themes and modules.
//!
//! Authors give every theme and module an explicit `indexorder`; the
//! metadata loader already refuses anything without one, so ordering never
//! falls back to names. Two entries sharing an `indexorder` is allowed but
//! reported, and their relative order is then decided by name.

use crate::diagnostics::Diagnostics;

/// Sort `items` by `(indexorder, name)` and warn about shared `indexorder` values.
pub fn by_index_order<T>(
    items: &mut [T],
    key: impl Fn(&T) -> (i64, &str),
    scope: &str,
    diag: &mut Diagnostics,
) {
    items.sort_by(|a, b| key(a).cmp(&key(b)));

    for pair in items.windows(2) {
        let (order_a, name_a) = key(&pair[0]);
        let (order_b, name_b) = key(&pair[1]);
        if order_a == order_b {
            diag.warn(
                scope,
                format!("'{name_a}' and '{name_b}' share indexorder {order_a}; ordering them by name"),
            );
        }
    }
}
