use badwolf_model::{Predicate, TimeAnchor};
use badwolf_semantic::{FilterCall, FilterFn};
use badwolf_table::{Cell, Row, Table};

use crate::error::ExecError;

/// Applies a clause's `FILTER` calls to the table it was just joined into
/// (§4.4.3d): `latest`/`isTemporal`/`isImmutable`, in source order.
pub(crate) fn apply_filters(mut table: Table, filters: &[FilterCall]) -> Result<Table, ExecError> {
    for call in filters {
        table = match call.function {
            FilterFn::IsTemporal => table.filter(|row| Ok(predicate_cell(row, &call.binding).is_some_and(|p| p.is_temporal())))?,
            FilterFn::IsImmutable => table.filter(|row| Ok(predicate_cell(row, &call.binding).is_some_and(|p| p.is_immutable())))?,
            FilterFn::Latest => latest(&table, &call.binding),
        };
    }
    Ok(table)
}

fn predicate_cell(row: &Row, binding: &str) -> Option<Predicate> {
    match row.get(binding) {
        Cell::Predicate(p) => Some(p),
        _ => None,
    }
}

fn anchor_of(row: &Row, binding: &str) -> Option<TimeAnchor> {
    match row.get(binding) {
        Cell::TimeAnchor(a) => Some(a),
        Cell::Predicate(p) => p.anchor().copied(),
        _ => None,
    }
}

/// Keeps, among rows that agree on every binding other than `binding`, only
/// the one with the greatest time anchor there (ties keep whichever was
/// encountered first, §4.4.3d). Rows where `binding` has no anchor at all
/// are dropped — `latest` only means something for a temporal value.
fn latest(table: &Table, binding: &str) -> Table {
    let columns = table.columns().to_vec();
    let mut groups: Vec<(Vec<Cell>, Row, TimeAnchor)> = Vec::new();
    for row in table.rows() {
        let Some(anchor) = anchor_of(row, binding) else {
            continue;
        };
        let key: Vec<Cell> = columns.iter().filter(|c| c.as_str() != binding).map(|c| row.get(c)).collect();
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some(entry) => {
                if anchor > entry.2 {
                    entry.1 = row.clone();
                    entry.2 = anchor;
                }
            }
            None => groups.push((key, row.clone(), anchor)),
        }
    }
    let mut out = Table::new(columns);
    for (_, row, _) in groups {
        out.add_row(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use badwolf_model::{Node, TimeAnchor};
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(node: &str, anchor: &str) -> Row {
        Row::new()
            .with("?p", Cell::Node(Node::parse(node).unwrap()))
            .with("?t", Cell::TimeAnchor(TimeAnchor::from_str(anchor).unwrap()))
    }

    #[test]
    fn latest_keeps_the_greatest_anchor_per_other_bindings() {
        let mut table = Table::new(["?p", "?t"]);
        table.add_row(row("/Person<joe>", "2024-01-01T00:00:00Z"));
        table.add_row(row("/Person<joe>", "2024-06-01T00:00:00Z"));
        table.add_row(row("/Person<amy>", "2023-01-01T00:00:00Z"));

        let out = latest(&table, "?t");
        assert_eq!(out.len(), 2);
        let joe_anchor = out
            .rows()
            .iter()
            .find(|r| r.get("?p") == Cell::Node(Node::parse("/Person<joe>").unwrap()))
            .unwrap()
            .get("?t");
        assert_eq!(joe_anchor, Cell::TimeAnchor(TimeAnchor::from_str("2024-06-01T00:00:00Z").unwrap()));
    }
}
