use std::cmp::Ordering;

use badwolf_model::Literal;
use itertools::Itertools;
use smol_str::SmolStr;

use crate::aggregation::{Aggregation, AggregationKind, Direction};
use crate::cell::Cell;
use crate::error::TableError;
use crate::row::Row;

/// An ordered sequence of binding names plus an ordered sequence of rows
/// (§3.4). Every operation here is deterministic and preserves insertion
/// order unless a sort/group is explicitly requested (§4.5).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<SmolStr>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        let cols = columns.into_iter().map(Into::into).unique().collect();
        Self {
            columns: cols,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[SmolStr] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends one row, widening the column list with any binding the row
    /// introduces (§3.4 `AddRow`).
    pub fn add_row(&mut self, row: Row) {
        for binding in row.bindings() {
            if !self.columns.iter().any(|c| c == binding) {
                self.columns.push(binding.clone());
            }
        }
        self.rows.push(row);
    }

    /// Union: concatenates `other`'s rows onto `self`, widening columns.
    pub fn append_table(mut self, other: Table) -> Table {
        for c in &other.columns {
            if !self.columns.contains(c) {
                self.columns.push(c.clone());
            }
        }
        self.rows.extend(other.rows);
        self
    }

    /// Cartesian product, used when the incoming clause table shares no
    /// bindings with the accumulated table (§4.4.3c).
    pub fn dot_product(&self, other: &Table) -> Table {
        let columns = merged_columns(&self.columns, &other.columns);
        let mut rows = Vec::with_capacity(self.rows.len() * other.rows.len());
        for left in &self.rows {
            for right in &other.rows {
                rows.push(left.merged_with(right));
            }
        }
        Table { columns, rows }
    }

    fn shared_bindings(&self, other: &Table) -> Vec<SmolStr> {
        self.columns
            .iter()
            .filter(|c| other.columns.contains(c))
            .cloned()
            .collect()
    }

    fn equi_join(&self, other: &Table, keep_unmatched: bool) -> Table {
        let shared = self.shared_bindings(other);
        let columns = merged_columns(&self.columns, &other.columns);
        let mut rows = Vec::new();
        for left in &self.rows {
            let mut matched = false;
            for right in &other.rows {
                if shared.iter().all(|b| left.get(b) == right.get(b)) {
                    rows.push(left.merged_with(right));
                    matched = true;
                }
            }
            if !matched && keep_unmatched {
                rows.push(left.clone());
            }
        }
        Table { columns, rows }
    }

    /// Inner hash-equi-join on shared bindings (non-`OPTIONAL` clause, §4.4.3c).
    pub fn inner_join(&self, other: &Table) -> Table {
        self.equi_join(other, false)
    }

    /// Left outer join on shared bindings: unmatched left rows are kept with
    /// NULL cells for `other`'s new bindings (`OPTIONAL` clause, §4.4.3c).
    /// Preserves the left side's row order (§4.5).
    pub fn left_optional_join(&self, other: &Table) -> Table {
        self.equi_join(other, true)
    }

    pub fn filter(
        &self,
        pred: impl Fn(&Row) -> Result<bool, TableError>,
    ) -> Result<Table, TableError> {
        let mut rows = Vec::new();
        for row in &self.rows {
            if pred(row)? {
                rows.push(row.clone());
            }
        }
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Reduces and renames columns: each pair is `(source_binding, output_alias)`.
    pub fn project(&self, projection: &[(SmolStr, SmolStr)]) -> Table {
        let columns = projection.iter().map(|(_, alias)| alias.clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Row::new();
                for (source, alias) in projection {
                    out.set(alias.clone(), row.get(source));
                }
                out
            })
            .collect();
        Table { columns, rows }
    }

    pub fn rename(&self, mapping: &[(SmolStr, SmolStr)]) -> Table {
        let renamed = |c: &SmolStr| {
            mapping
                .iter()
                .find(|(from, _)| from == c)
                .map(|(_, to)| to.clone())
                .unwrap_or_else(|| c.clone())
        };
        let columns = self.columns.iter().map(renamed).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Row::new();
                for c in &self.columns {
                    out.set(renamed(c), row.get(c));
                }
                out
            })
            .collect();
        Table { columns, rows }
    }

    /// Stable multi-key sort (§4.4.3g); comparator mirrors HAVING's ordering
    /// semantics and is equally type-fatal on a mismatch.
    pub fn sort_by(&self, directions: &[(SmolStr, Direction)]) -> Result<Table, TableError> {
        let mut rows = self.rows.clone();
        let mut first_err = None;
        rows.sort_by(|a, b| {
            for (binding, direction) in directions {
                let ord = match a.get(binding).compare(&b.get(binding)) {
                    Ok(ord) => ord,
                    Err(e) => {
                        first_err.get_or_insert(e);
                        Ordering::Equal
                    }
                };
                let ord = if *direction == Direction::Desc {
                    ord.reverse()
                } else {
                    ord
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        if let Some(e) = first_err {
            return Err(e);
        }
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Partitions rows by `keys` and computes `aggregations` within each
    /// partition (§4.4.3f). Output order is ascending by the grouping keys,
    /// ties broken by original order (§4.5).
    pub fn group_by(
        &self,
        keys: &[SmolStr],
        aggregations: &[Aggregation],
    ) -> Result<Table, TableError> {
        let mut groups: Vec<(Vec<Cell>, Vec<&Row>)> = Vec::new();
        for row in &self.rows {
            let key: Vec<Cell> = keys.iter().map(|k| row.get(k)).collect();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1.push(row),
                None => groups.push((key, vec![row])),
            }
        }

        let mut sort_err = None;
        groups.sort_by(|a, b| {
            for (x, y) in a.0.iter().zip(b.0.iter()) {
                match x.compare(y) {
                    Ok(Ordering::Equal) => continue,
                    Ok(ord) => return ord,
                    Err(e) => {
                        sort_err.get_or_insert(e);
                        return Ordering::Equal;
                    }
                }
            }
            Ordering::Equal
        });
        if let Some(e) = sort_err {
            return Err(e);
        }

        let mut columns: Vec<SmolStr> = keys.to_vec();
        for agg in aggregations {
            columns.push(agg.alias.clone());
        }

        let mut rows = Vec::with_capacity(groups.len());
        for (key_cells, members) in groups {
            let mut out = Row::new();
            for (k, cell) in keys.iter().zip(key_cells) {
                out.set(k.clone(), cell);
            }
            for agg in aggregations {
                out.set(agg.alias.clone(), compute_aggregation(agg, &members)?);
            }
            rows.push(out);
        }
        Ok(Table { columns, rows })
    }

    pub fn limit(&self, n: usize) -> Table {
        let mut rows = self.rows.clone();
        rows.truncate(n);
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn deduplicate(&self) -> Table {
        let mut rows: Vec<Row> = Vec::new();
        for row in &self.rows {
            if !rows.contains(row) {
                rows.push(row.clone());
            }
        }
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }
}

fn merged_columns(a: &[SmolStr], b: &[SmolStr]) -> Vec<SmolStr> {
    a.iter().chain(b.iter()).cloned().unique().collect()
}

fn compute_aggregation(agg: &Aggregation, members: &[&Row]) -> Result<Cell, TableError> {
    match agg.kind {
        AggregationKind::Count => {
            let n = members.iter().filter(|r| !r.get(&agg.binding).is_null()).count();
            Ok(Cell::Literal(Literal::Int64(n as i64)))
        }
        AggregationKind::CountDistinct => {
            let mut seen: Vec<Cell> = Vec::new();
            for r in members {
                let c = r.get(&agg.binding);
                if c.is_null() {
                    continue;
                }
                if !seen.contains(&c) {
                    seen.push(c);
                }
            }
            Ok(Cell::Literal(Literal::Int64(seen.len() as i64)))
        }
        AggregationKind::Sum => {
            let mut sum_i: i64 = 0;
            let mut sum_f: f64 = 0.0;
            let mut is_float = false;
            for r in members {
                let cell = r.get(&agg.binding);
                if cell.is_null() {
                    continue;
                }
                match cell {
                    Cell::Literal(Literal::Int64(v)) => {
                        if is_float {
                            sum_f += v as f64;
                        } else {
                            sum_i = sum_i.checked_add(v).ok_or_else(|| TableError::SumOverflow {
                                binding: agg.binding.clone(),
                            })?;
                        }
                    }
                    Cell::Literal(Literal::Float64(v)) => {
                        if !is_float {
                            sum_f = sum_i as f64;
                            is_float = true;
                        }
                        sum_f += v;
                    }
                    _ => {
                        return Err(TableError::SumNotNumeric {
                            binding: agg.binding.clone(),
                        })
                    }
                }
            }
            Ok(if is_float {
                Cell::Literal(Literal::Float64(sum_f))
            } else {
                Cell::Literal(Literal::Int64(sum_i))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(pairs: &[(&str, Cell)]) -> Row {
        let mut r = Row::new();
        for (b, c) in pairs {
            r.set(*b, c.clone());
        }
        r
    }

    #[test]
    fn dot_product_is_the_full_cartesian_product() {
        let mut left = Table::new(["?a"]);
        left.add_row(row(&[("?a", Cell::Text("1".into()))]));
        left.add_row(row(&[("?a", Cell::Text("2".into()))]));
        let mut right = Table::new(["?b"]);
        right.add_row(row(&[("?b", Cell::Text("x".into()))]));

        let product = left.dot_product(&right);
        assert_eq!(product.len(), 2);
        assert_eq!(product.rows()[0].get("?b"), Cell::Text("x".into()));
    }

    #[test]
    fn left_optional_join_keeps_unmatched_rows_with_nulls() {
        let mut left = Table::new(["?a"]);
        left.add_row(row(&[("?a", Cell::Text("1".into()))]));
        left.add_row(row(&[("?a", Cell::Text("2".into()))]));
        let mut right = Table::new(["?a", "?b"]);
        right.add_row(row(&[("?a", Cell::Text("1".into())), ("?b", Cell::Text("y".into()))]));

        let joined = left.left_optional_join(&right);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.rows()[1].get("?b"), Cell::Null);
    }

    #[test]
    fn inner_join_drops_unmatched_rows() {
        let mut left = Table::new(["?a"]);
        left.add_row(row(&[("?a", Cell::Text("1".into()))]));
        left.add_row(row(&[("?a", Cell::Text("2".into()))]));
        let mut right = Table::new(["?a", "?b"]);
        right.add_row(row(&[("?a", Cell::Text("1".into())), ("?b", Cell::Text("y".into()))]));

        let joined = left.inner_join(&right);
        assert_eq!(joined.len(), 1);
    }

    #[test]
    fn group_by_counts_and_sums_per_partition() {
        let mut table = Table::new(["?g", "?n"]);
        table.add_row(row(&[
            ("?g", Cell::Text("joe".into())),
            ("?n", Cell::Literal(Literal::Int64(1))),
        ]));
        table.add_row(row(&[
            ("?g", Cell::Text("joe".into())),
            ("?n", Cell::Literal(Literal::Int64(1))),
        ]));

        let grouped = table
            .group_by(
                &["?g".into()],
                &[Aggregation::new("?n", AggregationKind::Count, "?count")],
            )
            .unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.rows()[0].get("?count"), Cell::Literal(Literal::Int64(2)));
    }

    #[test]
    fn limit_truncates_and_deduplicate_collapses_identical_rows() {
        let mut table = Table::new(["?a"]);
        table.add_row(row(&[("?a", Cell::Text("1".into()))]));
        table.add_row(row(&[("?a", Cell::Text("1".into()))]));
        table.add_row(row(&[("?a", Cell::Text("2".into()))]));

        assert_eq!(table.limit(2).len(), 2);
        assert_eq!(table.deduplicate().len(), 2);
    }

    #[test]
    fn sort_by_respects_direction_per_binding() {
        let mut table = Table::new(["?h"]);
        table.add_row(row(&[("?h", Cell::Literal(Literal::Int64(151)))]));
        table.add_row(row(&[("?h", Cell::Literal(Literal::Int64(174)))]));

        let sorted = table.sort_by(&[("?h".into(), Direction::Desc)]).unwrap();
        assert_eq!(sorted.rows()[0].get("?h"), Cell::Literal(Literal::Int64(174)));
    }
}
