use badwolf_helpers::IndexMap;
use smol_str::SmolStr;

use crate::cell::Cell;

/// A mapping from binding name to `Cell`; a missing key denotes `NULL`
/// (§3.4), same as an explicit `Cell::Null` entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(IndexMap<SmolStr, Cell>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, binding: impl Into<SmolStr>, cell: Cell) {
        self.0.insert(binding.into(), cell);
    }

    pub fn with(mut self, binding: impl Into<SmolStr>, cell: Cell) -> Self {
        self.set(binding, cell);
        self
    }

    pub fn get(&self, binding: &str) -> Cell {
        self.0.get(binding).cloned().unwrap_or(Cell::Null)
    }

    pub fn contains(&self, binding: &str) -> bool {
        self.0.contains_key(binding)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &SmolStr> {
        self.0.keys()
    }

    /// Merges `other`'s cells into a copy of `self`; `other` wins on an
    /// overlapping binding (used by joins, where the shared-binding values
    /// already matched).
    pub fn merged_with(&self, other: &Row) -> Row {
        let mut merged = self.clone();
        for (binding, cell) in other.0.iter() {
            merged.0.insert(binding.clone(), cell.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_binding_reads_as_null() {
        let row = Row::new();
        assert_eq!(row.get("?x"), Cell::Null);
    }

    #[test]
    fn merge_lets_the_other_row_win_on_overlap() {
        let a = Row::new().with("?x", Cell::Text("a".into()));
        let b = Row::new().with("?x", Cell::Text("b".into()));
        assert_eq!(a.merged_with(&b).get("?x"), Cell::Text("b".into()));
    }
}
