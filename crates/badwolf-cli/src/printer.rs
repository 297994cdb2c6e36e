use badwolf_table::{Cell, Table};

/// Renders a `Table` as tab-separated text: one header row of column names,
/// one row per result, `NULL` spelled out for an empty cell.
pub(crate) fn print_table(table: &Table) {
    let columns = table.columns();
    if columns.is_empty() {
        return;
    }
    println!("{}", columns.join("\t"));
    for row in table.rows() {
        let cells: Vec<String> = columns.iter().map(|c| format_cell(row.get(c))).collect();
        println!("{}", cells.join("\t"));
    }
}

fn format_cell(cell: Cell) -> String {
    match cell {
        Cell::Null => "NULL".to_string(),
        Cell::Node(n) => n.to_string(),
        Cell::Predicate(p) => p.to_string(),
        Cell::Literal(l) => l.to_string(),
        Cell::Text(s) => s.to_string(),
        Cell::TimeAnchor(t) => t.to_string(),
    }
}
