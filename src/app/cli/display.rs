//! Rendering of statistics records as a table or JSON

use crate::core::styles::StyleRole;
use crate::stats::{StatValue, Stats};
use prettytable::{format, Cell, Row, Table};

fn styled_cell(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if use_color => cell.style_spec(&spec),
        _ => cell,
    }
}

fn value_role(value: &StatValue) -> StyleRole {
    match value {
        StatValue::Bool(true) => StyleRole::Valid,
        StatValue::Bool(false) => StyleRole::Invalid,
        _ => StyleRole::Value,
    }
}

/// Two-column table: statistic name and value, titled with the record's type name
pub fn stats_table(stats: &Stats, use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(vec![
        styled_cell(&stats.type_name, StyleRole::Header, use_color),
        Cell::new(""),
    ]));

    for element in &stats.elements {
        table.add_row(Row::new(vec![
            styled_cell(&element.name, StyleRole::Key, use_color),
            styled_cell(&element.value.to_string(), value_role(&element.value), use_color),
        ]));
    }
    table
}

/// Pretty-printed JSON document for a record
pub fn stats_json(stats: &Stats) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(stats)
}

/// Print a record to stdout in the chosen format
pub fn print_stats(stats: &Stats, json: bool, use_color: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", stats_json(stats)?);
    } else {
        stats_table(stats, use_color).printstd();
    }
    Ok(())
}
