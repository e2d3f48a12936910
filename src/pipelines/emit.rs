//! Rendering of multi-row INSERT statements.
//!
//! Output format is fixed: a header line naming the table and columns,
//! one tuple per line joined with `,\n`, and a `;` terminator. String
//! values are single-quoted with embedded quotes doubled.

/// Quote a string value for inclusion in a tuple.
pub fn sql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a complete INSERT block. No rows renders to an empty string,
/// not an INSERT with no tuples.
pub fn insert_block(table: &str, columns: &[&str], rows: &[String]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    format!(
        "INSERT INTO {} ({}) VALUES\n{};\n",
        table,
        columns.join(", "),
        rows.join(",\n")
    )
}
