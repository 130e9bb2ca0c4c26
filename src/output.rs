//! Plain-text rendering of table models.

use std::io::{self, Write};

use playdeck_core::{TableLine, TableModel};

const COLUMN_GAP: &str = "  ";

/// Write `model` as an aligned text table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_table(out: &mut impl Write, model: &TableModel) -> io::Result<()> {
    match model {
        TableModel::Loading => writeln!(out, "Loading..."),
        TableModel::Failed(message) | TableModel::Empty(message) => writeln!(out, "{message}"),
        TableModel::Rows {
            headers,
            rows,
            status_column,
        } => {
            let widths = column_widths(headers, rows);
            write_line(out, headers, &widths, None)?;
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            write_line(out, &rule, &widths, None)?;
            rows.iter()
                .try_for_each(|row| write_line(out, &row.cells, &widths, *status_column))
        }
    }
}

/// Render `model` into a string.
pub fn render_table(model: &TableModel) -> String {
    let mut buffer = Vec::new();
    match write_table(&mut buffer, model) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(e) => e.to_string(),
    }
}

fn column_widths(headers: &[String], rows: &[TableLine]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(column, header)| {
            rows.iter()
                .filter_map(|row| row.cells.get(column))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect()
}

fn write_line(
    out: &mut impl Write,
    cells: &[String],
    widths: &[usize],
    status_column: Option<usize>,
) -> io::Result<()> {
    let rendered: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(column, width)| {
            let cell = cells.get(column).map_or("", String::as_str);
            if status_column == Some(column) {
                format!("{:<width$}", cell.to_uppercase())
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();
    writeln!(out, "{}", rendered.join(COLUMN_GAP).trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TableModel {
        TableModel::Rows {
            headers: vec!["Name".to_string(), "Status".to_string()],
            rows: vec![
                TableLine {
                    key: "1".to_string(),
                    cells: vec!["web-01".to_string(), "online".to_string()],
                },
                TableLine {
                    key: "2".to_string(),
                    cells: vec!["db".to_string(), "offline".to_string()],
                },
            ],
            status_column: Some(1),
        }
    }

    #[test]
    fn test_rows_are_aligned_under_headers() {
        let text = render_table(&model());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Name    Status",
                "------  -------",
                "web-01  ONLINE",
                "db      OFFLINE",
            ]
        );
    }

    #[test]
    fn test_empty_and_failed_print_message() {
        assert_eq!(
            render_table(&TableModel::Empty("No servers found".to_string())),
            "No servers found\n"
        );
        assert_eq!(
            render_table(&TableModel::Failed("Failed to load servers".to_string())),
            "Failed to load servers\n"
        );
    }

    #[test]
    fn test_wide_characters_count_once() {
        let model = TableModel::Rows {
            headers: vec!["Output".to_string()],
            rows: vec![TableLine {
                key: "1".to_string(),
                cells: vec!["ok…".to_string()],
            }],
            status_column: None,
        };
        let text = render_table(&model);
        assert_eq!(text.lines().nth(1), Some("------"));
    }
}
