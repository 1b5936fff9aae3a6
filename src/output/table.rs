//! Plain text tables shared by the live view and the report document

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Left,
            min_width: 0,
        }
    }

    pub fn right(header: &str) -> Self {
        Self {
            header: header.to_string(),
            alignment: Alignment::Right,
            min_width: 0,
        }
    }
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
}

impl TableFormat {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            show_borders: true,
        }
    }

    /// Render header and rows as lines. Cells are never truncated, so a
    /// value reads the same here as anywhere else it is printed.
    pub fn render(&self, rows: &[RowData]) -> Vec<String> {
        let widths = self.column_widths(rows);
        let mut lines = Vec::with_capacity(rows.len() + 4);

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        if self.show_borders {
            lines.push(horizontal_border(&widths));
        }
        lines.push(self.row(&headers, &widths));
        if self.show_borders {
            lines.push(horizontal_border(&widths));
        }

        for row in rows {
            lines.push(self.row(row, &widths));
        }

        if self.show_borders && !rows.is_empty() {
            lines.push(horizontal_border(&widths));
        }
        lines
    }

    fn column_widths(&self, rows: &[RowData]) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                rows.iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .fold(column.min_width.max(column.header.chars().count()), usize::max)
            })
            .collect()
    }

    fn row(&self, data: &[String], widths: &[usize]) -> String {
        let mut row = String::new();
        if self.show_borders {
            row.push('|');
        }

        for (index, width) in widths.iter().enumerate() {
            let cell = data.get(index).map(String::as_str).unwrap_or("");
            let alignment = self.columns[index].alignment;
            let padded = align_text(cell, *width, alignment);

            if self.show_borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }
}

fn horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let padding = width.saturating_sub(text.chars().count());
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
    }
}
