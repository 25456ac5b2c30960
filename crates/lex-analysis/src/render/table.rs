//! Markdown tables.

use crate::render::TableRenderer;

/// Column alignment in a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// A header row plus body rows of preformatted cells.
///
/// Every row and the alignment list have exactly one entry per header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let alignments = vec![Alignment::Left; headers.len()];
        Self {
            headers,
            alignments,
            rows: Vec::new(),
        }
    }

    /// Override the alignment of each column, first to last.
    pub fn with_alignments(mut self, alignments: impl IntoIterator<Item = Alignment>) -> Self {
        for (slot, alignment) in self.alignments.iter_mut().zip(alignments) {
            *slot = alignment;
        }
        self
    }

    /// Append a row. Short rows are padded with empty cells, long rows truncated.
    pub fn push_row(&mut self, cells: Vec<String>) {
        let mut cells = cells;
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// GitHub-flavored pipe tables with padded columns.
///
/// ```text
/// | Column   |   Missing Values |
/// |:---------|-----------------:|
/// | id       |                0 |
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownTableRenderer;

impl MarkdownTableRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TableRenderer for MarkdownTableRenderer {
    fn render(&self, table: &Table) -> String {
        let headers: Vec<String> = table.headers().iter().map(|h| escape_cell(h)).collect();
        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| escape_cell(cell)).collect())
            .collect();

        let widths: Vec<usize> = (0..table.column_count())
            .map(|col| {
                rows.iter()
                    .chain(std::iter::once(&headers))
                    .filter_map(|row| row.get(col))
                    .map(|cell| display_width(cell))
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format_row(&headers, &widths, table.alignments()));

        let separator: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col, width)| {
                let dashes = "-".repeat(width + 1);
                match table.alignments().get(col).copied().unwrap_or_default() {
                    Alignment::Left => format!(":{}", dashes),
                    Alignment::Right => format!("{}:", dashes),
                }
            })
            .collect();
        out.push('|');
        out.push_str(&separator.join("|"));
        out.push_str("|\n");

        for row in &rows {
            out.push_str(&format_row(row, &widths, table.alignments()));
        }
        out
    }
}

fn format_row(cells: &[String], widths: &[usize], alignments: &[Alignment]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(col, width)| {
            let cell = cells.get(col).map_or("", String::as_str);
            let fill = " ".repeat(width.saturating_sub(display_width(cell)));
            match alignments.get(col).copied().unwrap_or_default() {
                Alignment::Left => format!(" {}{} ", cell, fill),
                Alignment::Right => format!(" {}{} ", fill, cell),
            }
        })
        .collect();
    format!("|{}|\n", padded.join("|"))
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn display_width(cell: &str) -> usize {
    cell.chars().count()
}
