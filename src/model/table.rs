//! Table types.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A table reconstructed from a ruled grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Identifier (`table-<n>`), dense across a result
    pub id: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Number of grid rows
    pub rows: usize,

    /// Number of grid columns
    pub columns: usize,

    /// Cells in row-major order; a grid coordinate may have no cell
    pub cells: Vec<TableCell>,

    /// Union of the grid boundaries
    pub bounding_box: BoundingBox,
}

impl Table {
    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Look up the cell at a grid coordinate.
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.cells
            .iter()
            .find(|c| c.row_index == row && c.column_index == column)
    }

    /// Header cells (row 0 when the table has a header row).
    pub fn header(&self) -> impl Iterator<Item = &TableCell> {
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::ColumnHeader)
    }

    /// Check if the table has no cell text at all.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Get plain text representation of the table, one line per row.
    pub fn plain_text(&self) -> String {
        (0..self.rows)
            .map(|r| {
                (0..self.columns)
                    .map(|c| self.cell(r, c).map(|cell| cell.content.as_str()).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Kind of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    /// Header cell of the first row
    ColumnHeader,
    /// Regular data cell
    Content,
}

/// A table cell at a 0-based grid coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Row index (0-based)
    pub row_index: usize,

    /// Column index (0-based)
    pub column_index: usize,

    /// Cell text
    pub content: String,

    /// Cell kind
    pub kind: CellKind,
}

impl TableCell {
    /// Create a new cell.
    pub fn new(row_index: usize, column_index: usize, content: impl Into<String>, kind: CellKind) -> Self {
        Self {
            row_index,
            column_index,
            content: content.into(),
            kind,
        }
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Check if this is a header cell.
    pub fn is_header(&self) -> bool {
        self.kind == CellKind::ColumnHeader
    }
}
