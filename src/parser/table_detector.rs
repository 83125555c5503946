//! Table detection from ruling lines (lattice mode).
//!
//! Horizontal and vertical segments that touch are clustered into grids.
//! Each grid's distinct line coordinates become row and column boundaries,
//! and text fragments are assigned to cells by their center point.

use std::cmp::Ordering;

use crate::model::{BoundingBox, CellKind, LineSegment, Table, TableCell, TextFragment};

use super::layout::group_into_lines;

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Collinear lines closer than this (points) merge into one boundary
    pub snap_tolerance: f32,
    /// How far apart (points) a horizontal and vertical line may be and
    /// still belong to the same grid
    pub join_tolerance: f32,
    /// Segments shorter than this (points) are ignored
    pub min_segment_length: f32,
    /// Line tolerance used to order text inside a cell (fraction of font size)
    pub cell_line_tolerance: f32,
    /// Remove fragments consumed by a table from paragraph assembly
    pub exclude_table_text: bool,
    /// Emit cells that contain no text
    pub include_empty_cells: bool,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: 1.0,
            join_tolerance: 2.0,
            min_segment_length: 2.0,
            cell_line_tolerance: 0.5,
            exclude_table_text: true,
            include_empty_cells: true,
        }
    }
}

/// A detected table grid with its cell text.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Row boundaries (Y coordinates, top to bottom)
    pub row_boundaries: Vec<f32>,
    /// Column boundaries (X coordinates, left to right)
    pub column_boundaries: Vec<f32>,
    /// Union of the grid boundaries
    pub bounding_box: BoundingBox,
    /// Text fragments per cell, indexed `row * columns + column`
    cells: Vec<Vec<TextFragment>>,
}

impl DetectedTable {
    fn new(row_boundaries: Vec<f32>, column_boundaries: Vec<f32>) -> Self {
        let bounding_box = BoundingBox::new(
            column_boundaries[0],
            row_boundaries[0],
            column_boundaries[column_boundaries.len() - 1],
            row_boundaries[row_boundaries.len() - 1],
        );
        let cell_count = (row_boundaries.len() - 1) * (column_boundaries.len() - 1);
        Self {
            row_boundaries,
            column_boundaries,
            bounding_box,
            cells: vec![Vec::new(); cell_count],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.row_boundaries.len().saturating_sub(1)
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.column_boundaries.len().saturating_sub(1)
    }

    /// Locate the cell containing a point, if any.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let row = find_band(&self.row_boundaries, y)?;
        let column = find_band(&self.column_boundaries, x)?;
        Some((row, column))
    }

    /// Fragments assigned to a cell.
    pub fn cell_fragments(&self, row: usize, column: usize) -> &[TextFragment] {
        self.cells
            .get(row * self.columns() + column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn assign(&mut self, row: usize, column: usize, fragment: TextFragment) {
        let columns = self.columns();
        self.cells[row * columns + column].push(fragment);
    }

    /// Cell text in reading order.
    pub fn cell_text(&self, row: usize, column: usize, line_tolerance: f32) -> String {
        let lines = group_into_lines(self.cell_fragments(row, column).to_vec(), line_tolerance);
        let joined = lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Detects ruled tables on a page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TableDetectorConfig {
        &self.config
    }

    /// Detect tables in the given segments and assign fragments to cells.
    ///
    /// Returns detected tables (top to bottom, then left to right) and the
    /// fragments that were NOT consumed by a table.
    pub fn detect(
        &self,
        segments: &[LineSegment],
        fragments: Vec<TextFragment>,
    ) -> (Vec<DetectedTable>, Vec<TextFragment>) {
        log::debug!(
            "TableDetector: starting with {} segments, {} fragments",
            segments.len(),
            fragments.len()
        );

        let mut tables = self.detect_grids(segments);
        if tables.is_empty() {
            return (tables, fragments);
        }

        let mut unused = Vec::new();
        for fragment in fragments {
            let (cx, cy) = fragment.bounding_box.center();
            let hit = tables
                .iter()
                .enumerate()
                .find_map(|(i, t)| t.cell_at(cx, cy).map(|(r, c)| (i, r, c)));

            match hit {
                Some((i, row, column)) => {
                    if !self.config.exclude_table_text {
                        unused.push(fragment.clone());
                    }
                    tables[i].assign(row, column, fragment);
                }
                None => unused.push(fragment),
            }
        }

        log::debug!(
            "TableDetector: {} tables, {} fragments left for paragraphs",
            tables.len(),
            unused.len()
        );
        (tables, unused)
    }

    /// Build grids from segments without assigning text.
    pub fn detect_grids(&self, segments: &[LineSegment]) -> Vec<DetectedTable> {
        // Step 1: Partition by dominant axis
        let (horizontal, vertical): (Vec<LineSegment>, Vec<LineSegment>) = segments
            .iter()
            .copied()
            .filter(|s| s.length() >= self.config.min_segment_length)
            .partition(LineSegment::is_horizontal);

        log::debug!(
            "TableDetector: {} horizontal, {} vertical segments",
            horizontal.len(),
            vertical.len()
        );

        if horizontal.len() < 2 || vertical.len() < 2 {
            return vec![];
        }

        // Step 2: Cluster intersecting segments into grids
        let groups = self.cluster(&horizontal, &vertical);
        log::debug!("TableDetector: {} candidate grids", groups.len());

        // Step 3: Snap boundaries per grid
        let mut tables = Vec::new();
        for (h_idx, v_idx) in groups {
            if h_idx.len() < 2 || v_idx.len() < 2 {
                continue;
            }

            let rows = snap(
                h_idx.iter().map(|&i| horizontal[i].y0.min(horizontal[i].y1)).collect(),
                self.config.snap_tolerance,
            );
            let columns = snap(
                v_idx.iter().map(|&i| vertical[i].x0.min(vertical[i].x1)).collect(),
                self.config.snap_tolerance,
            );

            if rows.len() < 2 || columns.len() < 2 {
                log::warn!(
                    "TableDetector: dropping degenerate grid ({} row lines, {} column lines)",
                    rows.len(),
                    columns.len()
                );
                continue;
            }

            tables.push(DetectedTable::new(rows, columns));
        }

        tables.sort_by(|a, b| {
            match a.bounding_box.y_min.total_cmp(&b.bounding_box.y_min) {
                Ordering::Equal => a.bounding_box.x_min.total_cmp(&b.bounding_box.x_min),
                other => other,
            }
        });

        tables
    }

    /// Convert a detected table to the model's Table type.
    pub fn to_table_model(&self, detected: &DetectedTable, id: String, page_number: u32) -> Table {
        let rows = detected.rows();
        let columns = detected.columns();
        let mut cells = Vec::with_capacity(rows * columns);

        for row in 0..rows {
            let kind = if row == 0 && rows > 1 {
                CellKind::ColumnHeader
            } else {
                CellKind::Content
            };
            for column in 0..columns {
                let content = detected.cell_text(row, column, self.config.cell_line_tolerance);
                if content.is_empty() && !self.config.include_empty_cells {
                    continue;
                }
                cells.push(TableCell::new(row, column, content, kind));
            }
        }

        Table {
            id,
            page_number,
            rows,
            columns,
            cells,
            bounding_box: detected.bounding_box,
        }
    }

    /// Union-find over horizontal (indices `0..h`) and vertical
    /// (indices `h..h+v`) segments, joined when they intersect.
    fn cluster(
        &self,
        horizontal: &[LineSegment],
        vertical: &[LineSegment],
    ) -> Vec<(Vec<usize>, Vec<usize>)> {
        let tol = self.config.join_tolerance;
        let h_len = horizontal.len();
        let mut parent: Vec<usize> = (0..h_len + vertical.len()).collect();

        for (hi, h) in horizontal.iter().enumerate() {
            let (hx0, hx1) = ordered(h.x0, h.x1);
            let hy = h.y0.min(h.y1);
            for (vi, v) in vertical.iter().enumerate() {
                let (vy0, vy1) = ordered(v.y0, v.y1);
                let vx = v.x0.min(v.x1);
                let touches = vx >= hx0 - tol && vx <= hx1 + tol && hy >= vy0 - tol && hy <= vy1 + tol;
                if touches {
                    union(&mut parent, hi, h_len + vi);
                }
            }
        }

        // Group by root, keeping first-seen order
        let mut roots: Vec<usize> = Vec::new();
        let mut groups: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
        for i in 0..parent.len() {
            let root = find(&mut parent, i);
            let slot = match roots.iter().position(|&r| r == root) {
                Some(slot) => slot,
                None => {
                    roots.push(root);
                    groups.push((Vec::new(), Vec::new()));
                    roots.len() - 1
                }
            };
            if i < h_len {
                groups[slot].0.push(i);
            } else {
                groups[slot].1.push(i - h_len);
            }
        }

        groups
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi] = lo;
    }
}

/// Sort coordinates and merge runs closer than `tolerance` into their mean.
fn snap(mut coords: Vec<f32>, tolerance: f32) -> Vec<f32> {
    coords.sort_by(f32::total_cmp);

    let mut snapped: Vec<f32> = Vec::new();
    let mut cluster: Vec<f32> = Vec::new();
    for c in coords {
        if let Some(&last) = cluster.last() {
            if c - last >= tolerance {
                snapped.push(cluster.iter().sum::<f32>() / cluster.len() as f32);
                cluster.clear();
            }
        }
        cluster.push(c);
    }
    if !cluster.is_empty() {
        snapped.push(cluster.iter().sum::<f32>() / cluster.len() as f32);
    }

    snapped
}

/// Index of the band `[bounds[i], bounds[i+1]]` containing `v` (inclusive).
fn find_band(bounds: &[f32], v: f32) -> Option<usize> {
    bounds
        .windows(2)
        .position(|w| v >= w[0] && v <= w[1])
}
