//! Grid and stacked layouts for multi-clip compositions.

/// Rows, columns and cell size of a side-by-side grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl GridLayout {
    /// Plan the grid for `num_clips` clips on a `canvas_width`×`canvas_height` canvas
    ///
    /// Columns follow `ceil(sqrt(n))` and rows `ceil(n / cols)`, except that
    /// three clips sit in a single row and five clips use a 3×2 grid.
    pub fn for_clips(num_clips: usize, canvas_width: u32, canvas_height: u32) -> Self {
        let (cols, rows) = match num_clips {
            3 => (3, 1),
            5 => (3, 2),
            n => {
                let cols = ceil_sqrt(n).max(1);
                (cols, n.div_ceil(cols).max(1))
            }
        };

        Self {
            cols,
            rows,
            cell_width: canvas_width / cols as u32,
            cell_height: canvas_height / rows as u32,
        }
    }

    /// Total number of cells in the grid
    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }

    /// Number of cells left without a clip
    pub fn filler_cells(&self, num_clips: usize) -> usize {
        self.cells().saturating_sub(num_clips)
    }

    /// Row-major cell index of `(row, col)`
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

/// Smallest `c` with `c * c >= n`
fn ceil_sqrt(n: usize) -> usize {
    let mut c = (n as f64).sqrt() as usize;
    while c * c < n {
        c += 1;
    }
    while c > 0 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c
}

/// Single-column layout where every clip gets an equal slice of the height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackedLayout {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl StackedLayout {
    pub fn for_clips(num_clips: usize, width: u32, total_height: u32) -> Self {
        Self {
            cell_width: width,
            cell_height: total_height / num_clips.max(1) as u32,
        }
    }
}
