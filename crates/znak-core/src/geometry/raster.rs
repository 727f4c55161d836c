use std::collections::HashSet;

use super::Ellipse;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("row {row} is outside a grid of height {height}")]
    RowOutOfRange { row: usize, height: usize },

    #[error("row {0} is encoded more than once")]
    DuplicateRow(usize),

    #[error("row {row}: runs sum to {total}, grid width is {width}")]
    RunLengthMismatch { row: usize, total: usize, width: usize },

    #[error("row {0} has more than one run of set cells")]
    NonContiguousRow(usize),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Fixed-size 0/1 grid stored as one bitset row per scanline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    /// u64 words per row.
    stride: usize,
    bits: Vec<u64>,
}

impl Raster {
    pub fn empty(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(64);
        Self {
            width,
            height,
            stride,
            bits: vec![0; stride * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y * self.stride + x / 64] & (1 << (x % 64)) != 0
    }

    /// Set one cell. Out-of-grid coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.bits[y * self.stride + x / 64] |= 1 << (x % 64);
        }
    }

    fn fill_run(&mut self, y: usize, start: usize, len: usize) {
        for x in start..start + len {
            self.set(x, y);
        }
    }

    /// Number of set cells.
    pub fn area(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of cells set in both rasters.
    ///
    /// Both rasters are expected to share the same dimensions; with
    /// mismatched grids only the common prefix of rows is compared.
    pub fn overlap(&self, other: &Raster) -> u32 {
        debug_assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "overlap of rasters with different dimensions"
        );
        self.bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| (a & b).count_ones())
            .sum()
    }

    /// Runs of set cells in row `y`, as `(start, len)` pairs.
    pub fn row_runs(&self, y: usize) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut start = None;
        for x in 0..self.width {
            match (self.get(x, y), start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push((s, x - s));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push((s, self.width - s));
        }
        runs
    }
}

/// Rasterize `ellipse` onto a `width × height` grid.
///
/// Every cell is tested against the ellipse; a degenerate ellipse (zero
/// semi-axis) yields an all-zero raster.
pub fn rasterize(ellipse: &Ellipse, width: usize, height: usize) -> Raster {
    let mut raster = Raster::empty(width, height);
    if ellipse.is_degenerate() {
        return raster;
    }
    for y in 0..height {
        let dy = y as f64 - ellipse.center.y;
        for x in 0..width {
            let dx = x as f64 - ellipse.center.x;
            if ellipse.encloses(dx, dy) {
                raster.set(x, y);
            }
        }
    }
    raster
}

/// Decode a run-length placement: `;`-separated rows of
/// `"row,zeros,ones,zeros"`.
///
/// Rows not listed are empty. An empty string decodes to an empty raster.
pub fn decode_run_length(
    encoding: &str,
    width: usize,
    height: usize,
) -> Result<Raster, RasterError> {
    let mut raster = Raster::empty(width, height);
    let mut seen = HashSet::new();

    for row_text in encoding.split(';').map(str::trim).filter(|r| !r.is_empty()) {
        let fields = row_text
            .split(',')
            .map(|f| f.trim().parse::<usize>())
            .collect::<Result<Vec<usize>, _>>()
            .map_err(|e| RasterError::Parse(format!("row {row_text:?}: {e}")))?;
        let &[row, lead, ones, trail] = fields.as_slice() else {
            return Err(RasterError::Parse(format!(
                "row {row_text:?}: expected 4 fields, got {}",
                fields.len()
            )));
        };

        if row >= height {
            return Err(RasterError::RowOutOfRange { row, height });
        }
        if !seen.insert(row) {
            return Err(RasterError::DuplicateRow(row));
        }
        let total = lead
            .checked_add(ones)
            .and_then(|t| t.checked_add(trail))
            .unwrap_or(usize::MAX);
        if total != width {
            return Err(RasterError::RunLengthMismatch { row, total, width });
        }
        raster.fill_run(row, lead, ones);
    }

    Ok(raster)
}

/// Encode a raster in the run-length placement format.
///
/// Only rows with set cells are written. Each such row must hold a single
/// contiguous run.
pub fn encode_run_length(raster: &Raster) -> Result<String, RasterError> {
    let mut rows = Vec::new();
    for y in 0..raster.height() {
        match raster.row_runs(y).as_slice() {
            [] => {}
            &[(start, len)] => {
                let trail = raster.width() - start - len;
                rows.push(format!("{y},{start},{len},{trail}"));
            }
            _ => return Err(RasterError::NonContiguousRow(y)),
        }
    }
    Ok(rows.join(";"))
}
