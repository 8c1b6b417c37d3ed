//! The immutable category-code grid.

use crate::error::SceneError;

/// Largest supported extent per grid axis.
///
/// Scenarios wider or taller than this are rejected before any
/// computation begins; downstream artifacts encode positions with this
/// bound baked in.
pub const MAX_GRID_DIM: u32 = 1023;

/// Immutable 2-D grid of per-cell category codes.
///
/// Codes are row-major (`y * width + x`), matching the layout of the
/// decoded scene images the external asset loader produces. The meaning
/// of each code (obstacle, pickup, delivery, ...) is assigned by the
/// [`ScenarioConfig`](crate::scenario::ScenarioConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneGrid {
    width: u32,
    height: u32,
    codes: Vec<u8>,
}

impl SceneGrid {
    /// Build a grid from a row-major code buffer.
    ///
    /// Fails if either axis is zero or exceeds [`MAX_GRID_DIM`], or if
    /// `codes` does not hold exactly `width * height` entries.
    pub fn new(width: u32, height: u32, codes: Vec<u8>) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyGrid);
        }
        if width > MAX_GRID_DIM || height > MAX_GRID_DIM {
            return Err(SceneError::GridTooLarge { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if codes.len() != expected {
            return Err(SceneError::CodeCountMismatch {
                expected,
                got: codes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            codes,
        })
    }

    /// Build a grid where every cell carries the same code.
    pub fn filled(width: u32, height: u32, code: u8) -> Result<Self, SceneError> {
        let n = (width as usize).saturating_mul(height as usize);
        Self::new(width, height, vec![code; n])
    }

    /// Build a grid from rows of codes (outer index is `y`).
    ///
    /// All rows must have equal length.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, SceneError> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        let mut codes = Vec::with_capacity((width as usize) * (height as usize));
        for row in rows {
            if row.len() as u32 != width {
                return Err(SceneError::CodeCountMismatch {
                    expected: width as usize,
                    got: row.len(),
                });
            }
            codes.extend_from_slice(row);
        }
        Self::new(width, height, codes)
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` if `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Category code at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.codes[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Category code at an in-bounds cell.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn code_at(&self, x: u32, y: u32) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        self.codes[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// `true` if the cell at `(x, y)` is out of bounds or carries `code`.
    ///
    /// This is the obstacle/feature test used throughout transition
    /// computation: off-grid cells behave like blocked cells.
    pub fn is_code_or_oob(&self, x: i32, y: i32, code: u8) -> bool {
        match self.get(x, y) {
            Some(c) => c == code,
            None => true,
        }
    }
}
