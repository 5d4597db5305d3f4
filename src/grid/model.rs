//! Cell and grid model
//!
//! A `GridModel` is a dense 2D array of `Cell`s indexed `[x, y]`. A cell with
//! `height > 0` is walkable floor at that elevation; `height == 0` is empty
//! space (a wall, as far as the generators are concerned). Each cell also
//! carries four wall flags so a host editor can suppress individual wall
//! faces without touching the height data.

use serde::{Serialize, Deserialize};

/// Validation limits applied to grid dimensions and mesh settings
pub mod limits {
    /// Smallest usable grid dimension (width or height)
    pub const MIN_GRID_SIZE: i32 = 2;
    /// Largest grid dimension; generation is O(cells) and re-runs per edit
    pub const MAX_GRID_SIZE: i32 = 100;
    /// Maximum tessellation resolution per quad (sub-quads per axis)
    pub const MAX_MESH_RESOLUTION: u32 = 8;
}

fn default_true() -> bool { true }

/// A single grid cell: floor elevation plus per-side wall flags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Floor elevation; 0 = empty/wall, >0 = walkable floor
    #[serde(default)]
    pub height: f32,
    /// Wall on the -X edge
    #[serde(default = "default_true")]
    pub left_wall: bool,
    /// Wall on the +X edge
    #[serde(default = "default_true")]
    pub right_wall: bool,
    /// Wall on the -Z edge
    #[serde(default = "default_true")]
    pub back_wall: bool,
    /// Wall on the +Z edge
    #[serde(default = "default_true")]
    pub front_wall: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            height: 0.0,
            left_wall: true,
            right_wall: true,
            back_wall: true,
            front_wall: true,
        }
    }
}

impl Cell {
    /// Create an empty cell (all walls enabled, no floor)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a floor cell at the given elevation
    pub fn floor(height: f32) -> Self {
        Self { height, ..Self::default() }
    }

    /// Is this cell walkable floor?
    pub fn is_floor(&self) -> bool {
        self.height > 0.0
    }

    /// Wall flag for one of the four sides, by neighbor offset
    pub fn wall_toward(&self, dx: i32, dy: i32) -> bool {
        match (dx, dy) {
            (-1, 0) => self.left_wall,
            (1, 0) => self.right_wall,
            (0, -1) => self.back_wall,
            (0, 1) => self.front_wall,
            _ => true,
        }
    }
}

/// Error type for grid interchange operations
#[derive(Debug)]
pub enum GridError {
    /// Supplied height array does not match the grid's cell count
    DimensionMismatch { expected: usize, got: usize },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::DimensionMismatch { expected, got } => {
                write!(f, "height array has {} entries, grid holds {}", got, expected)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Dense 2D grid of cells
///
/// Out-of-range reads return the safe default (empty cell, all walls); writes
/// outside the grid are ignored. Resizing never truncates authored data: if a
/// shrink would drop a cell with `height > 0`, the target bound is grown to
/// keep it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridModel {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl GridModel {
    /// Create a new empty grid, clamping dimensions into the supported range
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(limits::MIN_GRID_SIZE, limits::MAX_GRID_SIZE);
        let height = height.clamp(limits::MIN_GRID_SIZE, limits::MAX_GRID_SIZE);
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        }
    }

    /// Build a grid directly from a row-major height array
    pub fn from_heights(width: i32, height: i32, heights: &[f32]) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height);
        grid.apply_heights(heights)?;
        Ok(grid)
    }

    /// Grid width in cells
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells
    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Read a cell; out-of-range coordinates yield the empty default
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or_default()
    }

    /// Mutable cell access; None outside the grid
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Overwrite a cell; writes outside the grid are ignored
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Floor elevation at a cell (0 outside the grid)
    pub fn height_at(&self, x: i32, y: i32) -> f32 {
        self.cell(x, y).height
    }

    /// Set the floor elevation, preserving the cell's wall flags
    pub fn set_height(&mut self, x: i32, y: i32, height: f32) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.height = height;
        }
    }

    /// Is the cell at (x, y) walkable floor?
    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).is_floor()
    }

    /// Reset every cell to the empty default
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }

    /// Highest floor elevation anywhere in the grid (0 if all empty)
    pub fn max_height(&self) -> f32 {
        self.cells.iter().fold(0.0f32, |acc, c| acc.max(c.height))
    }

    /// Number of walkable floor cells
    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_floor()).count()
    }

    /// Iterate all cells with their coordinates
    pub fn iter_cells(&self) -> impl Iterator<Item = (i32, i32, &Cell)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let i = i as i32;
            (i % width, i / width, cell)
        })
    }

    /// Resize the grid, keeping every authored cell
    ///
    /// The request is clamped to the supported range first, then grown so no
    /// in-bounds cell with `height > 0` is discarded. Surviving cells keep
    /// their heights and wall flags; new cells are empty defaults. Returns the
    /// realized dimensions.
    pub fn resize(&mut self, width: i32, height: i32) -> (i32, i32) {
        let mut new_width = width.clamp(limits::MIN_GRID_SIZE, limits::MAX_GRID_SIZE);
        let mut new_height = height.clamp(limits::MIN_GRID_SIZE, limits::MAX_GRID_SIZE);

        // Grow the target bounds to cover all non-empty cells
        for (x, y, cell) in self.iter_cells() {
            if cell.is_floor() {
                new_width = new_width.max(x + 1);
                new_height = new_height.max(y + 1);
            }
        }

        let mut cells = vec![Cell::default(); (new_width * new_height) as usize];
        for y in 0..self.height.min(new_height) {
            for x in 0..self.width.min(new_width) {
                cells[(y * new_width + x) as usize] = self.cells[(y * self.width + x) as usize];
            }
        }

        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
        (new_width, new_height)
    }

    /// Snapshot the height grid as a row-major dense array
    pub fn heights(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.height).collect()
    }

    /// Load a row-major height array into the grid, keeping wall flags
    pub fn apply_heights(&mut self, heights: &[f32]) -> Result<(), GridError> {
        if heights.len() != self.cells.len() {
            return Err(GridError::DimensionMismatch {
                expected: self.cells.len(),
                got: heights.len(),
            });
        }
        for (cell, &h) in self.cells.iter_mut().zip(heights) {
            cell.height = h;
        }
        Ok(())
    }
}
