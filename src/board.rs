use crate::grid::{Direction, Grid, Position};
use crate::pool::{TileId, TilePool};
use crate::render::{Renderer, TileSprite, BOARD_BACKGROUND};
use crate::tile::{cell_position, Tile};
use log::{debug, trace};
use rand::Rng;

pub const BOARD_SIDE: usize = 4;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

/// Exponent of the 2048 tile.
pub const MILESTONE: u8 = 11;

/// What a single move did to the board.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub slid: bool,
    pub collapsed: bool,
    /// Sum of the values of every tile made by a merge.
    pub points: u32,
    /// Highest exponent produced by a merge, 0 if nothing merged.
    pub highest: u8,
    pub milestone: bool,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        self.slid || self.collapsed
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid<Option<TileId>>,
    tiles: TilePool,
    free_cells: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: Grid::new(BOARD_SIDE, &mut |_, _| None),
            tiles: TilePool::new(),
            free_cells: CELL_COUNT,
        }
    }

    /// Builds a settled board from exponents, 0 meaning an empty cell.
    pub fn from_exponents(rows: [[u8; BOARD_SIDE]; BOARD_SIDE]) -> Self {
        let mut board = Self::new();

        for (row, exponents) in rows.iter().enumerate() {
            for (col, &exponent) in exponents.iter().enumerate() {
                if exponent > 0 {
                    let id = board.tiles.insert(Tile::settled(row, col, exponent));

                    board.grid.set(row, col, Some(id)).ok();
                    board.free_cells -= 1;
                }
            }
        }

        board
    }

    /// Exponents of the tiles on the grid, 0 for empty cells.
    pub fn exponents(&self) -> [[u8; BOARD_SIDE]; BOARD_SIDE] {
        let mut output = [[0; BOARD_SIDE]; BOARD_SIDE];

        for (row, col, cell) in &self.grid {
            if let Some(tile) = cell.and_then(|id| self.tiles.get(id)) {
                output[row][col] = tile.exponent();
            }
        }

        output
    }

    pub fn free_cells(&self) -> usize {
        self.free_cells
    }

    pub fn occupied_cells(&self) -> usize {
        self.grid.iter().filter(|(_, _, cell)| cell.is_some()).count()
    }

    pub fn pool(&self) -> &TilePool {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        let id = (*self.grid.get(row, col)?)?;

        self.tiles.get(id)
    }

    /// Retires every tile on the grid to the pool and empties it.
    pub fn reset(&mut self) {
        for row in 0..BOARD_SIDE {
            for col in 0..BOARD_SIDE {
                if let Some(cell) = self.grid.get_mut(row, col) {
                    if let Some(id) = cell.take() {
                        self.tiles.release(id);
                    }
                }
            }
        }

        self.free_cells = CELL_COUNT;
    }

    /// Places a new tile on a random empty cell, `None` if the board is full.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TileId> {
        if self.free_cells == 0 {
            return None;
        }

        let (row, col) = loop {
            let row = rng.gen_range(0..BOARD_SIDE);
            let col = rng.gen_range(0..BOARD_SIDE);

            if let Some(None) = self.grid.get(row, col) {
                break (row, col);
            }
        };

        self.free_cells -= 1;

        let id = self.tiles.acquire(row, col, rng);

        self.grid.set(row, col, Some(id)).ok()?;

        debug!("spawned {:?} at ({}, {})", id, row, col);

        Some(id)
    }

    /// Advances the grow-in of a spawned tile, returning whether it is still arising.
    pub fn arise(&mut self, id: TileId) -> bool {
        match self.tiles.get_mut(id) {
            Some(tile) if tile.is_arising() => {
                tile.arise();
                tile.is_arising()
            }
            _ => false,
        }
    }

    pub fn is_arising(&self, id: TileId) -> bool {
        self.tiles.get(id).map_or(false, Tile::is_arising)
    }

    pub fn shift(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        let transform = direction.transform();

        if let Some(transform) = transform {
            self.grid.transform(transform);
        }

        for row in 0..BOARD_SIDE {
            self.slide_row(row, &mut outcome);
            self.collapse_row(row, &mut outcome);
            self.slide_row(row, &mut outcome);
        }

        if let Some(transform) = transform {
            self.grid.transform(transform.inverse());
        }

        debug!("{:?}: {:?}", direction, outcome);

        outcome
    }

    fn slide_row(&mut self, row: usize, outcome: &mut MoveOutcome) {
        let Some(cells) = self.grid.row_mut(row) else {
            return;
        };

        let mut target = 0;

        for col in 0..cells.len() {
            if let Some(id) = cells[col] {
                if col != target {
                    cells[target] = cells[col].take();

                    if let Some(tile) = self.tiles.get_mut(id) {
                        tile.mark_sliding();
                    }

                    outcome.slid = true;
                }

                target += 1;
            }
        }
    }

    fn collapse_row(&mut self, row: usize, outcome: &mut MoveOutcome) {
        let Some(cells) = self.grid.row_mut(row) else {
            return;
        };

        for col in 0..cells.len() - 1 {
            let (Some(left), Some(right)) = (cells[col], cells[col + 1]) else {
                continue;
            };

            let equal = match (self.tiles.get(left), self.tiles.get(right)) {
                (Some(a), Some(b)) => a.exponent() == b.exponent(),
                _ => false,
            };

            if !equal {
                continue;
            }

            cells[col + 1] = None;
            self.tiles.release(right);
            self.free_cells += 1;

            let Some((tile, partner)) = self.tiles.pair_mut(left, right) else {
                continue;
            };

            partner.mark_sliding();
            let exponent = tile.merge(right);

            outcome.collapsed = true;
            outcome.slid = true;
            outcome.points += 1 << exponent;
            outcome.highest = outcome.highest.max(exponent);

            if exponent == MILESTONE {
                outcome.milestone = true;
            }
        }
    }

    /// Whether two neighboring tiles still hold the same value.
    pub fn is_squeezable(&self) -> bool {
        for (row, col, cell) in &self.grid {
            let Some(tile) = cell.and_then(|id| self.tiles.get(id)) else {
                continue;
            };

            for direction in [Direction::Right, Direction::Down] {
                let neighbor = self
                    .grid
                    .get_neighbor(row, col, direction)
                    .and_then(|cell| cell.and_then(|id| self.tiles.get(id)));

                if neighbor.map_or(false, |other| other.exponent() == tile.exponent()) {
                    return true;
                }
            }
        }

        false
    }

    pub fn is_lost(&self) -> bool {
        self.free_cells == 0 && !self.is_squeezable()
    }

    /// Runs one frame of the slide and collapse animations, returning whether
    /// any tile is still moving.
    pub fn animate(&mut self) -> bool {
        let mut moving = false;
        let cells: Vec<(Position, TileId)> = self
            .grid
            .iter()
            .filter_map(|(row, col, cell)| cell.map(|id| ((row, col), id)))
            .collect();

        for ((row, col), id) in cells {
            let (sliding, collapsing, partner) = match self.tiles.get(id) {
                Some(tile) => (tile.is_sliding(), tile.is_collapsing(), tile.partner()),
                None => continue,
            };

            if sliding {
                match partner.and_then(|partner| self.tiles.pair_mut(id, partner)) {
                    Some((tile, partner)) => tile.slide(row, col, Some(partner)),
                    None => {
                        if let Some(tile) = self.tiles.get_mut(id) {
                            tile.slide(row, col, None);
                        }
                    }
                }

                moving = true;
            } else if collapsing {
                if let Some(tile) = self.tiles.get_mut(id) {
                    tile.collapse();
                }

                moving = true;
            }
        }

        trace!("animating: {}", moving);

        moving
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.clear(BOARD_BACKGROUND)?;

        for (row, col, _) in &self.grid {
            let (x, y) = cell_position(row, col);

            renderer.draw_tile(&TileSprite::slot(x, y))?;
        }

        for (_, _, cell) in &self.grid {
            let Some(tile) = cell.and_then(|id| self.tiles.get(id)) else {
                continue;
            };

            let partner = tile.partner().and_then(|id| self.tiles.get(id));

            tile.draw(partner, renderer)?;
        }

        Ok(())
    }
}
