use crate::pool::TileId;
use crate::render::{Renderer, TileSprite};
use rand::Rng;

pub const TILE_SIZE: i32 = 27;
pub const TILE_GAP: i32 = 4;

const ARISE_START: u8 = 50;
const REST_SCALE: u8 = 100;
const LANDING_SCALE: u8 = 150;
const SCALE_EPSILON: u8 = 4;
/// Squared pixel distance under which a sliding tile snaps onto its cell.
const SLIDE_EPSILON: i32 = 4;

/// Pixel offset of the cell at `index` along either axis.
pub fn cell_origin(index: usize) -> i32 {
    let index = index as i32;

    index * TILE_SIZE + (index + 1) * TILE_GAP
}

/// Pixel top-left corner of the cell at `(row, col)` as `(x, y)`.
pub fn cell_position(row: usize, col: usize) -> (i32, i32) {
    (cell_origin(col), cell_origin(row))
}

/// One step of the halving ease from `scale` toward `rest`, `None` once close enough to snap.
pub fn ease_scale(scale: u8, rest: u8) -> Option<u8> {
    let ds = scale.abs_diff(rest);

    if ds < SCALE_EPSILON {
        None
    } else if scale < rest {
        Some(scale + (ds >> 1))
    } else {
        Some(scale - (ds >> 1))
    }
}

/// One step of a halving ease toward `target`, `None` once close enough to snap.
fn ease(x: i32, y: i32, target: (i32, i32)) -> Option<(i32, i32)> {
    let dx = target.0 - x;
    let dy = target.1 - y;

    if dx * dx + dy * dy < SLIDE_EPSILON {
        None
    } else {
        Some((x + (dx >> 1), y + (dy >> 1)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    exponent: u8,
    x: i32,
    y: i32,
    scale: u8,
    arising: bool,
    sliding: bool,
    collapsing: bool,
    partner: Option<TileId>,
}

impl Tile {
    pub fn new<R: Rng + ?Sized>(row: usize, col: usize, rng: &mut R) -> Self {
        let mut tile = Self::settled(row, col, 1);

        tile.init(row, col, rng);
        tile
    }

    /// A tile resting on its cell with no animation pending.
    pub fn settled(row: usize, col: usize, exponent: u8) -> Self {
        let (x, y) = cell_position(row, col);

        Self {
            exponent,
            x,
            y,
            scale: REST_SCALE,
            arising: false,
            sliding: false,
            collapsing: false,
            partner: None,
        }
    }

    /// Recycles this tile as a fresh spawn at `(row, col)`.
    pub fn init<R: Rng + ?Sized>(&mut self, row: usize, col: usize, rng: &mut R) {
        let (x, y) = cell_position(row, col);

        self.exponent = if rng.gen_range(0..10) == 0 { 2 } else { 1 };
        self.x = x;
        self.y = y;
        self.partner = None;
        self.scale = ARISE_START;
        self.arising = true;
        self.sliding = false;
        self.collapsing = false;
    }

    pub fn exponent(&self) -> u8 {
        self.exponent
    }

    pub fn value(&self) -> u32 {
        1 << self.exponent
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_arising(&self) -> bool {
        self.arising
    }

    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    pub fn is_collapsing(&self) -> bool {
        self.collapsing
    }

    pub fn partner(&self) -> Option<TileId> {
        self.partner
    }

    pub fn is_animating(&self) -> bool {
        self.arising || self.sliding || self.collapsing
    }

    pub(crate) fn mark_sliding(&mut self) {
        self.sliding = true;
    }

    /// Absorbs `partner`, which has just left the grid.
    pub(crate) fn merge(&mut self, partner: TileId) -> u8 {
        self.exponent += 1;
        self.partner = Some(partner);
        self.collapsing = true;
        self.sliding = true;
        self.exponent
    }

    pub fn arise(&mut self) {
        match ease_scale(self.scale, REST_SCALE) {
            Some(scale) => self.scale = scale,
            None => {
                self.arising = false;
                self.scale = REST_SCALE;
            }
        }
    }

    /// Moves toward the cell at `(row, col)`, dragging the merged `partner` along.
    pub fn slide(&mut self, row: usize, col: usize, partner: Option<&mut Tile>) {
        let target = cell_position(row, col);
        let mut partner_landed = true;

        if self.collapsing {
            if let Some(partner) = partner {
                match ease(partner.x, partner.y, target) {
                    Some((x, y)) => {
                        partner.x = x;
                        partner.y = y;
                        partner_landed = false;
                    }
                    None => {
                        partner.x = target.0;
                        partner.y = target.1;
                    }
                }
            }
        }

        match ease(self.x, self.y, target) {
            Some((x, y)) => {
                self.x = x;
                self.y = y;
            }
            None => {
                self.x = target.0;
                self.y = target.1;
                self.scale = LANDING_SCALE;

                if !self.collapsing || partner_landed {
                    self.sliding = false;
                }
            }
        }
    }

    pub fn collapse(&mut self) {
        match ease_scale(self.scale, REST_SCALE) {
            Some(scale) => self.scale = scale,
            None => {
                self.collapsing = false;
                self.partner = None;
                self.scale = REST_SCALE;
            }
        }
    }

    fn sprite(&self, x: i32, y: i32, exponent: u8, scale: u8) -> TileSprite {
        TileSprite {
            x,
            y,
            color: exponent,
            label: Some(1 << exponent),
            scale,
        }
    }

    pub fn draw<R: Renderer + ?Sized>(
        &self,
        partner: Option<&Tile>,
        renderer: &mut R,
    ) -> Result<(), R::Error> {
        if self.arising {
            return renderer.draw_tile(&self.sprite(self.x, self.y, self.exponent, self.scale));
        }

        // until both halves land, show the values from before the merge
        let exponent = if self.sliding && self.collapsing {
            self.exponent - 1
        } else {
            self.exponent
        };

        if self.collapsing {
            if !self.sliding {
                return renderer.draw_tile(&self.sprite(self.x, self.y, exponent, self.scale));
            }

            if let Some(partner) = partner {
                renderer.draw_tile(&self.sprite(partner.x, partner.y, exponent, REST_SCALE))?;
            }
        }

        renderer.draw_tile(&self.sprite(self.x, self.y, exponent, REST_SCALE))
    }
}
