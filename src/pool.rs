use crate::tile::Tile;
use log::trace;
use rand::Rng;

/// Most tiles that can ever be alive at once, one per cell.
pub const POOL_CAPACITY: usize = 16;

/// Handle to a tile slot inside a [`TilePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u8);

impl TileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena of tiles with a free list of retired slots ("phantoms").
///
/// Retired tiles keep their last state until they are handed out again, so a
/// tile that has just been merged away can still be animated toward its partner.
#[derive(Debug, Clone, Default)]
pub struct TilePool {
    slots: Vec<Tile>,
    phantoms: Vec<TileId>,
}

impl TilePool {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(POOL_CAPACITY),
            phantoms: Vec::with_capacity(POOL_CAPACITY),
        }
    }

    /// Number of slots ever allocated.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub fn phantom_count(&self) -> usize {
        self.phantoms.len()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots.get_mut(id.index())
    }

    /// Mutable access to two distinct tiles at once.
    pub fn pair_mut(&mut self, a: TileId, b: TileId) -> Option<(&mut Tile, &mut Tile)> {
        let (i, j) = (a.index(), b.index());

        if i == j || i.max(j) >= self.slots.len() {
            return None;
        }

        if i < j {
            let (left, right) = self.slots.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        } else {
            let (left, right) = self.slots.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
    }

    /// Hands out the most recently retired tile re-initialized at `(row, col)`,
    /// or allocates a new one when no phantom is left.
    pub fn acquire<R: Rng + ?Sized>(&mut self, row: usize, col: usize, rng: &mut R) -> TileId {
        match self.phantoms.pop() {
            Some(id) => {
                trace!("reusing tile {:?}", id);
                self.slots[id.index()].init(row, col, rng);
                id
            }
            None => self.insert(Tile::new(row, col, rng)),
        }
    }

    /// Stores an already built tile, preferring a phantom slot.
    pub fn insert(&mut self, tile: Tile) -> TileId {
        match self.phantoms.pop() {
            Some(id) => {
                self.slots[id.index()] = tile;
                id
            }
            None => {
                debug_assert!(self.slots.len() < POOL_CAPACITY, "tile pool overflow");

                let id = TileId(self.slots.len() as u8);
                self.slots.push(tile);
                id
            }
        }
    }

    /// Retires a tile to the phantom list.
    pub fn release(&mut self, id: TileId) {
        debug_assert!(!self.phantoms.contains(&id), "tile released twice");
        debug_assert!(self.phantoms.len() < POOL_CAPACITY);

        self.phantoms.push(id);
    }
}
