use serde::{Deserialize, Serialize};

/// A cell address as `(row, col)`.
pub type Position = (usize, usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// The transform that turns a move in this direction into a move to the left.
    pub fn transform(self) -> Option<Transform> {
        match self {
            Direction::Left => None,
            Direction::Right => Some(Transform::HorizontalFlip),
            Direction::Up => Some(Transform::LeftRotation),
            Direction::Down => Some(Transform::RightRotation),
        }
    }
}

/// Square grid rearrangements used to reduce every move to a left slide.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Transform {
    HorizontalFlip,
    LeftRotation,
    RightRotation,
}

impl Transform {
    pub const ALL: [Transform; 3] = [
        Transform::HorizontalFlip,
        Transform::LeftRotation,
        Transform::RightRotation,
    ];

    pub fn inverse(self) -> Self {
        match self {
            Transform::HorizontalFlip => Transform::HorizontalFlip,
            Transform::LeftRotation => Transform::RightRotation,
            Transform::RightRotation => Transform::LeftRotation,
        }
    }

    /// Where the value that lands on `(row, col)` is read from.
    fn source(self, row: usize, col: usize, side: usize) -> Position {
        let last = side - 1;

        match self {
            Transform::HorizontalFlip => (row, last - col),
            Transform::LeftRotation => (col, last - row),
            Transform::RightRotation => (last - col, row),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    data: Vec<T>,
    side: usize,
}

pub struct GridIter<'a, T> {
    grid: &'a Grid<T>,
    pos: usize,
}

impl<T> Grid<T> {
    pub fn new<F: FnMut(usize, usize) -> T>(side: usize, initializer: &mut F) -> Self {
        let mut data = Vec::with_capacity(side * side);

        for row in 0..side {
            for col in 0..side {
                data.push(initializer(row, col));
            }
        }

        Self { data, side }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn size(&self) -> usize {
        self.side * self.side
    }

    pub fn iter(&self) -> GridIter<T> {
        GridIter { grid: self, pos: 0 }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.side || col >= self.side {
            None
        } else {
            Some(col + row * self.side)
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get(self.index(row, col)?)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        let index = self.index(row, col)?;

        self.data.get_mut(index)
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), &'static str> {
        let index = self.index(row, col).ok_or("Cell out of range")?;

        self.data[index] = value;

        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        let start = self.index(row, 0)?;

        Some(&self.data[start..start + self.side])
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut [T]> {
        let start = self.index(row, 0)?;

        Some(&mut self.data[start..start + self.side])
    }

    pub fn get_neighbor(&self, row: usize, col: usize, direction: Direction) -> Option<&T> {
        let (row, col) = match direction {
            Direction::Up => {
                if row == 0 {
                    None
                } else {
                    Some((row - 1, col))
                }
            }
            Direction::Down => {
                if row + 1 >= self.side {
                    None
                } else {
                    Some((row + 1, col))
                }
            }
            Direction::Left => {
                if col == 0 {
                    None
                } else {
                    Some((row, col - 1))
                }
            }
            Direction::Right => {
                if col + 1 >= self.side {
                    None
                } else {
                    Some((row, col + 1))
                }
            }
        }?;

        self.get(row, col)
    }
}

impl<T: Clone> Grid<T> {
    pub fn transform(&mut self, transform: Transform) {
        let source = self.data.clone();
        let side = self.side;

        for row in 0..side {
            for col in 0..side {
                let (from_row, from_col) = transform.source(row, col, side);

                self.data[col + row * side] = source[from_col + from_row * side].clone();
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = (usize, usize, &'a T);
    type IntoIter = GridIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> Iterator for GridIter<'a, T> {
    type Item = (usize, usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.grid.data.len() {
            None
        } else {
            let row = self.pos / self.grid.side;
            let col = self.pos % self.grid.side;
            let value = &self.grid.data[self.pos];

            self.pos += 1;

            Some((row, col, value))
        }
    }
}
