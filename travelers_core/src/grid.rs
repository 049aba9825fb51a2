//! The toroidal grid and its direction vocabulary.
//!
//! Every position update goes through [`Grid::step`], which validates the
//! requested delta against the four cardinal moves before wrapping it
//! modulo the grid dimensions.

use crate::error::GridError;
use rand::Rng;
use serde::Serialize;

/// A raw coordinate delta, as submitted to the move primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl std::fmt::Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// The four legal single-cell moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Every direction, in vocabulary order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Returns the coordinate delta of this direction.
    ///
    /// `Up` decreases y, `Down` increases it.
    pub const fn delta(self) -> Delta {
        match self {
            Direction::Left => Delta::new(-1, 0),
            Direction::Right => Delta::new(1, 0),
            Direction::Up => Delta::new(0, -1),
            Direction::Down => Delta::new(0, 1),
        }
    }

    /// Picks a direction uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl TryFrom<Delta> for Direction {
    type Error = GridError;

    fn try_from(delta: Delta) -> Result<Self, Self::Error> {
        match (delta.dx, delta.dy) {
            (-1, 0) => Ok(Direction::Left),
            (1, 0) => Ok(Direction::Right),
            (0, -1) => Ok(Direction::Up),
            (0, 1) => Ok(Direction::Down),
            _ => Err(GridError::InvalidDirection(delta)),
        }
    }
}

/// A cell on the grid. Always normalized to the grid it was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A rectangular torus of `width` x `height` cells.
///
/// Moving past one edge reappears at the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Creates a grid, rejecting zero-sized dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the position lies inside the grid bounds.
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Draws a position uniformly over the grid.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    /// Applies one direction, wrapping around both axes.
    pub fn apply(&self, position: Position, direction: Direction) -> Position {
        let delta = direction.delta();
        Position::new(
            wrap(position.x, delta.dx, self.width),
            wrap(position.y, delta.dy, self.height),
        )
    }

    /// The checked move primitive.
    ///
    /// Any delta other than the four cardinal unit steps yields
    /// [`GridError::InvalidDirection`] and no new position.
    pub fn step(&self, position: Position, delta: Delta) -> Result<Position, GridError> {
        let direction = Direction::try_from(delta)?;
        Ok(self.apply(position, direction))
    }
}

fn wrap(coord: u32, delta: i32, size: u32) -> u32 {
    (i64::from(coord) + i64::from(delta)).rem_euclid(i64::from(size)) as u32
}
