//! Directions a line can take between adjacent intersections.

use strum::VariantArray;

use crate::location::{CellPos, Vertex};

/// A unit move along the grid.
///
/// Declaration order is the order in which the enumerator tries moves:
/// right, up, left, down.
/// It decides the order in which paths are discovered, never which paths exist.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Step {
    /// `+x`
    Right,
    /// `-y`, since rows are numbered from the top.
    Up,
    /// `-x`
    Left,
    /// `+y`
    Down,
}

impl Step {
    /// Forward directions move to a vertex later in row-major order.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    fn delta(&self) -> (isize, isize) {
        match self {
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
        }
    }

    /// Attempt the step from `vertex`; the result may be out of bounds.
    pub fn attempt_from(&self, vertex: Vertex) -> Vertex {
        vertex.offset_by(self.delta())
    }

    /// Same as [`Self::attempt_from`], over the cell namespace.
    pub fn attempt_from_cell(&self, cell: CellPos) -> CellPos {
        cell.offset_by(self.delta())
    }

    /// The opposite direction.
    pub fn invert(&self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
        }
    }

    /// The direction from `a` to `b`, or [`None`] if they are not grid-adjacent.
    pub fn direction_to(a: Vertex, b: Vertex) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    /// This direction or its inverse, whichever is in [`Self::FORWARD_VARIANTS`].
    pub fn ensure_forward(&self) -> Self {
        match Self::FORWARD_VARIANTS.contains(self) {
            true => *self,
            false => self.invert(),
        }
    }

    /// Left or right.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Every theoretical neighbor of `vertex`, in enumeration order.
    pub fn neighbors_of(vertex: Vertex) -> impl Iterator<Item = (Self, Vertex)> {
        Self::VARIANTS.iter().map(move |dir| (*dir, dir.attempt_from(vertex)))
    }
}
