use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;
use serde::{Deserialize, Serialize};

/// One coordinate along an axis.
pub type Coord = usize;
/// A grid dimension, counted in vertices along one axis.
pub type Dimension = NonZero<Coord>;

/// A grid-line intersection, `(x, y)` with `y` growing downward.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct Vertex(pub Coord, pub Coord);

/// A unit cell bounded by four vertices, `(x, y)` with the same orientation as [`Vertex`].
///
/// Cell `(x, y)` has vertex `(x, y)` as its top-left corner.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
pub struct CellPos(pub Coord, pub Coord);

impl Vertex {
    /// Offset this vertex. Steps off the low edge wrap to huge coordinates, which every bounds check rejects.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl CellPos {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Same as [`Vertex::offset_by`], over the cell namespace.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// The four corners of this cell: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Vertex; 4] {
        let (x, y) = (self.0, self.1);
        [Vertex(x, y), Vertex(x + 1, y), Vertex(x, y + 1), Vertex(x + 1, y + 1)]
    }
}

impl From<(Ix, Ix)> for CellPos {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl From<(Ix, Ix)> for Vertex {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for Vertex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

impl Display for CellPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cell ({}, {})", self.0, self.1)
    }
}
