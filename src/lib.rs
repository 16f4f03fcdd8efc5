#![warn(missing_docs)]

//! # `witnessline`
//!
//! A solver for single-line grid puzzles of the kind found in the video game The Witness.
//! A line is drawn along the grid lines from the bottom-left intersection to the top-right one, never touching an
//! intersection twice, and must satisfy the constraints written in the cells it passes between.
//!
//! Begin by building a [`Puzzle`] with a [`PuzzleBuilder`]: a grid size, a [`PuzzleVariant`] (or a [`Preset`]), the
//! cell symbols and any broken edges. Then obtain the [`Enumeration`] of every line for that grid size, preferably
//! through a [`PathCache`], and call [`Puzzle::solutions`].
//!
//! Two families of constraint are understood:
//! 1. Touch counts: a cell marked `N` needs exactly `N` of its four sides on the line.
//! 2. Region colors: the line, together with any broken edges, cuts the cells into regions; no region may hold two
//!    different colors.
//!
//! # Internals
//! Solving is generate-and-test. The set of lines depends only on the grid's dimensions, so it is enumerated once by a
//! depth-first search over a [`GridGraph`] and persisted, then every puzzle of that size filters the same list.
//! Edge state is carried as a bit vector over a fixed edge ordering, which keeps snapshots small enough to enumerate
//! and cache the 153744 snapshots of a 5x5 grid.
//!
//! ```
//! use witnessline::{Enumeration, GridGraph, Preset, PuzzleBuilder};
//!
//! let puzzle = PuzzleBuilder::with_dims(GridGraph::try_new(4, 4).unwrap().dims())
//!     .variant(Preset::Starter2Region)
//!     .cells(["k w", "wwk", "k  "])
//!     .build()
//!     .unwrap();
//!
//! let paths = Enumeration::from_graph(puzzle.graph().clone());
//! assert_eq!(puzzle.solutions(&paths).unwrap().len(), 1);
//! ```

pub use builder::{BuilderInvalidReason, MalformedPuzzle, PuzzleBuilder};
pub use cache::{CacheError, CacheKey, PathCache};
pub use cell::{CellOverlay, OverlayParseError, Symbol};
pub use diagram::{Diagram, DiagramStyle};
pub use edge::{Edge, EdgeBits, EdgeId};
pub use enumerate::{Enumeration, PathEnumerator};
pub use graph::{GraphError, GridGraph};
pub use location::{CellPos, Coord, Dimension, Vertex};
pub use puzzle::{BrokenEdgeSet, DimensionMismatch, Preset, Puzzle, PuzzleVariant};
pub use region::{segment, segment_with_walls, Region};
pub use snapshot::PathSnapshot;
pub use validate::{is_solved_region_color, is_solved_touch_count, uses_broken_edge, RegionGrowth};

pub mod builder;
pub(crate) mod cache;
pub(crate) mod cell;
pub(crate) mod diagram;
pub(crate) mod edge;
pub(crate) mod enumerate;
pub(crate) mod graph;
pub(crate) mod location;
pub(crate) mod puzzle;
pub(crate) mod region;
pub mod shape;
pub(crate) mod snapshot;
pub(crate) mod validate;
mod tests;
