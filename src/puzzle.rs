use std::collections::HashSet;

use itertools::Itertools;
use strum::{Display, EnumString, VariantArray};

use crate::cell::{CellOverlay, Symbol};
use crate::edge::{Edge, EdgeBits};
use crate::enumerate::Enumeration;
use crate::graph::GridGraph;
use crate::snapshot::PathSnapshot;
use crate::validate::{is_solved_region_color, is_solved_touch_count, uses_broken_edge, RegionGrowth};

/// Edges a specific panel has permanently removed.
pub type BrokenEdgeSet = HashSet<Edge>;

/// Which rule a puzzle's cell symbols follow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PuzzleVariant {
    /// Digit cells demand that many of their edges be on the line.
    TouchCount,
    /// Regions cut out by the line must each hold at most one color from `palette`.
    RegionColor {
        /// Colors a region panel may carry.
        palette: Vec<char>,
        /// Whether broken edges wall regions off.
        growth: RegionGrowth,
    },
}

impl PuzzleVariant {
    /// Whether `symbol` may appear in an overlay for this variant.
    pub fn accepts(&self, symbol: Symbol) -> bool {
        match (self, symbol) {
            (_, Symbol::Blank) => true,
            (Self::TouchCount, Symbol::Digit(_)) => true,
            (Self::RegionColor { palette, .. }, Symbol::Color(c)) => palette.contains(&c),
            _ => false,
        }
    }
}

/// The panels the solver knows how to read.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display, EnumString, VariantArray)]
pub enum Preset {
    /// The starter two-color region panels: white and black squares.
    #[strum(serialize = "starter2-region")]
    Starter2Region,
    /// Region panels with up to three of white, black, blue and orange.
    #[strum(serialize = "triplet-region")]
    TripletRegion,
    /// Triangle panels; a cell with N triangles needs N edges on the line.
    #[strum(serialize = "triangle")]
    Triangle,
}

impl Preset {
    /// The rule set this preset stands for.
    pub fn variant(&self) -> PuzzleVariant {
        match self {
            Self::Starter2Region => PuzzleVariant::RegionColor {
                palette: vec!['w', 'k'],
                growth: RegionGrowth::default(),
            },
            Self::TripletRegion => PuzzleVariant::RegionColor {
                palette: vec!['w', 'k', 'b', 'o'],
                growth: RegionGrowth::default(),
            },
            Self::Triangle => PuzzleVariant::TouchCount,
        }
    }

    /// One line for listings.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Starter2Region => "region colors: w white, k black",
            Self::TripletRegion => "region colors: w white, k black, b blue, o orange",
            Self::Triangle => "touch counts: one digit per cell",
        }
    }
}

impl From<Preset> for PuzzleVariant {
    fn from(value: Preset) -> Self {
        value.variant()
    }
}

/// A paths list was computed for a different grid than the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("puzzle is {puzzle:?} but the paths were enumerated for {paths:?}")]
pub struct DimensionMismatch {
    /// `(width, height)` of the puzzle.
    pub puzzle: (usize, usize),
    /// `(width, height)` of the enumerated grid.
    pub paths: (usize, usize),
}

/// One panel: a grid size, its cell symbols and its broken edges.
///
/// Build these with a [`PuzzleBuilder`](crate::PuzzleBuilder), which rejects malformed input.
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub(crate) graph: GridGraph,
    pub(crate) variant: PuzzleVariant,
    pub(crate) cells: CellOverlay,
    pub(crate) broken: BrokenEdgeSet,
    pub(crate) broken_bits: EdgeBits,
}

impl Puzzle {
    /// The puzzle's grid.
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// The rule the cell symbols follow.
    pub fn variant(&self) -> &PuzzleVariant {
        &self.variant
    }

    /// The cell symbols, blank if none were given.
    pub fn cells(&self) -> &CellOverlay {
        &self.cells
    }

    /// Edges no solution may use.
    pub fn broken(&self) -> &BrokenEdgeSet {
        &self.broken
    }

    /// [`Self::broken`] indexed by this puzzle's graph.
    pub fn broken_bits(&self) -> &EdgeBits {
        &self.broken_bits
    }

    /// Whether `snapshot` is a finished line that satisfies every constraint of this puzzle.
    pub fn is_solution(&self, snapshot: &PathSnapshot) -> bool {
        if !snapshot.is_complete(&self.graph) {
            return false;
        }

        match &self.variant {
            PuzzleVariant::TouchCount => {
                !uses_broken_edge(snapshot, &self.broken_bits) && is_solved_touch_count(&self.graph, snapshot, &self.cells)
            }
            PuzzleVariant::RegionColor { growth, .. } => {
                is_solved_region_color(&self.graph, snapshot, &self.cells, &self.broken_bits, *growth)
            }
        }
    }

    /// Filter an enumeration's complete lines down to this puzzle's solutions.
    pub fn solutions<'a>(&self, enumeration: &'a Enumeration) -> Result<Vec<&'a PathSnapshot>, DimensionMismatch> {
        if enumeration.graph().dims() != self.graph.dims() {
            return Err(DimensionMismatch {
                puzzle: (self.graph.width(), self.graph.height()),
                paths: (enumeration.graph().width(), enumeration.graph().height()),
            });
        }

        let solutions = enumeration.complete().iter().filter(|snapshot| self.is_solution(snapshot)).collect_vec();
        log::info!("{} of {} complete paths solve the puzzle", solutions.len(), enumeration.complete().len());
        Ok(solutions)
    }
}
