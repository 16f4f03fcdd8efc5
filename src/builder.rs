//! Assembling and validating a [`Puzzle`](crate::Puzzle) from its parts.

use std::num::NonZero;

use itertools::Itertools;
use unordered_pair::UnorderedPair;

use crate::cell::{CellOverlay, OverlayParseError, Symbol};
use crate::edge::Edge;
use crate::graph::GridGraph;
use crate::location::{CellPos, Dimension, Vertex};
use crate::puzzle::{BrokenEdgeSet, Puzzle, PuzzleVariant};
use crate::shape::Step;

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuilderInvalidReason {
    /// The overlay must have one symbol per cell, i.e. one fewer column and row than the grid has vertices.
    #[error("overlay is {found:?} cells but the grid needs {expected:?}")]
    OverlayDimensionMismatch {
        /// `(width, height)` in cells, from the grid.
        expected: (usize, usize),
        /// `(width, height)` in cells, from the overlay.
        found: (usize, usize),
    },
    /// The overlay text itself could not be read.
    #[error(transparent)]
    Overlay(#[from] OverlayParseError),
    /// A symbol that means nothing for the puzzle's variant, e.g. a digit on a region panel.
    #[error("symbol {symbol:?} at {cell} does not belong to a {variant} puzzle")]
    UnexpectedSymbol {
        /// The offending symbol.
        symbol: Symbol,
        /// Where it sits.
        cell: CellPos,
        /// Name of the puzzle variant that rejected it.
        variant: &'static str,
    },
    /// A broken edge that is not an edge of the grid.
    #[error("broken edge {0} is not part of the grid")]
    EdgeOutOfTopology(Edge),
}

/// Everything wrong with a puzzle that failed to build.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed puzzle: {}", .reasons.iter().join("; "))]
pub struct MalformedPuzzle {
    /// Every problem found, in the order it was found.
    pub reasons: Vec<BuilderInvalidReason>,
}

/// Assembles a [`Puzzle`] from what was read off a panel.
///
/// Problems are collected rather than reported one at a time; [`Self::build`] lists all of them.
/// Builders can be [`Clone`]d to save their state at some point.
#[derive(Clone)]
pub struct PuzzleBuilder {
    graph: GridGraph,
    variant: PuzzleVariant,
    cells: Option<CellOverlay>,
    broken: BrokenEdgeSet,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for PuzzleBuilder {
    fn default() -> Self {
        // the panels this was written for are all 5x5
        Self::with_dims((NonZero::<usize>::MIN.saturating_add(4), NonZero::<usize>::MIN.saturating_add(4)))
    }
}

impl PuzzleBuilder {
    /// Construct a builder for a grid of the given vertex dimensions, `(width, height)`.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            graph: GridGraph::new(dims),
            variant: PuzzleVariant::TouchCount,
            cells: None,
            broken: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    /// Choose the rule the cell symbols follow. Touch count unless set.
    pub fn variant(&mut self, variant: impl Into<PuzzleVariant>) -> &mut Self {
        self.variant = variant.into();
        self
    }

    /// Set the overlay from one string per row, top row first. See [`Symbol::from_char`].
    pub fn cells<I, S>(&mut self, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match CellOverlay::from_rows(rows) {
            Ok(overlay) => self.cells = Some(overlay),
            Err(err) => self.invalid_reasons.push(err.into()),
        }
        self
    }

    /// Set an already parsed overlay.
    pub fn overlay(&mut self, overlay: CellOverlay) -> &mut Self {
        self.cells = Some(overlay);
        self
    }

    /// Mark the edge between `vertices` as broken: no solution may use it.
    ///
    /// May cause the builder to enter an [`EdgeOutOfTopology`](BuilderInvalidReason::EdgeOutOfTopology) invalid state.
    pub fn break_edge(&mut self, vertices: UnorderedPair<Vertex>) -> &mut Self {
        let edge = Edge::from(vertices);
        if self.graph.edge_id(edge).is_none() {
            self.invalid_reasons.push(BuilderInvalidReason::EdgeOutOfTopology(edge));
            return self;
        }

        self.broken.insert(edge);
        self
    }

    /// Shorthand for multiple calls to [`Self::break_edge`], with the same conditions.
    pub fn break_edges(&mut self, edges: impl IntoIterator<Item = UnorderedPair<Vertex>>) -> &mut Self {
        for vertices in edges {
            self.break_edge(vertices);
        }
        self
    }

    /// Break the edges leaving `vertex` in each of `directions`.
    pub fn break_around(&mut self, vertex: Vertex, directions: Vec<Step>) -> &mut Self {
        for direction in directions {
            self.break_edge(UnorderedPair(vertex, direction.attempt_from(vertex)));
        }
        self
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(reasons)` otherwise.
    pub fn is_valid(&self) -> Option<Vec<BuilderInvalidReason>> {
        let reasons = self.collect_reasons();
        if reasons.is_empty() {
            None
        } else {
            Some(reasons)
        }
    }

    fn collect_reasons(&self) -> Vec<BuilderInvalidReason> {
        let mut reasons = self.invalid_reasons.clone();

        if let Some(cells) = &self.cells {
            let expected = self.graph.cell_dims();
            let found = (cells.width(), cells.height());
            if expected != found {
                reasons.push(BuilderInvalidReason::OverlayDimensionMismatch { expected, found });
            }

            let variant = match self.variant {
                PuzzleVariant::TouchCount => "touch count",
                PuzzleVariant::RegionColor { .. } => "region color",
            };
            reasons.extend(
                cells
                    .constraints()
                    .filter(|(_, symbol)| !self.variant.accepts(*symbol))
                    .map(|(cell, symbol)| BuilderInvalidReason::UnexpectedSymbol { symbol, cell, variant }),
            );
        }

        reasons
    }

    /// Convert the state of this builder into a [`Puzzle`], or list why that is impossible.
    pub fn build(&self) -> Result<Puzzle, MalformedPuzzle> {
        let reasons = self.collect_reasons();
        if !reasons.is_empty() {
            return Err(MalformedPuzzle { reasons });
        }

        let (width, height) = self.graph.cell_dims();
        let cells = self.cells.clone().unwrap_or_else(|| CellOverlay::blank(width, height));

        let mut broken_bits = self.graph.empty_edge_bits();
        // every broken edge was checked against the topology on the way in
        self.broken.iter().filter_map(|edge| self.graph.edge_id(*edge)).for_each(|id| broken_bits.insert(id));

        Ok(Puzzle {
            graph: self.graph.clone(),
            variant: self.variant.clone(),
            cells,
            broken: self.broken.clone(),
            broken_bits,
        })
    }
}
