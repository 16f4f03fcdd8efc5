use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::cell::CellOverlay;
use crate::edge::{Edge, EdgeBits};
use crate::graph::GridGraph;
use crate::location::{CellPos, Vertex};
use crate::puzzle::Puzzle;
use crate::shape::Step;
use crate::snapshot::PathSnapshot;

/// What a [`Diagram`] emphasizes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DiagramStyle {
    /// Only the line, its start (`O`) and its exit (`^`).
    #[default]
    Solution,
    /// Every intersection and edge, active edges as `X` and broken ones left out.
    Debug,
}

/// A text rendering of a line on its grid.
///
/// The canvas has a character for every vertex, every edge between two vertices and every cell, so a `W`x`H` grid is
/// drawn `2W-1` characters wide and `2H-1` tall.
pub struct Diagram<'a> {
    graph: &'a GridGraph,
    snapshot: &'a PathSnapshot,
    cells: Option<&'a CellOverlay>,
    broken: Option<&'a EdgeBits>,
    style: DiagramStyle,
}

impl<'a> Diagram<'a> {
    /// A bare diagram of `snapshot` on `graph` in [`DiagramStyle::Solution`].
    pub fn new(graph: &'a GridGraph, snapshot: &'a PathSnapshot) -> Self {
        Self {
            graph,
            snapshot,
            cells: None,
            broken: None,
            style: DiagramStyle::default(),
        }
    }

    /// A diagram showing `puzzle`'s cell symbols and broken edges under `snapshot`.
    pub fn of_puzzle(puzzle: &'a Puzzle, snapshot: &'a PathSnapshot) -> Self {
        Self::new(puzzle.graph(), snapshot).cells(puzzle.cells()).broken(puzzle.broken_bits())
    }

    /// Draw cell symbols too.
    pub fn cells(mut self, cells: &'a CellOverlay) -> Self {
        self.cells = Some(cells);
        self
    }

    /// Mark these edges as broken.
    pub fn broken(mut self, broken: &'a EdgeBits) -> Self {
        self.broken = Some(broken);
        self
    }

    /// Pick what to emphasize.
    pub fn style(mut self, style: DiagramStyle) -> Self {
        self.style = style;
        self
    }

    fn vertex_char(&self, vertex: Vertex) -> char {
        match self.style {
            DiagramStyle::Debug => '+',
            DiagramStyle::Solution if vertex == self.graph.start() => 'O',
            DiagramStyle::Solution if vertex == self.graph.end() => '^',
            DiagramStyle::Solution if self.snapshot.path().contains(&vertex) => '•',
            DiagramStyle::Solution => ' ',
        }
    }

    fn edge_char(&self, edge: Edge, active: bool, broken: bool) -> char {
        let (lo, hi) = edge.canonical();
        let horizontal = Step::direction_to(lo, hi).is_some_and(|step| step.is_horizontal());
        match (self.style, active, broken) {
            (DiagramStyle::Solution, true, _) if horizontal => '━',
            (DiagramStyle::Solution, true, _) => '┃',
            (DiagramStyle::Solution, false, _) => ' ',
            (DiagramStyle::Debug, true, _) => 'X',
            (DiagramStyle::Debug, false, true) => ' ',
            (DiagramStyle::Debug, false, false) if horizontal => '-',
            (DiagramStyle::Debug, false, false) => '|',
        }
    }

    /// Lay the diagram out on a character canvas, indexed `(row, column)`.
    pub fn canvas(&self) -> Array2<char> {
        let (width, height) = (self.graph.width(), self.graph.height());
        let mut canvas = Array2::from_elem((2 * height - 1, 2 * width - 1), ' ');

        for y in 0..height {
            for x in 0..width {
                let vertex = Vertex(x, y);
                canvas[(2 * y, 2 * x)] = self.vertex_char(vertex);
            }
        }

        for (id, edge) in self.graph.edges() {
            let active = self.snapshot.active().contains(id);
            let broken = self.broken.is_some_and(|broken| broken.contains(id));
            let (lo, hi) = edge.canonical();
            // horizontal edges sit between two vertices of a row, vertical ones between two rows
            let position = if lo.1 == hi.1 {
                (2 * lo.1, 2 * lo.0 + 1)
            } else {
                (2 * lo.1 + 1, 2 * lo.0)
            };
            canvas[position] = self.edge_char(edge, active, broken);
        }

        if let Some(cells) = self.cells {
            for CellPos(x, y) in self.graph.cells() {
                if let Some(symbol) = cells.get(CellPos(x, y)) {
                    canvas[(2 * y + 1, 2 * x + 1)] = symbol.as_char();
                }
            }
        }

        canvas
    }
}

/// Dump a canvas row by row.
fn print(canvas: &Array2<char>) -> String {
    let mut out = String::with_capacity(canvas.nrows() * (canvas.ncols() + 1));

    for row in canvas.rows() {
        for col in row {
            out.push(*col);
        }
        out.push('\n');
    }

    out
}

impl Display for Diagram<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(&self.canvas()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_turn() -> (GridGraph, PathSnapshot) {
        let graph = GridGraph::try_new(2, 2).unwrap();
        let snapshot = PathSnapshot::from_path(&graph, &[Vertex(0, 1), Vertex(1, 1), Vertex(1, 0)]).unwrap();
        (graph, snapshot)
    }

    #[test]
    fn solution_style() {
        let (graph, snapshot) = corner_turn();
        assert_eq!(Diagram::new(&graph, &snapshot).to_string(), "  ^\n  ┃\nO━•\n");
    }

    #[test]
    fn debug_style_with_broken_edge() {
        let (graph, snapshot) = corner_turn();
        let mut broken = graph.empty_edge_bits();
        broken.insert(graph.edge_between(Vertex(0, 0), Vertex(1, 0)).unwrap());

        let diagram = Diagram::new(&graph, &snapshot).broken(&broken).style(DiagramStyle::Debug);
        assert_eq!(diagram.to_string(), "+ +\n| X\n+X+\n");
    }

    #[test]
    fn cell_symbols_sit_between_edges() {
        let graph = GridGraph::try_new(3, 3).unwrap();
        let snapshot = PathSnapshot::new(&graph);
        let cells = CellOverlay::from_rows(["3 ", " w"]).unwrap();

        let canvas = Diagram::new(&graph, &snapshot).cells(&cells).style(DiagramStyle::Debug).canvas();
        assert_eq!(canvas.dim(), (5, 5));
        assert_eq!(canvas[(1, 1)], '3');
        assert_eq!(canvas[(3, 3)], 'w');
        assert_eq!(canvas[(1, 3)], ' ');
        assert_eq!(canvas[(0, 1)], '-');
        assert_eq!(canvas[(1, 0)], '|');
    }
}
