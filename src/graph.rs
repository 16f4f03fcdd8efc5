use std::num::NonZero;

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;

use crate::edge::{Edge, EdgeBits, EdgeId};
use crate::location::{CellPos, Coord, Dimension, Vertex};
use crate::shape::Step;
use crate::snapshot::PathSnapshot;

/// Invariant violations raised by the graph model.
///
/// None of these are recoverable: they mean the caller handed the graph something it never produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The two vertices are not grid-adjacent, or not both in bounds.
    #[error("no edge between {0} and {1} in this grid")]
    NoSuchEdge(Vertex, Vertex),
    /// A line can only be extended from its last vertex.
    #[error("cannot extend from {from}: the path ends at {last}")]
    NotAtEnd {
        /// Where the extension was attempted.
        from: Vertex,
        /// Where the line actually ends.
        last: Vertex,
    },
    /// A grid needs at least one vertex along each axis.
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested vertices per row.
        width: usize,
        /// Requested vertices per column.
        height: usize,
    },
    /// The line would return to an intersection it already touches.
    #[error("the line already touches {0}")]
    Revisit(Vertex),
}

/// The topology of a rectangular line puzzle.
///
/// Vertices are the grid-line intersections; the line starts in the bottom-left corner and ends in the top-right corner.
/// Edge state lives in [`PathSnapshot`]s, so one graph serves any number of paths.
#[derive(Clone, Debug)]
pub struct GridGraph {
    graph: UnGraphMap<Vertex, EdgeId>,
    // indexed by EdgeId
    edges: Vec<Edge>,
    dims: (Dimension, Dimension),
}

impl GridGraph {
    /// Build the full topology, every edge inactive. Dimensions are `(width, height)` in vertices.
    pub fn new(dims: (Dimension, Dimension)) -> Self {
        let (width, height) = (dims.0.get(), dims.1.get());
        let edge_count = width * (height - 1) + height * (width - 1);
        let mut graph = UnGraphMap::with_capacity(width * height, edge_count);
        let mut edges = Vec::with_capacity(edge_count);

        for y in 0..height {
            for x in 0..width {
                let vertex = Vertex(x, y);
                graph.add_node(vertex);

                // add edges to the right and down, if possible
                for step in Step::FORWARD_VARIANTS {
                    let other = step.attempt_from(vertex);
                    if other.0 < width && other.1 < height {
                        graph.add_edge(vertex, other, EdgeId(edges.len()));
                        edges.push(Edge::new(vertex, other));
                    }
                }
            }
        }

        debug_assert_eq!(edges.len(), edge_count);
        Self { graph, edges, dims }
    }

    /// [`Self::new`] from raw sizes, rejecting zero.
    pub fn try_new(width: usize, height: usize) -> Result<Self, GraphError> {
        match (NonZero::new(width), NonZero::new(height)) {
            (Some(w), Some(h)) => Ok(Self::new((w, h))),
            _ => Err(GraphError::ZeroDimension { width, height }),
        }
    }

    /// `(width, height)` in vertices.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// Vertices per row.
    pub fn width(&self) -> Coord {
        self.dims.0.get()
    }

    /// Vertices per column.
    pub fn height(&self) -> Coord {
        self.dims.1.get()
    }

    /// Width and height of the cell grid, one less than the vertex grid on each axis.
    pub fn cell_dims(&self) -> (Coord, Coord) {
        (self.width() - 1, self.height() - 1)
    }

    /// The bottom-left corner, where every line begins.
    pub fn start(&self) -> Vertex {
        Vertex(0, self.height() - 1)
    }

    /// The top-right corner, where a finished line exits.
    pub fn end(&self) -> Vertex {
        Vertex(self.width() - 1, 0)
    }

    /// Bounds check.
    pub fn contains(&self, vertex: Vertex) -> bool {
        vertex.0 < self.width() && vertex.1 < self.height()
    }

    /// Bounds check over the cell namespace.
    pub fn contains_cell(&self, cell: CellPos) -> bool {
        let (w, h) = self.cell_dims();
        cell.0 < w && cell.1 < h
    }

    /// `W*(H-1) + H*(W-1)`.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Panics if `id` did not come from this graph.
    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id.0]
    }

    /// Every edge with its id, in canonical order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, Edge)> + '_ {
        self.edges.iter().enumerate().map(|(index, edge)| (EdgeId(index), *edge))
    }

    /// The id of the edge joining `a` and `b`, if they are adjacent.
    pub fn edge_between(&self, a: Vertex, b: Vertex) -> Option<EdgeId> {
        self.graph.edge_weight(a, b).copied()
    }

    /// Look `edge` up in this graph.
    pub fn edge_id(&self, edge: Edge) -> Option<EdgeId> {
        let (a, b) = edge.canonical();
        self.edge_between(a, b)
    }

    /// An empty bit vector sized for this graph's edges.
    pub fn empty_edge_bits(&self) -> EdgeBits {
        EdgeBits::with_len(self.edge_count())
    }

    /// Edges incident to `vertex`.
    pub fn incident(&self, vertex: Vertex) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.edges(vertex).map(|(_, _, id)| *id)
    }

    /// Whether any edge in `active` has `vertex` as an endpoint.
    pub fn is_touched(&self, active: &EdgeBits, vertex: Vertex) -> bool {
        self.incident(vertex).any(|id| active.contains(id))
    }

    /// Moves available from `current` along with the edge each would activate, in [`Step`] order.
    ///
    /// A move needs an edge that is inactive and leads to an intersection no active edge touches yet.
    pub(crate) fn moves(&self, snapshot: &PathSnapshot, current: Vertex) -> Vec<(Vertex, EdgeId)> {
        Step::neighbors_of(current)
            .filter_map(|(_, to)| self.edge_between(current, to).map(|id| (to, id)))
            .filter(|(to, id)| !snapshot.active().contains(*id) && !self.is_touched(snapshot.active(), *to))
            .collect_vec()
    }

    /// Vertices the line may extend to from `current`.
    pub fn valid_moves(&self, snapshot: &PathSnapshot, current: Vertex) -> Vec<Vertex> {
        self.moves(snapshot, current).into_iter().map(|(to, _)| to).collect_vec()
    }

    /// The four edges bounding `cell`: top, bottom, left, right.
    ///
    /// Panics if `cell` is out of bounds.
    pub fn cell_boundary(&self, cell: CellPos) -> [EdgeId; 4] {
        let [top_left, top_right, bottom_left, bottom_right] = cell.corners();
        [
            (top_left, top_right),
            (bottom_left, bottom_right),
            (top_left, bottom_left),
            (top_right, bottom_right),
        ]
        .map(|(a, b)| {
            self.edge_between(a, b)
                .unwrap_or_else(|| panic!("{cell} is outside a {}x{} grid", self.width(), self.height()))
        })
    }

    /// The edge a line must use to separate two orthogonally adjacent cells, i.e. the dual edge between them.
    pub fn separating_edge(&self, a: CellPos, b: CellPos) -> Option<EdgeId> {
        if !self.contains_cell(a) || !self.contains_cell(b) {
            return None;
        }

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        match (hi.0.checked_sub(lo.0), hi.1.checked_sub(lo.1)) {
            // hi is to the right of lo: the shared side is hi's left side
            (Some(1), Some(0)) => self.edge_between(Vertex(hi.0, hi.1), Vertex(hi.0, hi.1 + 1)),
            // hi is below lo: the shared side is hi's top side
            (Some(0), Some(1)) => self.edge_between(Vertex(hi.0, hi.1), Vertex(hi.0 + 1, hi.1)),
            _ => None,
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> {
        let (w, h) = self.cell_dims();
        (0..h).cartesian_product(0..w).map(|(y, x)| CellPos(x, y))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, 1, 0)]
    #[case(2, 2, 4)]
    #[case(2, 3, 7)]
    #[case(4, 4, 24)]
    #[case(5, 5, 40)]
    fn edge_count_matches_topology(#[case] width: usize, #[case] height: usize, #[case] expected: usize) {
        let graph = GridGraph::try_new(width, height).unwrap();
        assert_eq!(graph.edge_count(), expected);
        assert_eq!(graph.edge_count(), width * (height - 1) + height * (width - 1));

        for (id, edge) in graph.edges() {
            let (a, b) = edge.canonical();
            assert!(graph.contains(a) && graph.contains(b));
            assert!(Step::direction_to(a, b).is_some());
            assert_eq!(graph.edge_id(edge), Some(id));
        }
    }

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(GridGraph::try_new(0, 3).unwrap_err(), GraphError::ZeroDimension { width: 0, height: 3 });
    }

    #[test]
    fn corners_and_bounds() {
        let graph = GridGraph::try_new(4, 3).unwrap();
        assert_eq!(graph.start(), Vertex(0, 2));
        assert_eq!(graph.end(), Vertex(3, 0));
        assert!(graph.contains(Vertex(3, 2)));
        assert!(!graph.contains(Vertex(4, 0)));
        assert!(!graph.contains(Step::Left.attempt_from(Vertex(0, 0))));
        assert_eq!(graph.cells().count(), 6);
    }

    #[test]
    fn dual_edges() {
        let graph = GridGraph::try_new(3, 3).unwrap();
        let right = graph.separating_edge(CellPos(0, 0), CellPos(1, 0)).unwrap();
        assert_eq!(graph.edge(right), Edge::new(Vertex(1, 0), Vertex(1, 1)));
        let below = graph.separating_edge(CellPos(1, 1), CellPos(1, 0)).unwrap();
        assert_eq!(graph.edge(below), Edge::new(Vertex(1, 1), Vertex(2, 1)));
        assert_eq!(graph.separating_edge(CellPos(0, 0), CellPos(1, 1)), None);
        assert_eq!(graph.separating_edge(CellPos(1, 0), CellPos(2, 0)), None);

        let boundary = graph.cell_boundary(CellPos(1, 1));
        assert!(boundary.contains(&below));
        assert_eq!(boundary.iter().unique().count(), 4);
    }
}
