use serde::{Deserialize, Serialize};

use crate::edge::{Edge, EdgeBits, EdgeId};
use crate::graph::{GraphError, GridGraph};
use crate::location::Vertex;

/// A line in progress: the vertices visited from the start, and which edges that makes active.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSnapshot {
    path: Vec<Vertex>,
    active: EdgeBits,
}

impl PathSnapshot {
    /// A line that has not left `graph`'s start vertex yet.
    pub fn new(graph: &GridGraph) -> Self {
        Self {
            path: vec![graph.start()],
            active: graph.empty_edge_bits(),
        }
    }

    /// Replay `vertices` (starting at the graph's start) through [`Self::activate_edge`].
    pub fn from_path(graph: &GridGraph, vertices: &[Vertex]) -> Result<Self, GraphError> {
        let mut snapshot = Self::new(graph);
        if let Some(first) = vertices.first() {
            if *first != graph.start() {
                return Err(GraphError::NotAtEnd { from: *first, last: graph.start() });
            }
        }

        for pair in vertices.windows(2) {
            snapshot.activate_edge(graph, pair[0], pair[1])?;
        }
        Ok(snapshot)
    }

    /// Assemble a snapshot without checking that `active` is the edge set of `path`.
    #[cfg(test)]
    pub(crate) fn from_parts(path: Vec<Vertex>, active: EdgeBits) -> Self {
        Self { path, active }
    }

    /// Visited vertices, starting with the graph's start.
    pub fn path(&self) -> &[Vertex] {
        &self.path
    }

    /// Edges on the line.
    pub fn active(&self) -> &EdgeBits {
        &self.active
    }

    /// Where the line currently ends.
    pub fn last(&self) -> Vertex {
        // never empty: every constructor seeds the start vertex
        self.path[self.path.len() - 1]
    }

    /// Whether the line ends on `graph`'s end vertex.
    pub fn is_complete(&self, graph: &GridGraph) -> bool {
        self.last() == graph.end()
    }

    /// Number of active edges, i.e. the line's length.
    pub fn len(&self) -> usize {
        self.path.len() - 1
    }

    /// Whether the line has not left the start yet.
    pub fn is_empty(&self) -> bool {
        self.path.len() == 1
    }

    /// Whether `edge` is on the line. Edges outside `graph` never are.
    pub fn is_active(&self, graph: &GridGraph, edge: Edge) -> bool {
        graph.edge_id(edge).is_some_and(|id| self.active.contains(id))
    }

    /// Every topology edge with its state.
    pub fn edge_states<'a>(&'a self, graph: &'a GridGraph) -> impl Iterator<Item = (Edge, bool)> + 'a {
        graph.edges().map(|(id, edge)| (edge, self.active.contains(id)))
    }

    /// Mark the edge `{a, b}` active and extend the line to `b`.
    ///
    /// `a` must be where the line currently ends, `{a, b}` must be an edge of `graph`, and no active edge may touch `b`
    /// yet.
    pub fn activate_edge(&mut self, graph: &GridGraph, a: Vertex, b: Vertex) -> Result<(), GraphError> {
        if a != self.last() {
            return Err(GraphError::NotAtEnd { from: a, last: self.last() });
        }
        let id = graph.edge_between(a, b).ok_or(GraphError::NoSuchEdge(a, b))?;
        if self.active.contains(id) || graph.is_touched(&self.active, b) {
            return Err(GraphError::Revisit(b));
        }
        self.advance(b, id);
        Ok(())
    }

    pub(crate) fn advance(&mut self, to: Vertex, via: EdgeId) {
        self.active.insert(via);
        self.path.push(to);
    }

    pub(crate) fn retreat(&mut self, via: EdgeId) {
        if self.path.len() > 1 {
            self.active.remove(via);
            self.path.pop();
        }
    }

    /// Edges along the path, in the order the line walks them.
    pub fn steps(&self) -> impl Iterator<Item = Edge> + '_ {
        self.path.windows(2).map(|pair| Edge::new(pair[0], pair[1]))
    }
}
