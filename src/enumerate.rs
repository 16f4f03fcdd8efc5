use std::vec;

use itertools::Itertools;

use crate::edge::EdgeId;
use crate::graph::GridGraph;
use crate::location::Vertex;
use crate::snapshot::PathSnapshot;

/// Exhaustive search for every line that can be drawn from a graph's start vertex.
///
/// A line may follow any edge to an intersection it has not touched yet; it ends where no such edge remains.
/// Every prefix of every line is reported, including lines that wander on after passing the end vertex.
/// This is a superset of what any single puzzle needs, but it depends only on the grid's dimensions and so can be
/// computed once and cached (see [`PathCache`](crate::PathCache)).
///
/// The search is exponential in the grid's area: a 5x5 grid yields 153744 snapshots.
pub struct PathEnumerator<'a> {
    graph: &'a GridGraph,
}

impl<'a> PathEnumerator<'a> {
    /// An enumerator over `graph`.
    pub fn new(graph: &'a GridGraph) -> Self {
        Self { graph }
    }

    /// Every partial line from the start vertex, in depth-first order.
    ///
    /// The bare start vertex is not reported.
    pub fn enumerate_all(&self) -> Vec<PathSnapshot> {
        let graph = self.graph;
        let mut recorded = Vec::new();

        // one working line, extended on the way down and trimmed on the way back up;
        // only recorded snapshots are cloned
        let mut working = PathSnapshot::new(graph);
        let mut taken: Vec<EdgeId> = Vec::new();
        // frame n holds the moves not yet tried from the nth vertex of the working line
        let mut frames: Vec<vec::IntoIter<(Vertex, EdgeId)>> = vec![graph.moves(&working, graph.start()).into_iter()];

        while let Some(frame) = frames.last_mut() {
            match frame.next() {
                Some((to, via)) => {
                    working.advance(to, via);
                    taken.push(via);
                    recorded.push(working.clone());
                    if recorded.len() % 50_000 == 0 {
                        log::debug!("enumerated {} snapshots so far", recorded.len());
                    }

                    frames.push(graph.moves(&working, to).into_iter());
                }
                None => {
                    frames.pop();
                    if let Some(via) = taken.pop() {
                        working.retreat(via);
                    }
                }
            }
        }

        recorded
    }
}

/// The result of enumerating one grid: every snapshot, and the subset that reaches the end vertex.
#[derive(Clone, Debug)]
pub struct Enumeration {
    pub(crate) graph: GridGraph,
    pub(crate) all: Vec<PathSnapshot>,
    pub(crate) complete: Vec<PathSnapshot>,
}

impl Enumeration {
    /// Enumerate `graph` from scratch.
    pub fn from_graph(graph: GridGraph) -> Self {
        let all = PathEnumerator::new(&graph).enumerate_all();
        let complete = all.iter().filter(|snapshot| snapshot.is_complete(&graph)).cloned().collect_vec();
        log::info!(
            "enumerated {}x{} grid: {} snapshots, {} reach the end",
            graph.width(),
            graph.height(),
            all.len(),
            complete.len()
        );

        Self { graph, all, complete }
    }

    /// The grid that was enumerated.
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// Every snapshot, in depth-first order.
    pub fn all(&self) -> &[PathSnapshot] {
        &self.all
    }

    /// Snapshots whose line ends on the end vertex.
    pub fn complete(&self) -> &[PathSnapshot] {
        &self.complete
    }
}
