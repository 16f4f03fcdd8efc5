use std::collections::{BTreeSet, VecDeque};

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::cell::{CellOverlay, Symbol};
use crate::edge::EdgeBits;
use crate::graph::GridGraph;
use crate::location::CellPos;
use crate::shape::Step;
use crate::snapshot::PathSnapshot;

/// A maximal set of cells that reach each other without crossing a wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    cells: BTreeSet<CellPos>,
}

impl Region {
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true for a region out of [`segment`].
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `cell` is in this region.
    pub fn contains(&self, cell: CellPos) -> bool {
        self.cells.contains(&cell)
    }

    /// Member cells, row-major.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells.iter().copied()
    }

    /// Distinct color symbols found in this region.
    pub fn colors(&self, overlay: &CellOverlay) -> BTreeSet<char> {
        self.cells()
            .filter_map(|cell| match overlay.get(cell) {
                Some(Symbol::Color(c)) => Some(c),
                _ => None,
            })
            .collect()
    }
}

/// Partition the cells of `graph` into regions separated by the snapshot's line.
pub fn segment(graph: &GridGraph, snapshot: &PathSnapshot) -> Vec<Region> {
    segment_with_walls(graph, snapshot.active())
}

/// Partition the cells of `graph` into regions; two neighboring cells share a region unless the edge between them is in `walls`.
///
/// Regions come out in the row-major order of their first cell.
pub fn segment_with_walls(graph: &GridGraph, walls: &EdgeBits) -> Vec<Region> {
    let (width, height) = graph.cell_dims();
    let mut assigned: Array2<bool> = Array2::from_elem((height, width), false);
    let mut regions = Vec::new();

    for seed in graph.cells() {
        if assigned[seed.as_index()] {
            continue;
        }

        assigned[seed.as_index()] = true;
        let mut cells = BTreeSet::from([seed]);
        let mut queue = VecDeque::from([seed]);

        while let Some(cell) = queue.pop_front() {
            for step in Step::VARIANTS {
                let neighbor = step.attempt_from_cell(cell);
                // out-of-bounds neighbors have no separating edge
                let Some(between) = graph.separating_edge(cell, neighbor) else {
                    continue;
                };
                if walls.contains(between) || assigned[neighbor.as_index()] {
                    continue;
                }

                assigned[neighbor.as_index()] = true;
                cells.insert(neighbor);
                queue.push_back(neighbor);
            }
        }

        regions.push(Region { cells });
    }

    log::trace!(
        "segmented into {} regions of sizes {:?}",
        regions.len(),
        regions.iter().map(Region::len).collect_vec()
    );
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Vertex;

    #[test]
    fn no_walls_is_one_region() {
        let graph = GridGraph::try_new(4, 3).unwrap();
        let regions = segment_with_walls(&graph, &graph.empty_edge_bits());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 6);
    }

    #[test]
    fn every_cell_assigned_once() {
        let graph = GridGraph::try_new(4, 4).unwrap();
        let snapshot = PathSnapshot::from_path(
            &graph,
            &[Vertex(0, 3), Vertex(1, 3), Vertex(1, 2), Vertex(1, 1), Vertex(2, 1), Vertex(3, 1), Vertex(3, 0)],
        )
        .unwrap();

        let regions = segment(&graph, &snapshot);
        let total: usize = regions.iter().map(Region::len).sum();
        assert_eq!(total, 9);
        for cell in graph.cells() {
            assert_eq!(regions.iter().filter(|region| region.contains(cell)).count(), 1);
        }
        assert_eq!(regions.iter().map(Region::len).sorted().collect_vec(), vec![4, 5]);
    }
}
