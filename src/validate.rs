//! Checks that decide whether a complete line solves a puzzle.

use crate::cell::{CellOverlay, Symbol};
use crate::edge::EdgeBits;
use crate::graph::GridGraph;
use crate::region::segment_with_walls;
use crate::snapshot::PathSnapshot;

/// How region growth treats a broken edge.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum RegionGrowth {
    /// A gap in the panel's artwork separates regions just like the drawn line does.
    #[default]
    BrokenEdgesBlock,
    /// Only the drawn line separates regions.
    BrokenEdgesPass,
}

fn fits(graph: &GridGraph, cells: &CellOverlay) -> bool {
    (cells.width(), cells.height()) == graph.cell_dims()
}

/// Whether the line walks over any edge in `broken`.
pub fn uses_broken_edge(snapshot: &PathSnapshot, broken: &EdgeBits) -> bool {
    snapshot.active().intersects(broken)
}

/// Every digit cell has exactly that many of its four edges on the line. Blank and color cells are ignored.
///
/// An overlay that does not have exactly one symbol per cell of `graph` never validates.
pub fn is_solved_touch_count(graph: &GridGraph, snapshot: &PathSnapshot, cells: &CellOverlay) -> bool {
    if !fits(graph, cells) {
        return false;
    }

    cells.constraints().all(|(cell, symbol)| match symbol {
        Symbol::Digit(required) => {
            let touched = graph
                .cell_boundary(cell)
                .iter()
                .filter(|id| snapshot.active().contains(**id))
                .count();
            touched == required as usize
        }
        _ => true,
    })
}

/// The line avoids every broken edge, and no region it carves out holds two different colors.
///
/// As with [`is_solved_touch_count`], a misfit overlay never validates.
pub fn is_solved_region_color(
    graph: &GridGraph,
    snapshot: &PathSnapshot,
    cells: &CellOverlay,
    broken: &EdgeBits,
    growth: RegionGrowth,
) -> bool {
    if !fits(graph, cells) || uses_broken_edge(snapshot, broken) {
        return false;
    }

    let regions = match growth {
        RegionGrowth::BrokenEdgesBlock => segment_with_walls(graph, &snapshot.active().union(broken)),
        RegionGrowth::BrokenEdgesPass => segment_with_walls(graph, snapshot.active()),
    };

    regions.iter().all(|region| region.colors(cells).len() <= 1)
}
