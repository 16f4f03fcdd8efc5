#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use itertools::Itertools;
    use strum::VariantArray;
    use unordered_pair::UnorderedPair;

    use crate::builder::{BuilderInvalidReason, PuzzleBuilder};
    use crate::cell::{OverlayParseError, Symbol};
    use crate::diagram::{Diagram, DiagramStyle};
    use crate::edge::Edge;
    use crate::enumerate::Enumeration;
    use crate::graph::GridGraph;
    use crate::location::{CellPos, Dimension, Vertex};
    use crate::puzzle::{Preset, PuzzleVariant};
    use crate::region::segment;
    use crate::shape::Step;
    use crate::snapshot::PathSnapshot;
    use crate::validate::RegionGrowth;

    fn dims(width: usize, height: usize) -> (Dimension, Dimension) {
        (Dimension::new(width).unwrap(), Dimension::new(height).unwrap())
    }

    fn vertices(coords: &[(usize, usize)]) -> Vec<Vertex> {
        coords.iter().map(|(x, y)| Vertex(*x, *y)).collect_vec()
    }

    #[test]
    fn touch_count_single_cell() {
        let puzzle = PuzzleBuilder::with_dims(dims(3, 3)).cells(["3 ", "  "]).build().unwrap();
        let graph = puzzle.graph();

        let three = PathSnapshot::from_path(graph, &vertices(&[(0, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0), (2, 0)])).unwrap();
        let two = PathSnapshot::from_path(graph, &vertices(&[(0, 2), (0, 1), (0, 0), (1, 0), (2, 0)])).unwrap();
        assert!(puzzle.is_solution(&three));
        assert!(!puzzle.is_solution(&two));

        let paths = Enumeration::from_graph(graph.clone());
        assert_eq!(puzzle.solutions(&paths).unwrap().len(), 4);
    }

    #[test]
    fn touch_count_incomplete_line_never_solves() {
        let puzzle = PuzzleBuilder::with_dims(dims(3, 3)).cells(["3 ", "  "]).build().unwrap();
        let partial = PathSnapshot::from_path(puzzle.graph(), &vertices(&[(0, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0)])).unwrap();
        assert!(!puzzle.is_solution(&partial));
    }

    #[test]
    fn touch_count_rejects_broken_edges() {
        let line = vertices(&[(0, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0), (2, 0)]);
        let puzzle = PuzzleBuilder::with_dims(dims(3, 3))
            .cells(["3 ", "  "])
            .break_edge(UnorderedPair(Vertex(0, 0), Vertex(1, 0)))
            .build()
            .unwrap();

        let snapshot = PathSnapshot::from_path(puzzle.graph(), &line).unwrap();
        assert!(!puzzle.is_solution(&snapshot));
    }

    #[test]
    fn touch_count_unique_solution() {
        let puzzle = PuzzleBuilder::with_dims(dims(4, 4))
            .variant(Preset::Triangle)
            .cells([" 21", " 21", "3 1"])
            .build()
            .unwrap();

        let paths = Enumeration::from_graph(puzzle.graph().clone());
        let solutions = puzzle.solutions(&paths).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(
            solutions[0].path(),
            vertices(&[(0, 3), (0, 2), (1, 2), (1, 3), (2, 3), (2, 2), (2, 1), (1, 1), (0, 1), (0, 0), (1, 0), (2, 0), (3, 0)])
        );
    }

    #[test]
    fn segmentation_isolates_one_cell() {
        let graph = GridGraph::new(dims(3, 3));
        let snapshot = PathSnapshot::from_path(&graph, &vertices(&[(0, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0), (2, 0)])).unwrap();

        let regions = segment(&graph, &snapshot);
        assert_eq!(regions.iter().map(|region| region.len()).collect_vec(), vec![3, 1]);
        assert!(regions[1].contains(CellPos(0, 1)));
    }

    #[test]
    fn segmentation_long_line() {
        let graph = GridGraph::new(dims(5, 5));
        let snapshot = PathSnapshot::from_path(
            &graph,
            &vertices(&[
                (0, 4), (1, 4), (2, 4), (3, 4), (4, 4), (4, 3), (3, 3), (2, 3), (2, 2), (1, 2), (0, 2), (0, 1),
                (0, 0), (1, 0), (1, 1), (2, 1), (2, 0), (3, 0), (3, 1), (3, 2), (4, 2), (4, 1), (4, 0),
            ]),
        )
        .unwrap();
        assert_eq!(snapshot.len(), 22);

        let regions = segment(&graph, &snapshot);
        assert_eq!(regions.iter().map(|region| region.len()).sorted().collect_vec(), vec![1, 2, 6, 7]);
    }

    #[test]
    fn region_color_two_colors() {
        let puzzle = PuzzleBuilder::with_dims(dims(4, 4))
            .variant(Preset::Starter2Region)
            .cells(["k w", "wwk", "k  "])
            .build()
            .unwrap();

        let paths = Enumeration::from_graph(puzzle.graph().clone());
        assert_eq!(paths.complete().len(), 184);
        let solutions = puzzle.solutions(&paths).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(
            solutions[0].path(),
            vertices(&[
                (0, 3), (1, 3), (2, 3), (3, 3), (3, 2), (3, 1), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1), (1, 1),
                (1, 0), (2, 0), (3, 0),
            ])
        );
    }

    #[test]
    fn region_color_broken_edges() {
        let broken = [
            ((4, 0), (3, 0)),
            ((3, 0), (3, 1)),
            ((3, 1), (2, 1)),
            ((3, 2), (3, 3)),
            ((1, 2), (1, 3)),
        ]
        .map(|(a, b)| UnorderedPair(Vertex(a.0, a.1), Vertex(b.0, b.1)));

        let mut builder = PuzzleBuilder::with_dims(dims(5, 5));
        builder.variant(Preset::TripletRegion).cells(["b bw", "w w ", " b  ", "w  w"]).break_edges(broken);
        let blocking = builder.build().unwrap();
        let passing = builder
            .variant(PuzzleVariant::RegionColor {
                palette: vec!['w', 'k', 'b', 'o'],
                growth: RegionGrowth::BrokenEdgesPass,
            })
            .build()
            .unwrap();

        let paths = Enumeration::from_graph(blocking.graph().clone());
        assert_eq!(paths.all().len(), 153744);
        assert_eq!(paths.complete().len(), 8512);

        let solutions = blocking.solutions(&paths).unwrap();
        assert_eq!(solutions.len(), 14);
        for solution in &solutions {
            for edge in blocking.broken() {
                assert!(!solution.is_active(blocking.graph(), *edge));
            }
        }
        assert!(passing.solutions(&paths).unwrap().is_empty());
    }

    #[test]
    fn solutions_need_matching_dimensions() {
        let puzzle = PuzzleBuilder::with_dims(dims(3, 3)).build().unwrap();
        let paths = Enumeration::from_graph(GridGraph::new(dims(2, 2)));
        let err = puzzle.solutions(&paths).unwrap_err();
        assert_eq!((err.puzzle, err.paths), ((3, 3), (2, 2)));
    }

    #[test]
    fn blank_puzzle_accepts_every_complete_line() {
        let puzzle = PuzzleBuilder::with_dims(dims(3, 3)).variant(Preset::Starter2Region).build().unwrap();
        let paths = Enumeration::from_graph(puzzle.graph().clone());
        assert_eq!(puzzle.solutions(&paths).unwrap().len(), paths.complete().len());
    }

    #[test]
    fn builder_rejects_mismatched_overlay() {
        let reasons = PuzzleBuilder::with_dims(dims(4, 4)).cells(["  ", "  "]).is_valid().unwrap();
        assert_eq!(
            reasons,
            vec![BuilderInvalidReason::OverlayDimensionMismatch {
                expected: (3, 3),
                found: (2, 2)
            }]
        );
    }

    #[test]
    fn builder_rejects_unknown_symbols() {
        let reasons = PuzzleBuilder::with_dims(dims(3, 3)).cells(["3?", "  "]).is_valid().unwrap();
        assert_eq!(
            reasons,
            vec![BuilderInvalidReason::Overlay(OverlayParseError::UnknownSymbol {
                symbol: '?',
                cell: CellPos(1, 0)
            })]
        );

        let reasons = PuzzleBuilder::with_dims(dims(3, 3))
            .variant(Preset::Starter2Region)
            .cells(["w2", "kb"])
            .is_valid()
            .unwrap();
        assert_eq!(
            reasons
                .iter()
                .map(|reason| match reason {
                    BuilderInvalidReason::UnexpectedSymbol { symbol, .. } => *symbol,
                    other => panic!("unexpected reason {other:?}"),
                })
                .collect_vec(),
            vec![Symbol::Digit(2), Symbol::Color('b')]
        );
    }

    #[test]
    fn builder_rejects_edges_outside_topology() {
        let err = PuzzleBuilder::with_dims(dims(3, 3))
            .break_edge(UnorderedPair(Vertex(0, 0), Vertex(1, 1)))
            .break_around(Vertex(0, 0), vec![Step::Right, Step::Left])
            .build()
            .unwrap_err();

        assert_eq!(err.reasons.len(), 2);
        assert_eq!(err.reasons[0], BuilderInvalidReason::EdgeOutOfTopology(Edge::new(Vertex(0, 0), Vertex(1, 1))));
        assert!(err.to_string().starts_with("malformed puzzle: broken edge (0, 0)-(1, 1) is not part of the grid; "));
    }

    #[test]
    fn builder_valid_and_cloneable() {
        let mut builder = PuzzleBuilder::with_dims(dims(3, 3));
        builder.break_around(Vertex(1, 1), vec![Step::Up, Step::Down]);
        let saved = builder.clone();
        builder.cells(["x"]);

        assert!(saved.is_valid().is_none());
        assert_eq!(saved.build().unwrap().broken().len(), 2);
        assert!(builder.is_valid().is_some());
    }

    #[test]
    fn presets_parse_by_name() {
        assert_eq!(Preset::from_str("triplet-region"), Ok(Preset::TripletRegion));
        assert_eq!(Preset::from_str("triangle"), Ok(Preset::Triangle));
        assert!(Preset::from_str("hexagon").is_err());
        for preset in Preset::VARIANTS {
            assert_eq!(Preset::from_str(&preset.to_string()), Ok(*preset));
        }
        assert!(Preset::Starter2Region.variant().accepts(Symbol::Color('k')));
        assert!(!Preset::Starter2Region.variant().accepts(Symbol::Color('o')));
    }

    #[test]
    fn solution_diagram() {
        let puzzle = PuzzleBuilder::with_dims(dims(3, 3)).cells(["3 ", "  "]).build().unwrap();
        let snapshot = PathSnapshot::from_path(
            puzzle.graph(),
            &vertices(&[(0, 2), (1, 2), (1, 1), (0, 1), (0, 0), (1, 0), (2, 0)]),
        )
        .unwrap();

        let lines = |rows: [&str; 5]| rows.map(|row| format!("{row}\n")).concat();
        assert_eq!(
            format!("{}", Diagram::of_puzzle(&puzzle, &snapshot)),
            lines(["•━•━^", "┃3   ", "•━•  ", "  ┃  ", "O━•  "])
        );
        assert_eq!(
            format!("{}", Diagram::of_puzzle(&puzzle, &snapshot).style(DiagramStyle::Debug)),
            lines(["+X+X+", "X3| |", "+X+-+", "| X |", "+X+-+"])
        );
    }
}
