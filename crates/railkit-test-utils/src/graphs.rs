//! Connectivity-graph builders.

use nalgebra::Point2;
use railkit_core::{PieceId, TrackGraph};

/// A straight chain of `n` pieces at unit spacing along the x-axis, each
/// connected to the next.
pub fn line_graph(n: usize) -> (TrackGraph, Vec<PieceId>) {
    let mut graph = TrackGraph::new();
    let ids: Vec<PieceId> = (0..n)
        .map(|i| graph.add_piece(Point2::new(i as f64, 0.0), 2))
        .collect();
    for pair in ids.windows(2) {
        graph.connect(pair[0], pair[1]).expect("line fixture connects");
    }
    (graph, ids)
}

/// Two routes between a shared start and goal: a two-hop route over the
/// top and a longer three-hop route underneath.
///
/// Returns `(graph, start, goal, short_route)` where `short_route` is the
/// cheaper piece sequence including both endpoints.
pub fn two_route_graph() -> (TrackGraph, PieceId, PieceId, Vec<PieceId>) {
    let mut graph = TrackGraph::new();
    let start = graph.add_piece(Point2::new(0.0, 0.0), 4);
    let goal = graph.add_piece(Point2::new(10.0, 0.0), 4);

    // Short: one gentle waypoint above the line.
    let top = graph.add_piece(Point2::new(5.0, 1.0), 2);
    graph.connect(start, top).expect("fixture connects");
    graph.connect(top, goal).expect("fixture connects");

    // Long: two waypoints dipping well below the line.
    let low_a = graph.add_piece(Point2::new(3.0, -4.0), 2);
    let low_b = graph.add_piece(Point2::new(7.0, -4.0), 2);
    graph.connect(start, low_a).expect("fixture connects");
    graph.connect(low_a, low_b).expect("fixture connects");
    graph.connect(low_b, goal).expect("fixture connects");

    (graph, start, goal, vec![start, top, goal])
}

/// An `n` by `n` grid at unit spacing with 4-neighbor connections.
///
/// Returns the graph and ids in row-major order.
pub fn grid_graph(n: usize) -> (TrackGraph, Vec<PieceId>) {
    let mut graph = TrackGraph::new();
    let ids: Vec<PieceId> = (0..n * n)
        .map(|i| graph.add_piece(Point2::new((i % n) as f64, (i / n) as f64), 4))
        .collect();
    for row in 0..n {
        for col in 0..n {
            let here = ids[row * n + col];
            if col + 1 < n {
                graph.connect(here, ids[row * n + col + 1]).expect("grid fixture connects");
            }
            if row + 1 < n {
                graph.connect(here, ids[(row + 1) * n + col]).expect("grid fixture connects");
            }
        }
    }
    (graph, ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_graph_links_consecutive_pieces() {
        let (graph, ids) = line_graph(4);
        assert_eq!(graph.len(), 4);
        for pair in ids.windows(2) {
            assert!(graph.neighbors(pair[0]).unwrap().any(|n| n == pair[1]));
        }
    }

    #[test]
    fn two_route_graph_short_route_is_cheaper() {
        let (graph, start, goal, short_route) = two_route_graph();
        let length = |route: &[PieceId]| -> f64 {
            route
                .windows(2)
                .map(|w| {
                    nalgebra::distance(
                        &graph.piece(w[0]).unwrap().center(),
                        &graph.piece(w[1]).unwrap().center(),
                    )
                })
                .sum()
        };

        let all_ids: Vec<PieceId> = graph.pieces().iter().map(|p| p.id()).collect();
        let long_route: Vec<PieceId> = [start, all_ids[3], all_ids[4], goal].to_vec();
        assert!(length(&short_route) < length(&long_route));
    }

    #[test]
    fn grid_graph_inner_piece_has_four_neighbors() {
        let (graph, ids) = grid_graph(3);
        let center = ids[4];
        assert_eq!(graph.neighbors(center).unwrap().count(), 4);
    }
}
