//! The A* search loop.
//!
//! A [`PathFinder`] holds the working state of exactly one query: the node
//! arena, the open frontier, and the closed set. Nothing outlives the query,
//! so concurrent searches over a shared graph never contend.

use nalgebra::{distance, Point2};

use railkit_core::{PieceId, RouteError, TrackGraph};

use crate::node::{ClosedSet, NodeArena, OpenList, SearchNode};

/// Result of expanding one node from the frontier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    /// The goal was reached; the path runs start-to-goal inclusive.
    Found(Vec<PieceId>),
    /// The frontier is empty: the goal is unreachable.
    Exhausted,
    /// One node was expanded; call [`PathFinder::step`] again.
    Expanded,
}

/// One in-flight path query.
///
/// [`step`](Self::step) expands a single node per call, which is the natural
/// checkpoint for callers that need cancellation or an expansion budget.
/// [`find_path`] runs the loop to completion.
pub struct PathFinder<'g> {
    graph: &'g TrackGraph,
    goal: PieceId,
    goal_center: Point2<f64>,
    arena: NodeArena,
    open: OpenList,
    closed: ClosedSet,
}

impl<'g> PathFinder<'g> {
    /// Start a query from `start` to `goal`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownPiece`] if either id is not in `graph`.
    pub fn new(graph: &'g TrackGraph, start: PieceId, goal: PieceId) -> Result<Self, RouteError> {
        let start_center = graph.piece(start)?.center();
        let goal_center = graph.piece(goal)?.center();

        let mut finder = Self {
            graph,
            goal,
            goal_center,
            arena: NodeArena::default(),
            open: OpenList::default(),
            closed: ClosedSet::default(),
        };
        let root = finder.arena.push(SearchNode::new(
            start,
            start_center,
            None,
            0.0,
            distance(&start_center, &goal_center),
        ));
        finder.open.insert(&finder.arena, root);
        Ok(finder)
    }

    /// Expand the lowest-f frontier node.
    pub fn step(&mut self) -> SearchStep {
        let Some(current) = self.open.pop(&self.arena) else {
            return SearchStep::Exhausted;
        };

        let current_piece = self.arena.get(current).piece;
        if current_piece == self.goal {
            return SearchStep::Found(self.arena.backtrack(current));
        }

        let current_g = self.arena.get(current).g;
        let current_center = self.arena.get(current).center;

        // Free slots yield no neighbors; duplicates and self-loops are
        // filtered out by the closed/open admission checks below. Slot
        // references always point inside the graph (`connect` validates
        // both ends and pieces are never removed).
        let piece = self
            .graph
            .piece(current_piece)
            .expect("admitted piece exists in the graph");

        for neighbor in piece.connected_pieces() {
            let neighbor_center = self
                .graph
                .piece(neighbor)
                .expect("slot reference exists in the graph")
                .center();
            let g = current_g + distance(&current_center, &neighbor_center);
            let h = distance(&neighbor_center, &self.goal_center);
            let f = g + h;

            // An existing route with equal-or-better f wins; `<=` is the
            // deliberate tie-break, so re-admission needs a strict
            // improvement and the search always terminates.
            if let Some(idx) = self.closed.node_for(neighbor) {
                if self.arena.get(idx).f <= f {
                    continue;
                }
                self.closed.remove(neighbor);
            }
            if let Some(idx) = self.open.node_for(neighbor) {
                if self.arena.get(idx).f <= f {
                    continue;
                }
                self.open.remove(neighbor);
            }

            let idx = self
                .arena
                .push(SearchNode::new(neighbor, neighbor_center, Some(current), g, h));
            self.open.insert(&self.arena, idx);
        }

        self.closed.insert(current_piece, current);
        SearchStep::Expanded
    }

    /// Run the search to completion.
    ///
    /// Returns the start-to-goal path, or an empty vector if the goal is
    /// unreachable.
    pub fn run(mut self) -> Vec<PieceId> {
        loop {
            match self.step() {
                SearchStep::Found(path) => return path,
                SearchStep::Exhausted => return Vec::new(),
                SearchStep::Expanded => {}
            }
        }
    }
}

/// Find the cheapest chain of connected pieces from `start` to `goal`.
///
/// Returns the path start-to-goal inclusive, `[start]` when
/// `start == goal`, or an empty vector when the goal is unreachable.
///
/// # Errors
///
/// Returns [`RouteError::UnknownPiece`] if either id is not in `graph`.
pub fn find_path(
    graph: &TrackGraph,
    start: PieceId,
    goal: PieceId,
) -> Result<Vec<PieceId>, RouteError> {
    if start == goal {
        graph.piece(start)?;
        return Ok(vec![start]);
    }
    Ok(PathFinder::new(graph, start, goal)?.run())
}

/// Like [`find_path`], but giving up after `max_expansions` node
/// expansions (0 means unbounded). A query that exhausts the budget
/// reports no path, exactly as an unreachable goal does.
pub fn find_path_bounded(
    graph: &TrackGraph,
    start: PieceId,
    goal: PieceId,
    max_expansions: u32,
) -> Result<Vec<PieceId>, RouteError> {
    if max_expansions == 0 {
        return find_path(graph, start, goal);
    }
    if start == goal {
        graph.piece(start)?;
        return Ok(vec![start]);
    }

    let mut finder = PathFinder::new(graph, start, goal)?;
    for _ in 0..max_expansions {
        match finder.step() {
            SearchStep::Found(path) => return Ok(path),
            SearchStep::Exhausted => return Ok(Vec::new()),
            SearchStep::Expanded => {}
        }
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use railkit_test_utils::{grid_graph, line_graph, two_route_graph};

    fn path_length(graph: &TrackGraph, path: &[PieceId]) -> f64 {
        path.windows(2)
            .map(|w| {
                distance(
                    &graph.piece(w[0]).unwrap().center(),
                    &graph.piece(w[1]).unwrap().center(),
                )
            })
            .sum()
    }

    fn are_connected(graph: &TrackGraph, a: PieceId, b: PieceId) -> bool {
        graph.neighbors(a).unwrap().any(|n| n == b)
    }

    #[test]
    fn linear_graph_forward_and_back() {
        // Scenario: A-B-C in a line.
        let (graph, ids) = line_graph(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        assert_eq!(find_path(&graph, a, c).unwrap(), vec![a, b, c]);
        assert_eq!(find_path(&graph, c, a).unwrap(), vec![c, b, a]);
    }

    #[test]
    fn start_equals_goal_is_single_element() {
        let (graph, ids) = line_graph(2);
        assert_eq!(find_path(&graph, ids[0], ids[0]).unwrap(), vec![ids[0]]);
    }

    #[test]
    fn unknown_start_or_goal_is_an_error() {
        let (graph, ids) = line_graph(2);
        assert_eq!(
            find_path(&graph, PieceId(99), ids[0]).unwrap_err(),
            RouteError::UnknownPiece(PieceId(99))
        );
        assert_eq!(
            find_path(&graph, ids[0], PieceId(99)).unwrap_err(),
            RouteError::UnknownPiece(PieceId(99))
        );
        assert_eq!(
            find_path(&graph, PieceId(99), PieceId(99)).unwrap_err(),
            RouteError::UnknownPiece(PieceId(99))
        );
    }

    #[test]
    fn disconnected_goal_yields_empty_path() {
        let mut graph = TrackGraph::new();
        let a = graph.add_piece(Point2::new(0.0, 0.0), 2);
        let b = graph.add_piece(Point2::new(1.0, 0.0), 2);
        let island = graph.add_piece(Point2::new(50.0, 50.0), 2);
        graph.connect(a, b).unwrap();

        assert!(find_path(&graph, a, island).unwrap().is_empty());
    }

    #[test]
    fn consecutive_path_pieces_are_connected() {
        let (graph, start, goal, _) = two_route_graph();
        let path = find_path(&graph, start, goal).unwrap();

        assert!(path.len() >= 2);
        for pair in path.windows(2) {
            assert!(are_connected(&graph, pair[0], pair[1]));
            assert!(are_connected(&graph, pair[1], pair[0]));
        }
    }

    #[test]
    fn picks_the_shorter_of_two_routes() {
        let (graph, start, goal, short_route) = two_route_graph();
        let path = find_path(&graph, start, goal).unwrap();
        assert_eq!(path, short_route);
    }

    #[test]
    fn path_is_cost_optimal_against_brute_force() {
        let (graph, start, goal, _) = two_route_graph();
        let found = find_path(&graph, start, goal).unwrap();
        let found_length = path_length(&graph, &found);

        // Enumerate every simple path with a DFS and compare costs.
        let mut best = f64::INFINITY;
        let mut stack = vec![(start, vec![start])];
        while let Some((piece, route)) = stack.pop() {
            if piece == goal {
                best = best.min(path_length(&graph, &route));
                continue;
            }
            for neighbor in graph.neighbors(piece).unwrap() {
                if !route.contains(&neighbor) {
                    let mut next = route.clone();
                    next.push(neighbor);
                    stack.push((neighbor, next));
                }
            }
        }

        assert_relative_eq!(found_length, best, epsilon = 1e-9);
    }

    #[test]
    fn self_loops_and_duplicate_links_terminate() {
        let mut graph = TrackGraph::new();
        let a = graph.add_piece(Point2::new(0.0, 0.0), 6);
        let b = graph.add_piece(Point2::new(1.0, 0.0), 6);
        let c = graph.add_piece(Point2::new(2.0, 0.0), 2);
        graph.connect(a, a).unwrap();
        graph.connect(a, b).unwrap();
        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();

        assert_eq!(find_path(&graph, a, c).unwrap(), vec![a, b, c]);
    }

    #[test]
    fn optimal_route_may_start_away_from_goal() {
        // The cheap route's first hop moves away from the goal, so the
        // greedy-looking route gets expanded first and must lose on cost.
        let mut graph = TrackGraph::new();
        let a = graph.add_piece(Point2::new(0.0, 0.0), 4);
        let b = graph.add_piece(Point2::new(0.0, 5.0), 4);
        let c = graph.add_piece(Point2::new(-2.0, 0.0), 4);
        let d = graph.add_piece(Point2::new(5.0, 0.0), 4);
        let goal = graph.add_piece(Point2::new(10.0, 0.0), 4);
        graph.connect(a, b).unwrap();
        graph.connect(b, goal).unwrap();
        graph.connect(a, c).unwrap();
        graph.connect(c, d).unwrap();
        graph.connect(d, goal).unwrap();

        let over_the_top = path_length(&graph, &[a, b, goal]);
        let around = path_length(&graph, &[a, c, d, goal]);
        assert!(around < over_the_top);
        assert_eq!(find_path(&graph, a, goal).unwrap(), vec![a, c, d, goal]);
    }

    #[test]
    fn grid_corner_to_corner_is_manhattan_optimal() {
        // Unit grid: every monotone staircase is optimal, so only the
        // total length is pinned down.
        let (graph, ids) = grid_graph(4);
        let (start, goal) = (ids[0], ids[15]);
        let path = find_path(&graph, start, goal).unwrap();

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 7);
        assert_relative_eq!(path_length(&graph, &path), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn bounded_search_respects_budget() {
        let (graph, ids) = line_graph(6);
        let (start, goal) = (ids[0], ids[5]);

        // One expansion cannot reach the far end.
        assert!(find_path_bounded(&graph, start, goal, 1).unwrap().is_empty());
        // Zero means unbounded.
        assert_eq!(
            find_path_bounded(&graph, start, goal, 0).unwrap(),
            ids.to_vec()
        );
        // A generous budget behaves like the unbounded search.
        assert_eq!(
            find_path_bounded(&graph, start, goal, 100).unwrap(),
            ids.to_vec()
        );
    }

    #[test]
    fn step_reports_expansions_until_found() {
        let (graph, ids) = line_graph(3);
        let mut finder = PathFinder::new(&graph, ids[0], ids[2]).unwrap();

        let mut expansions = 0;
        let path = loop {
            match finder.step() {
                SearchStep::Found(path) => break path,
                SearchStep::Exhausted => panic!("goal is reachable"),
                SearchStep::Expanded => expansions += 1,
            }
        };
        assert_eq!(path, ids.to_vec());
        assert!(expansions >= 2);
    }
}
