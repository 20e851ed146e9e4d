//! A* path search over a track-piece connectivity graph.
//!
//! Finds the shortest chain of physically linked pieces between two pieces.
//! Edge cost is the straight-line distance between piece centers, and the
//! heuristic is the straight-line distance to the goal, which never exceeds
//! the true connection-path distance, so the returned path is cost-optimal.
//!
//! # Usage
//!
//! ```
//! use nalgebra::Point2;
//! use railkit_core::TrackGraph;
//! use railkit_route::find_path;
//!
//! let mut graph = TrackGraph::new();
//! let a = graph.add_piece(Point2::new(0.0, 0.0), 2);
//! let b = graph.add_piece(Point2::new(1.0, 0.0), 2);
//! graph.connect(a, b).unwrap();
//!
//! let path = find_path(&graph, a, b).unwrap();
//! assert_eq!(path, vec![a, b]);
//! ```
//!
//! All search state lives in a per-query [`PathFinder`]; queries are
//! independent and safe to run from multiple threads over a shared graph.

pub mod finder;
pub mod node;

pub use finder::{find_path, find_path_bounded, PathFinder, SearchStep};
