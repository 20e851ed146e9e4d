//! Graph fixtures shared by the railkit test suites.
//!
//! Builders panic on fixture construction errors; they are test-only code.

pub mod graphs;

pub use graphs::{grid_graph, line_graph, two_route_graph};
