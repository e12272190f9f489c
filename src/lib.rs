#![warn(clippy::all)]
#![forbid(unsafe_code)]
//!# Docs
//!
//! A Rust implementation of
//! [Fortune's algorithm](https://en.wikipedia.org/wiki/Fortune%27s_algorithm) for computing the
//! [Voronoi diagram](https://en.wikipedia.org/wiki/Voronoi_diagram) of a finite set of points in
//! O(n log n).
//!
//!## Implementation Details
//! The implementation is entirely safe Rust. It never clips or bounds the output: unbounded edges
//! are returned as such (no end vertex on their outward half), leaving clipping to a bounding
//! region as a concern for the caller.
//!
//! The resulting diagram is returned as a
//! [Doubly Connected Edge List](https://en.wikipedia.org/wiki/Doubly_connected_edge_list)
//! containing the faces (one per input site), half-edges and vertices that make up the diagram.
//!
//!## Example Usage
//!
//! ```rust
//! use fortune_voronoi::{compute_voronoi, Point};
//!
//! let sites = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Point::new(2.0, 4.0),
//! ];
//! let diagram = compute_voronoi(&sites).unwrap();
//! assert_eq!(diagram.face_count(), 3);
//! assert_eq!(diagram.vertex_count(), 1);
//! ```
mod algorithm;
mod avl_tree;
mod beachline;
mod diagram;
mod error;
mod event;
mod geometry;
mod queue;
mod typed_index;

pub use algorithm::Algorithm;
pub use diagram::{HalfEdgeIndex, VertexIndex, VoronoiDiagram};
pub use error::VoronoiError;
pub use geometry::Point;

/// Computes the Voronoi diagram of `sites` by running Fortune's sweep to
/// completion.
///
/// # Errors
/// Returns [`VoronoiError::CapacityExceeded`] if the beach line's arc pool
/// — sized `max(2n - 1, 1)` for `n` sites — is exhausted. This should never
/// happen for correctly sized input; encountering it indicates a bug in the
/// pool sizing, not malformed input.
pub fn compute_voronoi(sites: &[Point]) -> Result<VoronoiDiagram, VoronoiError> {
    let mut algorithm = Algorithm::new(sites);
    algorithm.finish()?;
    Ok(algorithm.into_diagram())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_voronoi_on_a_square() {
        let sites = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let diagram = compute_voronoi(&sites).unwrap();
        assert_eq!(diagram.face_count(), 4);
        assert_eq!(diagram.vertex_count(), 1);
    }

    #[test]
    fn compute_voronoi_on_empty_input() {
        let diagram = compute_voronoi(&[]).unwrap();
        assert_eq!(diagram.face_count(), 0);
    }
}
