use thiserror::Error;

/// The one way the sweepline can fail: the beach line's arc pool, sized
/// `max(2n - 1, 1)` for `n` sites, has no free slots left. This should never
/// happen for a correctly sized pool; it exists so a miscounted site set
/// produces an error instead of an out-of-bounds panic.
#[derive(Debug, Error, PartialEq)]
pub enum VoronoiError {
    #[error("beach line exceeded its capacity of {max_arcs} concurrent arcs")]
    CapacityExceeded { max_arcs: usize },
}
