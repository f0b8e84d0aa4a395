use thiserror::Error;

/// Error kinds the core signals. I/O, font loading, and projection
/// failures are external and are not represented here.
#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("invalid input row: {0}")]
    InvalidInput(String),

    #[error("no moveable placeables in Places")]
    EmptyPopulation,

    #[error("energy invariant violated: cached {cached}, recomputed {recomputed}")]
    EnergyInvariantViolation { cached: f64, recomputed: f64 },
}
