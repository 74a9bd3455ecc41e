use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena capacity must be positive")]
    InvalidCapacity,

    #[error("arena of {capacity} nodes does not fit in the address space")]
    CapacityOverflow { capacity: usize },

    #[error("arena exhausted: all {capacity} nodes allocated")]
    ArenaExhausted { capacity: usize },

    #[error("invalid handle {index}: only {len} nodes allocated")]
    InvalidHandle { index: usize, len: usize },
}
