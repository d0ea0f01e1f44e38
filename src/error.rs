use thiserror::Error;

/// Errors reported by [`Cursor::current`](crate::Cursor::current).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The traversal has visited every entry.
    #[error("dereference of an exhausted cursor")]
    Exhausted,

    /// The current entry was already taken; the cursor must be advanced
    /// before it can be dereferenced again.
    #[error("cursor dereferenced twice without an intervening advance")]
    Unpositioned,
}

/// Structural problems found by [`BstMap::check`](crate::BstMap::check).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CheckError {
    /// An in-order walk produced a key that was not strictly greater than
    /// its predecessor.
    #[error("keys are out of order at in-order position {position}")]
    OrderViolation { position: usize },

    #[error("map records {recorded} entries but its tree holds {counted}")]
    LenMismatch { recorded: usize, counted: usize },
}
