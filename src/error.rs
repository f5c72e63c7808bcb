//! Errors raised while loading a map source.
//!
//! Only loading can fail.  Once a `Map` exists, the simulation and the
//! compositor degrade (clamp, skip, no-op) instead of returning errors.

/// Problems found in a textual map grid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The source contained no rows.
    #[error("map source is empty")]
    Empty,

    /// A row's length differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A character outside the map vocabulary.
    #[error("unknown map glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    /// No `P` marker anywhere in the grid.
    #[error("map has no player start marker 'P'")]
    MissingPlayerStart,

    /// More than one `P` marker.
    #[error("second player start marker at ({x}, {y})")]
    DuplicatePlayerStart { x: usize, y: usize },
}
