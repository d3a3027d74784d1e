use thiserror::Error;

/// Simulator error types.
///
/// I/O failures are fatal; parse failures are policy-configurable (skip or
/// abort); everything else marks a broken internal invariant.
#[derive(Error, Debug)]
pub enum SimError {
    /// I/O error on the trace, swap, or output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed trace line
    #[error("trace line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Enhanced CLOCK ran all four class passes without a victim. Pass two
    /// levels every Referenced bit, so this cannot happen with a well-formed
    /// ring and table.
    #[error("replacement swept all four (R,M) classes without finding a victim")]
    ReplacementExhausted,

    /// Broken internal invariant
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}

pub type Result<T> = std::result::Result<T, SimError>;
