use thiserror::Error;

/// Errors raised by matrix arithmetic and network construction.
///
/// Every variant describes a caller error; none of them is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NnError {
    /// Operand dimensions violate the precondition of `op`.
    #[error("shape mismatch in {op}: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A required matrix operand was not supplied.
    #[error("missing operand in {op}")]
    MissingOperand { op: &'static str },

    /// A matrix or network dimension was zero.
    #[error("invalid topology: {what} must be positive")]
    InvalidTopology { what: &'static str },
}

pub type Result<T> = std::result::Result<T, NnError>;
