//! Error types for circuit construction and unitary computation

use thiserror::Error;

/// Result type for cxcheck operations
pub type Result<T> = std::result::Result<T, CxError>;

/// Errors raised when a circuit or matrix does not fit the qubit register
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CxError {
    /// A register needs at least one qubit
    #[error("Invalid qubit count {0}: must be at least 1")]
    InvalidQubitCount(usize),

    /// Dense 2^n x 2^n matrices stop being practical past the cap
    #[error("Qubit count {n} exceeds the dense-matrix limit of {max}")]
    TooManyQubits { n: usize, max: usize },

    /// Control or target index outside [0, n)
    #[error("Invalid {role} qubit {qubit}. Must be in [0, {n})")]
    QubitOutOfRange {
        role: &'static str,
        qubit: usize,
        n: usize,
    },

    #[error("Control and target must be different qubits, both are {0}")]
    SameQubit(usize),

    /// Matrix shape does not match the register
    #[error("Matrix shape {actual:?} does not match expected {expected}x{expected}")]
    DimensionMismatch {
        expected: usize,
        actual: (usize, usize),
    },

    #[error("Basis index {index} out of range for dimension {dim}")]
    BasisIndexOutOfRange { index: usize, dim: usize },

    #[error("Invalid tolerance rtol={rtol}, atol={atol}: must be finite and non-negative")]
    InvalidTolerance { rtol: f64, atol: f64 },
}
