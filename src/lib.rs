// cxcheck - CNOT circuit unitaries by direct row permutation
// Cross-checked against Kronecker-product and state-vector references.

use ndarray::{Array2, array};
use num_complex::Complex64;
use std::sync::LazyLock;

pub mod circuit;
pub mod compare;
pub mod error;
pub mod permute;
pub mod reference;
pub mod render;
pub mod verify;

pub use circuit::{Circuit, Cnot};
pub use compare::{Tolerance, allclose, is_unitary, max_deviation};
pub use error::{CxError, Result};
pub use permute::{apply_cnot, basis_map, permutation_unitary};
pub use reference::{
    KronOracle, QReg, StateVectorOracle, UnitaryOracle, compute_reference_unitary,
};
pub use render::{Render, TextDiagram, UnitaryTerms};
pub use verify::{VerifyReport, compare_results, verify_fully_connected};

/// Largest register for which dense 2^n x 2^n matrices are built.
pub const MAX_QUBITS: usize = 12;

// ---- Complex Constants ----

pub(crate) const ZERO: Complex64 = Complex64::new(0.0, 0.0);
pub(crate) const ONE: Complex64 = Complex64::new(1.0, 0.0);

// ---- Utility Functions ----

/// Flip bit `b` in index `i` using XOR.
pub fn conjugate_index(i: usize, b: usize) -> usize {
    i ^ (1 << b)
}

/// Test whether bit `b` of index `i` is set.
#[inline]
pub fn bit_is_set(i: usize, b: usize) -> bool {
    (i >> b) & 1 == 1
}

/// Size of the state space spanned by `n` qubits, validating `n`.
pub fn dimension(n: usize) -> Result<usize> {
    if n == 0 {
        return Err(CxError::InvalidQubitCount(n));
    }
    if n > MAX_QUBITS {
        return Err(CxError::TooManyQubits { n, max: MAX_QUBITS });
    }
    Ok(1 << n)
}

/// Validate a (control, target) pair against an `n`-qubit register.
pub(crate) fn check_pair(n: usize, control: usize, target: usize) -> Result<()> {
    if control >= n {
        return Err(CxError::QubitOutOfRange {
            role: "control",
            qubit: control,
            n,
        });
    }
    if target >= n {
        return Err(CxError::QubitOutOfRange {
            role: "target",
            qubit: target,
            n,
        });
    }
    if control == target {
        return Err(CxError::SameQubit(control));
    }
    Ok(())
}

/// Validate that `m` is a square matrix over the `n`-qubit basis.
pub(crate) fn check_shape(m: &Array2<Complex64>, n: usize) -> Result<usize> {
    let dim = dimension(n)?;
    if m.dim() != (dim, dim) {
        return Err(CxError::DimensionMismatch {
            expected: dim,
            actual: m.dim(),
        });
    }
    Ok(dim)
}

/// The 2^n x 2^n identity.
pub fn identity(n: usize) -> Result<Array2<Complex64>> {
    let dim = dimension(n)?;
    Ok(Array2::from_diag_elem(dim, ONE))
}

// ---- Gate Matrices ----

pub static I_GATE: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![[ONE, ZERO], [ZERO, ONE]]
});

pub static X_GATE: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![[ZERO, ONE], [ONE, ZERO]]
});

/// |0><0|
pub static P0_GATE: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![[ONE, ZERO], [ZERO, ZERO]]
});

/// |1><1|
pub static P1_GATE: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![[ZERO, ZERO], [ZERO, ONE]]
});

/// Two-qubit CNOT in (control, target) local ordering, as consumed by
/// [`QReg::apply2q`].
pub static CNOT_GATE: LazyLock<Array2<Complex64>> = LazyLock::new(|| {
    array![
        [ONE,  ZERO, ZERO, ZERO],
        [ZERO, ONE,  ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE ],
        [ZERO, ZERO, ONE,  ZERO]
    ]
});

// ---- Python Bindings ----

#[cfg(feature = "pyo3")]
mod python;

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjugate_index() {
        assert_eq!(conjugate_index(0, 0), 1); // |0> -> |1>
        assert_eq!(conjugate_index(1, 0), 0); // |1> -> |0>
        assert_eq!(conjugate_index(2, 1), 0); // |10> -> |00>
    }

    #[test]
    fn test_bit_is_set() {
        assert!(bit_is_set(0b101, 0));
        assert!(!bit_is_set(0b101, 1));
        assert!(bit_is_set(0b101, 2));
    }

    #[test]
    fn test_dimension() {
        assert_eq!(dimension(1), Ok(2));
        assert_eq!(dimension(5), Ok(32));
        assert_eq!(dimension(0), Err(CxError::InvalidQubitCount(0)));
        assert_eq!(
            dimension(MAX_QUBITS + 1),
            Err(CxError::TooManyQubits {
                n: MAX_QUBITS + 1,
                max: MAX_QUBITS
            })
        );
    }

    #[test]
    fn test_check_pair() {
        assert!(check_pair(3, 0, 2).is_ok());
        assert!(check_pair(3, 2, 0).is_ok());
        assert_eq!(
            check_pair(3, 3, 0),
            Err(CxError::QubitOutOfRange {
                role: "control",
                qubit: 3,
                n: 3
            })
        );
        assert_eq!(
            check_pair(3, 0, 7),
            Err(CxError::QubitOutOfRange {
                role: "target",
                qubit: 7,
                n: 3
            })
        );
        assert_eq!(check_pair(3, 1, 1), Err(CxError::SameQubit(1)));
    }

    #[test]
    fn test_check_shape() {
        let m = Array2::<Complex64>::zeros((4, 4));
        assert_eq!(check_shape(&m, 2), Ok(4));
        assert_eq!(
            check_shape(&m, 3),
            Err(CxError::DimensionMismatch {
                expected: 8,
                actual: (4, 4)
            })
        );
    }

    #[test]
    fn test_identity() {
        let id = identity(2).unwrap();
        assert_eq!(id.dim(), (4, 4));
        for ((r, c), v) in id.indexed_iter() {
            let expected = if r == c { ONE } else { ZERO };
            assert_eq!(*v, expected);
        }
        assert!(identity(0).is_err());
    }

    #[test]
    fn test_projectors_sum_to_identity() {
        let sum = &*P0_GATE + &*P1_GATE;
        assert_eq!(sum, *I_GATE);
    }
}
