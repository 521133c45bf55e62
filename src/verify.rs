//! One verification pass: compute a circuit's unitary by row permutation
//! and by a reference oracle, then compare.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{info, info_span, warn};

use crate::{
    Circuit, Result, Tolerance, UnitaryOracle, allclose, is_unitary, max_deviation,
    permutation_unitary,
};

/// Tolerance for the `U U^dagger = I` check on the permutation result.
const UNITARITY_TOL: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub n: usize,
    pub gates: usize,
    pub oracle: &'static str,
    pub matched: bool,
    /// Whether the permutation result is unitary.
    pub unitary: bool,
    pub max_deviation: f64,
    pub reference_time: Duration,
    pub permutation_time: Duration,
}

impl VerifyReport {
    /// Match against the reference and unitarity both hold.
    pub fn passed(&self) -> bool {
        self.matched && self.unitary
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:2} qubits ({:>3} CNOTs): {} vs permutation {}, unitary {}, max |dU| {:.2e} \
             ({} {:>8.2?}, permutation {:>8.2?})",
            self.n,
            self.gates,
            self.oracle,
            if self.matched { "MATCH" } else { "MISMATCH" },
            if self.unitary { "yes" } else { "NO" },
            self.max_deviation,
            self.oracle,
            self.reference_time,
            self.permutation_time,
        )
    }
}

/// Compare the reference unitary of `circuit` against the row-permutation
/// unitary.
pub fn compare_results(
    circuit: &Circuit,
    oracle: &dyn UnitaryOracle,
    tol: Tolerance,
) -> Result<VerifyReport> {
    let n = circuit.n();
    let _span = info_span!("compare_results", n, oracle = oracle.name()).entered();

    let t0 = Instant::now();
    let reference = oracle.unitary(circuit)?;
    let reference_time = t0.elapsed();

    let t0 = Instant::now();
    let permuted = permutation_unitary(circuit)?;
    let permutation_time = t0.elapsed();

    let matched = allclose(&permuted, &reference, tol);
    let unitary = is_unitary(&permuted, UNITARITY_TOL);
    // An oracle may hand back any shape; a shape mismatch counts as infinite deviation.
    let max_deviation = max_deviation(&permuted, &reference).unwrap_or(f64::INFINITY);

    let report = VerifyReport {
        n,
        gates: circuit.len(),
        oracle: oracle.name(),
        matched,
        unitary,
        max_deviation,
        reference_time,
        permutation_time,
    };
    if report.passed() {
        info!(gates = report.gates, max_deviation, "unitaries match");
    } else {
        warn!(gates = report.gates, max_deviation, matched, unitary, "unitaries differ");
    }
    Ok(report)
}

/// Build the fully connected circuit over `n` qubits and verify it.
pub fn verify_fully_connected(
    n: usize,
    oracle: &dyn UnitaryOracle,
    tol: Tolerance,
) -> Result<VerifyReport> {
    let circuit = Circuit::fully_connected(n)?;
    compare_results(&circuit, oracle, tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CxError, KronOracle, StateVectorOracle, identity};
    use ndarray::Array2;
    use num_complex::Complex64;

    /// Oracle that returns a fixed matrix regardless of the circuit.
    struct FixedOracle(Array2<Complex64>);

    impl UnitaryOracle for FixedOracle {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn unitary(&self, _circuit: &Circuit) -> Result<Array2<Complex64>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_fully_connected_matches_both_oracles() {
        for n in 1..=6 {
            for oracle in [&KronOracle as &dyn UnitaryOracle, &StateVectorOracle] {
                let report = verify_fully_connected(n, oracle, Tolerance::default()).unwrap();
                assert!(report.passed(), "n = {n}, oracle = {}", oracle.name());
                assert_eq!(report.max_deviation, 0.0);
                assert_eq!(report.gates, n * (n - 1) / 2);
            }
        }
    }

    #[test]
    fn test_single_qubit_matches_identity_stub() {
        let oracle = FixedOracle(identity(1).unwrap());
        let report = verify_fully_connected(1, &oracle, Tolerance::default()).unwrap();
        assert!(report.matched);
        assert_eq!(report.oracle, "fixed");
    }

    #[test]
    fn test_identity_stub_disagrees_for_two_qubits() {
        let oracle = FixedOracle(identity(2).unwrap());
        let report = verify_fully_connected(2, &oracle, Tolerance::default()).unwrap();
        assert!(!report.matched);
        assert!(report.unitary);
        assert!(!report.passed());
        assert_eq!(report.max_deviation, 1.0);
    }

    #[test]
    fn test_wrong_shape_stub_is_a_mismatch() {
        let oracle = FixedOracle(identity(3).unwrap());
        let report = verify_fully_connected(2, &oracle, Tolerance::default()).unwrap();
        assert!(!report.matched);
        assert!(report.max_deviation.is_infinite());
    }

    #[test]
    fn test_invalid_qubit_count() {
        let err = verify_fully_connected(0, &KronOracle, Tolerance::default()).unwrap_err();
        assert_eq!(err, CxError::InvalidQubitCount(0));
    }

    #[test]
    fn test_report_display() {
        let report = verify_fully_connected(2, &KronOracle, Tolerance::default()).unwrap();
        let line = report.to_string();
        assert!(line.starts_with(" 2 qubits (  1 CNOTs): kron vs permutation MATCH"));
        assert!(line.contains("unitary yes"));
    }
}
