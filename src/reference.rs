//! Reference unitaries computed without row permutation.
//!
//! Two independent oracles sit behind [`UnitaryOracle`]:
//!
//! - [`KronOracle`] expands every CNOT into a full 2^n x 2^n operator with
//!   Kronecker products and multiplies them together.
//! - [`StateVectorOracle`] pushes every basis state through the circuit on a
//!   state-vector register; column `k` of the unitary is the evolved |k>.
//!
//! Both use the little-endian convention: qubit `k` is bit `k` of the basis
//! index.

use ndarray::linalg::kron;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, debug_span};

use crate::{
    CNOT_GATE, Circuit, CxError, I_GATE, ONE, P0_GATE, P1_GATE, Result, X_GATE, check_pair,
    conjugate_index, dimension, identity,
};

/// Source of a dense circuit unitary, used as ground truth.
pub trait UnitaryOracle {
    /// Short name for reports and logs.
    fn name(&self) -> &'static str;

    /// Dense unitary of `circuit`.
    fn unitary(&self, circuit: &Circuit) -> Result<Array2<Complex64>>;
}

/// Reference unitary from the default oracle.
pub fn compute_reference_unitary(circuit: &Circuit) -> Result<Array2<Complex64>> {
    StateVectorOracle.unitary(circuit)
}

// ---- Kronecker Product ----

/// Tensor product of one 2x2 factor per qubit, qubit `n - 1` leftmost.
fn kron_chain<'a>(n: usize, factor: impl Fn(usize) -> &'a Array2<Complex64>) -> Array2<Complex64> {
    let mut acc = Array2::from_elem((1, 1), ONE);
    for q in (0..n).rev() {
        acc = kron(&acc, factor(q));
    }
    acc
}

/// Full-register CNOT: |0><0|_c (x) I + |1><1|_c (x) X_t.
pub fn embed_cnot(n: usize, control: usize, target: usize) -> Result<Array2<Complex64>> {
    dimension(n)?;
    check_pair(n, control, target)?;

    let idle = kron_chain(n, |q| if q == control { &*P0_GATE } else { &*I_GATE });
    let active = kron_chain(n, |q| {
        if q == control {
            &*P1_GATE
        } else if q == target {
            &*X_GATE
        } else {
            &*I_GATE
        }
    });
    Ok(idle + active)
}

/// Multiplies Kronecker-expanded gates.
#[derive(Debug, Default, Clone, Copy)]
pub struct KronOracle;

impl UnitaryOracle for KronOracle {
    fn name(&self) -> &'static str {
        "kron"
    }

    fn unitary(&self, circuit: &Circuit) -> Result<Array2<Complex64>> {
        let n = circuit.n();
        let _span = debug_span!("kron_unitary", n, gates = circuit.len()).entered();

        let mut u = identity(n)?;
        for gate in circuit {
            debug!(control = gate.control, target = gate.target, "kron cnot");
            u = embed_cnot(n, gate.control, gate.target)?.dot(&u);
        }
        Ok(u)
    }
}

// ---- Quantum Register ----

/// Dense state vector over `n` qubits. Only built through [`QReg::basis`],
/// so `v.len() == 2^n` always holds.
#[derive(Clone, Debug)]
pub struct QReg {
    v: Array1<Complex64>,
    n: usize,
}

impl QReg {
    /// The computational basis state |index>.
    pub fn basis(n: usize, index: usize) -> Result<Self> {
        let dim = dimension(n)?;
        if index >= dim {
            return Err(CxError::BasisIndexOutOfRange { index, dim });
        }
        let mut v = Array1::zeros(dim);
        v[index] = ONE;
        Ok(QReg { v, n })
    }

    /// Number of qubits in the register.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Amplitudes indexed by basis state.
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.v
    }

    /// Apply a two-qubit gate matrix to the control and target qubits.
    ///
    /// Indices are grouped in fours, (i, i^t, i^c, i^c^t), visiting each
    /// group once from its smallest member.
    pub fn apply2q(
        &mut self,
        m: &Array2<Complex64>,
        control: usize,
        target: usize,
    ) -> Result<&mut Self> {
        check_pair(self.n, control, target)?;
        if m.dim() != (4, 4) {
            return Err(CxError::DimensionMismatch {
                expected: 4,
                actual: m.dim(),
            });
        }

        let mv: [[Complex64; 4]; 4] = [
            [m[[0, 0]], m[[0, 1]], m[[0, 2]], m[[0, 3]]],
            [m[[1, 0]], m[[1, 1]], m[[1, 2]], m[[1, 3]]],
            [m[[2, 0]], m[[2, 1]], m[[2, 2]], m[[2, 3]]],
            [m[[3, 0]], m[[3, 1]], m[[3, 2]], m[[3, 3]]],
        ];
        for i in 0..self.v.len() {
            let j = conjugate_index(i, target);
            if i > j {
                continue;
            }
            let k = conjugate_index(i, control);
            if i > k {
                continue;
            }
            let l = conjugate_index(j, control);

            let (qi, qj, qk, ql) = (self.v[i], self.v[j], self.v[k], self.v[l]);
            if qi.norm() + qj.norm() + qk.norm() + ql.norm() < 1e-8 {
                continue;
            }
            self.v[i] = mv[0][0] * qi + mv[0][1] * qj + mv[0][2] * qk + mv[0][3] * ql;
            self.v[j] = mv[1][0] * qi + mv[1][1] * qj + mv[1][2] * qk + mv[1][3] * ql;
            self.v[k] = mv[2][0] * qi + mv[2][1] * qj + mv[2][2] * qk + mv[2][3] * ql;
            self.v[l] = mv[3][0] * qi + mv[3][1] * qj + mv[3][2] * qk + mv[3][3] * ql;
        }
        Ok(self)
    }

    /// Apply controlled-NOT gate.
    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.apply2q(&CNOT_GATE, control, target)
    }
}

/// Simulates each basis state through the circuit.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateVectorOracle;

impl UnitaryOracle for StateVectorOracle {
    fn name(&self) -> &'static str {
        "statevector"
    }

    fn unitary(&self, circuit: &Circuit) -> Result<Array2<Complex64>> {
        let n = circuit.n();
        let dim = dimension(n)?;
        let _span = debug_span!("statevector_unitary", n, gates = circuit.len()).entered();

        let mut u = Array2::zeros((dim, dim));
        for k in 0..dim {
            let mut q = QReg::basis(n, k)?;
            for gate in circuit {
                q.cnot(gate.control, gate.target)?;
            }
            u.column_mut(k).assign(q.amplitudes());
        }
        Ok(u)
    }
}
