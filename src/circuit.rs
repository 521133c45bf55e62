//! Logical CNOT circuits: an ordered list of (control, target) pairs over a
//! fixed-size register.

use rand::Rng;
use std::fmt;

use crate::render::{Render, TextDiagram};
use crate::{Result, check_pair, dimension};

/// A single controlled-NOT: flips `target` when `control` is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cnot {
    pub control: usize,
    pub target: usize,
}

impl Cnot {
    /// Image of basis index `i` under this gate.
    #[inline]
    pub fn map_index(&self, i: usize) -> usize {
        if crate::bit_is_set(i, self.control) {
            crate::conjugate_index(i, self.target)
        } else {
            i
        }
    }
}

impl fmt::Display for Cnot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cx q{}, q{}", self.control, self.target)
    }
}

/// Gates are applied in insertion order; they do not commute in general.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    n: usize,
    gates: Vec<Cnot>,
}

impl Circuit {
    /// An empty circuit over `n` qubits.
    pub fn new(n: usize) -> Result<Self> {
        dimension(n)?;
        Ok(Circuit {
            n,
            gates: Vec::new(),
        })
    }

    /// Entangle every qubit with every later one: CNOT(i, j) for all
    /// 0 <= i < j < n, in lexicographic order.
    pub fn fully_connected(n: usize) -> Result<Self> {
        let mut qc = Circuit::new(n)?;
        for i in 0..n {
            for j in (i + 1)..n {
                qc.push(i, j)?;
            }
        }
        Ok(qc)
    }

    /// `len` CNOTs on uniformly chosen distinct qubit pairs, in either
    /// direction. A single-qubit register has no valid pair, so the result
    /// is empty.
    pub fn random(n: usize, len: usize, rng: &mut impl Rng) -> Result<Self> {
        let mut qc = Circuit::new(n)?;
        if n < 2 {
            return Ok(qc);
        }
        for _ in 0..len {
            let control = rng.gen_range(0..n);
            // Draw from the n - 1 remaining qubits and skip over the control.
            let mut target = rng.gen_range(0..n - 1);
            if target >= control {
                target += 1;
            }
            qc.push(control, target)?;
        }
        Ok(qc)
    }

    /// Append a CNOT, rejecting indices outside the register.
    pub fn push(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        check_pair(self.n, control, target)?;
        self.gates.push(Cnot { control, target });
        Ok(self)
    }

    /// Number of qubits in the register.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn gates(&self) -> &[Cnot] {
        &self.gates
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cnot> {
        self.gates.iter()
    }

    /// Image of basis index `i` under the whole circuit.
    pub fn map_index(&self, i: usize) -> usize {
        self.gates.iter().fold(i, |acc, g| g.map_index(acc))
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Cnot;
    type IntoIter = std::slice::Iter<'a, Cnot>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

/// Renders the text diagram.
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        TextDiagram::default()
            .render(self, &mut buf)
            .map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CxError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fully_connected_order() {
        let qc = Circuit::fully_connected(4).unwrap();
        let pairs: Vec<(usize, usize)> = qc.iter().map(|g| (g.control, g.target)).collect();
        assert_eq!(
            pairs,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_fully_connected_gate_count() {
        for n in 1..=6 {
            let qc = Circuit::fully_connected(n).unwrap();
            assert_eq!(qc.len(), n * (n - 1) / 2);
            assert_eq!(qc.n(), n);
        }
    }

    #[test]
    fn test_single_qubit_is_empty() {
        let qc = Circuit::fully_connected(1).unwrap();
        assert!(qc.is_empty());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert_eq!(
            Circuit::fully_connected(0),
            Err(CxError::InvalidQubitCount(0))
        );
    }

    #[test]
    fn test_push_rejects_bad_indices() {
        let mut qc = Circuit::new(3).unwrap();
        assert!(qc.push(0, 3).is_err());
        assert!(qc.push(5, 0).is_err());
        assert_eq!(qc.push(2, 2).unwrap_err(), CxError::SameQubit(2));
        assert!(qc.is_empty());
        qc.push(2, 0).unwrap().push(0, 1).unwrap();
        assert_eq!(qc.len(), 2);
    }

    #[test]
    fn test_random_circuit_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        let qc = Circuit::random(5, 50, &mut rng).unwrap();
        assert_eq!(qc.len(), 50);
        for g in &qc {
            assert!(g.control < 5 && g.target < 5);
            assert_ne!(g.control, g.target);
        }
    }

    #[test]
    fn test_random_single_qubit_is_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(Circuit::random(1, 10, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_map_index() {
        // CNOT(0, 1) on |01> (bit 0 set) -> |11>
        let g = Cnot { control: 0, target: 1 };
        assert_eq!(g.map_index(0b01), 0b11);
        assert_eq!(g.map_index(0b11), 0b01);
        assert_eq!(g.map_index(0b10), 0b10);
        assert_eq!(g.map_index(0b00), 0b00);

        // Order matters: CNOT(0,1) then CNOT(1,0) differs from the reverse.
        let mut ab = Circuit::new(2).unwrap();
        ab.push(0, 1).unwrap().push(1, 0).unwrap();
        let mut ba = Circuit::new(2).unwrap();
        ba.push(1, 0).unwrap().push(0, 1).unwrap();
        assert_eq!(ab.map_index(0b01), 0b10);
        assert_eq!(ba.map_index(0b01), 0b11);
    }

    #[test]
    fn test_gate_display() {
        let g = Cnot { control: 2, target: 0 };
        assert_eq!(g.to_string(), "cx q2, q0");
    }
}
