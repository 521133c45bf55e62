//! Circuit unitaries built by permuting rows of the identity.
//!
//! A CNOT is a permutation matrix, so left-multiplying by it is the same as
//! exchanging the rows of every basis pair it swaps. For an `n`-qubit
//! register that is 2^(n-2) row exchanges per gate instead of a dense
//! 2^n x 2^n product with a Kronecker-expanded gate.

use ndarray::{Array2, Zip, s};
use num_complex::Complex64;
use tracing::{debug, debug_span};

use crate::{Circuit, Result, bit_is_set, check_pair, check_shape, conjugate_index, identity};

/// Apply CNOT(`control`, `target`) to `u` in place by swapping rows.
///
/// Every index `i` with the control bit set is paired with
/// `j = i ^ (1 << target)`; both members of the pair have the control bit
/// set, so only the `i < j` visit performs the exchange. Swapping from both
/// ends would undo the first swap.
pub fn apply_cnot(
    u: &mut Array2<Complex64>,
    n: usize,
    control: usize,
    target: usize,
) -> Result<()> {
    let dim = check_shape(u, n)?;
    check_pair(n, control, target)?;

    for i in 0..dim {
        if !bit_is_set(i, control) {
            continue;
        }
        let j = conjugate_index(i, target);
        if i > j {
            continue;
        }
        let (row_i, row_j) = u.multi_slice_mut((s![i, ..], s![j, ..]));
        Zip::from(row_i)
            .and(row_j)
            .for_each(|a, b| std::mem::swap(a, b));
    }
    Ok(())
}

/// Unitary of `circuit`, starting from the identity and applying each gate
/// in order.
pub fn permutation_unitary(circuit: &Circuit) -> Result<Array2<Complex64>> {
    let n = circuit.n();
    let _span = debug_span!("permutation_unitary", n, gates = circuit.len()).entered();

    let mut u = identity(n)?;
    for gate in circuit {
        debug!(control = gate.control, target = gate.target, "row-permute cnot");
        apply_cnot(&mut u, n, gate.control, gate.target)?;
    }
    Ok(u)
}

/// For a permutation matrix, the image of each basis state: `map[k]` is the
/// row holding the single 1 in column `k`. Returns `None` when `u` is not a
/// square 0/1 permutation matrix.
pub fn basis_map(u: &Array2<Complex64>) -> Option<Vec<usize>> {
    let (rows, cols) = u.dim();
    if rows != cols {
        return None;
    }
    let mut seen = vec![false; rows];
    let mut map = Vec::with_capacity(cols);
    for column in u.columns() {
        let mut image = None;
        for (row, v) in column.iter().enumerate() {
            if v.norm() < 1e-8 {
                continue;
            }
            if (v - crate::ONE).norm() > 1e-8 || image.is_some() {
                return None;
            }
            image = Some(row);
        }
        let row = image?;
        if seen[row] {
            return None;
        }
        seen[row] = true;
        map.push(row);
    }
    Some(map)
}
