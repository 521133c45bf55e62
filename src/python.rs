// PyO3 Python bindings for cxcheck
//
// - fully_connected(n) -> list of (control, target) pairs
// - permutation_unitary(n) / reference_unitary(n, oracle) -> nested lists
// - compare_results(n, rtol, atol, oracle) -> bool
// - draw(n) -> circuit diagram string

use num_complex::Complex64;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::{
    Circuit, CxError, KronOracle, StateVectorOracle, Tolerance, UnitaryOracle,
    compare_results as rust_compare_results, permutation_unitary as rust_permutation_unitary,
};

fn value_error(err: CxError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn oracle_by_name(name: &str) -> PyResult<&'static dyn UnitaryOracle> {
    match name {
        "kron" => Ok(&KronOracle),
        "statevector" => Ok(&StateVectorOracle),
        other => Err(PyValueError::new_err(format!(
            "Unknown oracle '{other}'. Valid: kron, statevector"
        ))),
    }
}

fn circuit(n: usize) -> PyResult<Circuit> {
    Circuit::fully_connected(n).map_err(value_error)
}

fn to_rows(u: ndarray::Array2<Complex64>) -> Vec<Vec<Complex64>> {
    u.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// (control, target) pairs of the fully connected CNOT circuit
#[pyfunction]
fn fully_connected(n: usize) -> PyResult<Vec<(usize, usize)>> {
    Ok(circuit(n)?
        .iter()
        .map(|g| (g.control, g.target))
        .collect())
}

/// Unitary of the fully connected circuit, built by row permutation
#[pyfunction]
fn permutation_unitary(n: usize) -> PyResult<Vec<Vec<Complex64>>> {
    let u = rust_permutation_unitary(&circuit(n)?).map_err(value_error)?;
    Ok(to_rows(u))
}

/// Unitary of the fully connected circuit from a reference oracle
#[pyfunction]
#[pyo3(signature = (n, oracle="statevector"))]
fn reference_unitary(n: usize, oracle: &str) -> PyResult<Vec<Vec<Complex64>>> {
    let u = oracle_by_name(oracle)?
        .unitary(&circuit(n)?)
        .map_err(value_error)?;
    Ok(to_rows(u))
}

/// True when the permutation and reference unitaries agree
#[pyfunction]
#[pyo3(signature = (n, rtol=1e-5, atol=1e-8, oracle="statevector"))]
fn compare_results(n: usize, rtol: f64, atol: f64, oracle: &str) -> PyResult<bool> {
    let tol = Tolerance::new(rtol, atol).map_err(value_error)?;
    let report =
        rust_compare_results(&circuit(n)?, oracle_by_name(oracle)?, tol).map_err(value_error)?;
    Ok(report.passed())
}

/// Text diagram of the fully connected circuit
#[pyfunction]
fn draw(n: usize) -> PyResult<String> {
    Ok(circuit(n)?.to_string())
}

/// Python module definition
#[pymodule]
fn cxcheck(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(fully_connected, m)?)?;
    m.add_function(wrap_pyfunction!(permutation_unitary, m)?)?;
    m.add_function(wrap_pyfunction!(reference_unitary, m)?)?;
    m.add_function(wrap_pyfunction!(compare_results, m)?)?;
    m.add_function(wrap_pyfunction!(draw, m)?)?;
    Ok(())
}
