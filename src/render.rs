//! Text output: circuit diagrams and basis-state listings of a unitary.

use ndarray::Array2;
use num_complex::Complex64;
use std::fmt;
use std::io::{self, Write};

use crate::Circuit;

/// Draws a circuit to a byte sink.
pub trait Render {
    fn render(&self, circuit: &Circuit, out: &mut dyn Write) -> io::Result<()>;
}

/// One column per gate, one wire per qubit with qubit 0 on top.
///
/// ```text
/// q0: ──●──●─────
///       │  │
/// q1: ──⊕──┼──●──
///          │  │
/// q2: ─────⊕──⊕──
/// ```
#[derive(Debug, Clone)]
pub struct TextDiagram {
    pub control: char,
    pub target: char,
}

impl Default for TextDiagram {
    fn default() -> Self {
        TextDiagram {
            control: '●',
            target: '⊕',
        }
    }
}

impl TextDiagram {
    fn wire_cell(&self, q: usize, control: usize, target: usize) -> char {
        let (lo, hi) = (control.min(target), control.max(target));
        if q == control {
            self.control
        } else if q == target {
            self.target
        } else if lo < q && q < hi {
            '┼'
        } else {
            '─'
        }
    }
}

impl Render for TextDiagram {
    fn render(&self, circuit: &Circuit, out: &mut dyn Write) -> io::Result<()> {
        let n = circuit.n();
        let width = format!("q{}:", n - 1).len();

        for q in 0..n {
            let mut wire = format!("{:<width$} ─", format!("q{q}:"));
            for g in circuit {
                wire.push('─');
                wire.push(self.wire_cell(q, g.control, g.target));
                wire.push('─');
            }
            wire.push('─');
            writeln!(out, "{wire}")?;

            if q + 1 == n {
                break;
            }
            // Vertical links between wire q and q + 1.
            let mut link = " ".repeat(width + 2);
            for g in circuit {
                let (lo, hi) = (g.control.min(g.target), g.control.max(g.target));
                link.push(' ');
                link.push(if lo <= q && q < hi { '│' } else { ' ' });
                link.push(' ');
            }
            writeln!(out, "{}", link.trim_end())?;
        }
        Ok(())
    }
}

// ---- Formatting ----

/// Round to `n` significant figures to eliminate floating-point ULP noise.
fn round_sigfigs(x: f64, n: i32) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    let d = x.abs().log10().ceil() as i32;
    let power = 10f64.powi(n - d);
    (x * power).round() / power
}

/// Format a float to always include a decimal point.
fn format_real(x: f64) -> String {
    let x = round_sigfigs(x, 15);
    let s = format!("{}", x);
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        format!("{s}.0")
    } else {
        s
    }
}

/// Format a complex coefficient for display.
/// Returns just the real part if purely real, otherwise the full complex number.
fn qcoef(a: Complex64) -> String {
    let re = round_sigfigs(a.re, 15);
    let im = round_sigfigs(a.im, 15);
    if im.abs() < 1e-8 {
        format_real(re)
    } else {
        format!("{}+{}i", format_real(re), format_real(im))
    }
}

/// Format a single term of a quantum state as "coef|binary>".
fn qterm(i: usize, qi: Complex64, n: usize) -> String {
    format!("{}|{:0>width$b}>", qcoef(qi), i, width = n)
}

/// Lists where each basis state goes: `|k> -> terms of column k`.
pub struct UnitaryTerms<'a> {
    pub u: &'a Array2<Complex64>,
    pub n: usize,
}

impl fmt::Display for UnitaryTerms<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, column) in self.u.columns().into_iter().enumerate() {
            let terms = column
                .iter()
                .enumerate()
                .filter(|(_, qi)| qi.norm() > 1e-8)
                .map(|(i, &qi)| qterm(i, qi, self.n))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "|{:0>width$b}> -> {}", k, terms, width = self.n)?;
        }
        Ok(())
    }
}
