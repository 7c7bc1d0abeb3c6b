//! Dense kernels applying matrices to amplitude buffers
//!
//! The global index convention puts wire w at bit w; the gate-local index
//! uses `wires[0]` as its most significant bit. Kernels are general linear
//! applications, so non-unitary generator matrices (projectors) work too.

use num_complex::Complex64;

/// Apply a row-major 2^k × 2^k matrix to the amplitudes at the given wires
///
/// `wires` may be in any order and need not be adjacent. The matrix is a
/// general linear map; unitarity is not assumed.
pub fn apply_matrix(
    state: &mut [Complex64],
    matrix: &[Complex64],
    wires: &[usize],
) {
    let k = wires.len();
    let dim = 1usize << k;
    debug_assert_eq!(matrix.len(), dim * dim);

    let mut sorted_wires: Vec<usize> = wires.to_vec();
    sorted_wires.sort_unstable();

    let num_groups = state.len() >> k;
    let mut idx = vec![0usize; dim];
    let mut scratch = vec![Complex64::new(0.0, 0.0); dim];

    for group in 0..num_groups {
        // Expand the group counter into a base index with zeros at the wire bits
        let mut base = group;
        for &w in &sorted_wires {
            base = ((base >> w) << (w + 1)) | (base & ((1 << w) - 1));
        }

        // Scatter each gate-local index onto the wire bits
        for (local, slot) in idx.iter_mut().enumerate() {
            let mut p = base;
            for (j, &w) in wires.iter().enumerate() {
                if (local >> (k - 1 - j)) & 1 == 1 {
                    p |= 1 << w;
                }
            }
            *slot = p;
        }

        for (row, out) in scratch.iter_mut().enumerate() {
            let mut acc = Complex64::new(0.0, 0.0);
            for (col, &p) in idx.iter().enumerate() {
                acc += matrix[row * dim + col] * state[p];
            }
            *out = acc;
        }
        for (row, &p) in idx.iter().enumerate() {
            state[p] = scratch[row];
        }
    }
}

/// Multiply amplitudes by one of two phases based on the parity of the wire bits
///
/// Even parity gets `even`, odd parity gets `odd`. This covers MultiRZ
/// (e^(∓iθ/2)) and its generator Z⊗...⊗Z (±1) without materializing the
/// diagonal matrix.
pub fn apply_parity_phase(
    state: &mut [Complex64],
    wires: &[usize],
    even: Complex64,
    odd: Complex64,
) {
    let mut mask = 0usize;
    for &w in wires {
        mask |= 1 << w;
    }
    for (index, amp) in state.iter_mut().enumerate() {
        if (index & mask).count_ones() % 2 == 0 {
            *amp *= even;
        } else {
            *amp *= odd;
        }
    }
}

/// Conjugate transpose of a row-major square matrix
pub fn adjoint_matrix(matrix: &[Complex64], dim: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); dim * dim];
    for r in 0..dim {
        for c in 0..dim {
            out[r * dim + c] = matrix[c * dim + r].conj();
        }
    }
    out
}
