//! Gate matrices: fixed gates, parametric builders and generator matrices
//!
//! All matrices are row-major `Complex64` slices. For a k-wire gate the
//! local basis index is built with `wires[0]` as the most significant bit.
//! Parametric builders follow the convention U(θ) = exp(−iθ/2·G) for
//! rotation-like gates and U(θ) = exp(iθ·P) for phase shifts.

use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

// Fixed single-qubit gates (2x2, row-major)

/// Identity
pub const IDENTITY: [Complex64; 4] = [ONE, ZERO, ZERO, ONE];

/// Pauli-X
/// X = [[0, 1],
///      [1, 0]]
pub const PAULI_X: [Complex64; 4] = [ZERO, ONE, ONE, ZERO];

/// Pauli-Y
/// Y = [[0, -i],
///      [i,  0]]
pub const PAULI_Y: [Complex64; 4] = [ZERO, NEG_I, I, ZERO];

/// Pauli-Z
/// Z = [[1,  0],
///      [0, -1]]
pub const PAULI_Z: [Complex64; 4] = [ONE, ZERO, ZERO, NEG_ONE];

/// Hadamard
pub const HADAMARD: [Complex64; 4] = [
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(INV_SQRT2, 0.0),
    Complex64::new(-INV_SQRT2, 0.0),
];

/// S gate (phase gate, √Z)
pub const S_GATE: [Complex64; 4] = [ONE, ZERO, ZERO, I];

/// T gate (π/8 gate); T[1][1] = e^(iπ/4) = (1+i)/√2
pub const T_GATE: [Complex64; 4] = [ONE, ZERO, ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)];

// Fixed two-qubit gates (4x4, row-major; wires[0] is the control where applicable)

/// CNOT with wires[0] as control
pub const CNOT: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO, //
    ZERO, ONE, ZERO, ZERO, //
    ZERO, ZERO, ZERO, ONE, //
    ZERO, ZERO, ONE, ZERO,
];

/// Controlled-Z
pub const CZ: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO, //
    ZERO, ONE, ZERO, ZERO, //
    ZERO, ZERO, ONE, ZERO, //
    ZERO, ZERO, ZERO, NEG_ONE,
];

/// SWAP
pub const SWAP: [Complex64; 16] = [
    ONE, ZERO, ZERO, ZERO, //
    ZERO, ZERO, ONE, ZERO, //
    ZERO, ONE, ZERO, ZERO, //
    ZERO, ZERO, ZERO, ONE,
];

/// Toffoli (CCNOT): identity with the |110⟩/|111⟩ rows exchanged
pub fn toffoli() -> Vec<Complex64> {
    let mut m = identity_matrix(8);
    m.swap(6 * 8 + 6, 6 * 8 + 7);
    m.swap(7 * 8 + 7, 7 * 8 + 6);
    m
}

/// CSWAP (Fredkin): identity with the |101⟩/|110⟩ rows exchanged
pub fn cswap() -> Vec<Complex64> {
    let mut m = identity_matrix(8);
    m.swap(5 * 8 + 5, 5 * 8 + 6);
    m.swap(6 * 8 + 6, 6 * 8 + 5);
    m
}

/// Row-major identity of a given dimension
pub fn identity_matrix(dim: usize) -> Vec<Complex64> {
    let mut m = vec![ZERO; dim * dim];
    for i in 0..dim {
        m[i * dim + i] = ONE;
    }
    m
}

// Parametric gates

/// RX(θ) = exp(−iθ/2·X)
pub fn rx(theta: f64) -> Vec<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    let ms = Complex64::new(0.0, -s);
    vec![Complex64::new(c, 0.0), ms, ms, Complex64::new(c, 0.0)]
}

/// RY(θ) = exp(−iθ/2·Y)
pub fn ry(theta: f64) -> Vec<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    vec![
        Complex64::new(c, 0.0),
        Complex64::new(-s, 0.0),
        Complex64::new(s, 0.0),
        Complex64::new(c, 0.0),
    ]
}

/// RZ(θ) = exp(−iθ/2·Z) = diag(e^(−iθ/2), e^(iθ/2))
pub fn rz(theta: f64) -> Vec<Complex64> {
    vec![phase(-theta / 2.0), ZERO, ZERO, phase(theta / 2.0)]
}

/// PhaseShift(θ) = diag(1, e^(iθ))
pub fn phase_shift(theta: f64) -> Vec<Complex64> {
    vec![ONE, ZERO, ZERO, phase(theta)]
}

/// CRX(θ): RX(θ) on the target when the control is |1⟩
pub fn crx(theta: f64) -> Vec<Complex64> {
    controlled(&rx(theta))
}

/// CRY(θ)
pub fn cry(theta: f64) -> Vec<Complex64> {
    controlled(&ry(theta))
}

/// CRZ(θ)
pub fn crz(theta: f64) -> Vec<Complex64> {
    controlled(&rz(theta))
}

/// ControlledPhaseShift(θ) = diag(1, 1, 1, e^(iθ))
pub fn controlled_phase_shift(theta: f64) -> Vec<Complex64> {
    controlled(&phase_shift(theta))
}

/// IsingXX(θ) = exp(−iθ/2·X⊗X)
pub fn ising_xx(theta: f64) -> Vec<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    let c = Complex64::new(c, 0.0);
    let ms = Complex64::new(0.0, -s);
    vec![
        c, ZERO, ZERO, ms, //
        ZERO, c, ms, ZERO, //
        ZERO, ms, c, ZERO, //
        ms, ZERO, ZERO, c,
    ]
}

/// IsingYY(θ) = exp(−iθ/2·Y⊗Y)
pub fn ising_yy(theta: f64) -> Vec<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    let c = Complex64::new(c, 0.0);
    let ms = Complex64::new(0.0, -s);
    let ps = Complex64::new(0.0, s);
    vec![
        c, ZERO, ZERO, ps, //
        ZERO, c, ms, ZERO, //
        ZERO, ms, c, ZERO, //
        ps, ZERO, ZERO, c,
    ]
}

/// IsingZZ(θ) = exp(−iθ/2·Z⊗Z) = diag(e^(−iθ/2), e^(iθ/2), e^(iθ/2), e^(−iθ/2))
pub fn ising_zz(theta: f64) -> Vec<Complex64> {
    let mut m = vec![ZERO; 16];
    m[0] = phase(-theta / 2.0);
    m[5] = phase(theta / 2.0);
    m[10] = phase(theta / 2.0);
    m[15] = phase(-theta / 2.0);
    m
}

/// SingleExcitation(θ): a Givens rotation between |01⟩ and |10⟩
pub fn single_excitation(theta: f64) -> Vec<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    let mut m = identity_matrix(4);
    m[1 * 4 + 1] = Complex64::new(c, 0.0);
    m[1 * 4 + 2] = Complex64::new(-s, 0.0);
    m[2 * 4 + 1] = Complex64::new(s, 0.0);
    m[2 * 4 + 2] = Complex64::new(c, 0.0);
    m
}

/// SingleExcitationMinus(θ): the Givens rotation with e^(−iθ/2) on |00⟩ and |11⟩
pub fn single_excitation_minus(theta: f64) -> Vec<Complex64> {
    let mut m = single_excitation(theta);
    m[0] = phase(-theta / 2.0);
    m[15] = phase(-theta / 2.0);
    m
}

/// SingleExcitationPlus(θ): the Givens rotation with e^(iθ/2) on |00⟩ and |11⟩
pub fn single_excitation_plus(theta: f64) -> Vec<Complex64> {
    let mut m = single_excitation(theta);
    m[0] = phase(theta / 2.0);
    m[15] = phase(theta / 2.0);
    m
}

/// DoubleExcitation(θ): a Givens rotation between |0011⟩ and |1100⟩
pub fn double_excitation(theta: f64) -> Vec<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    let mut m = identity_matrix(16);
    m[3 * 16 + 3] = Complex64::new(c, 0.0);
    m[3 * 16 + 12] = Complex64::new(-s, 0.0);
    m[12 * 16 + 3] = Complex64::new(s, 0.0);
    m[12 * 16 + 12] = Complex64::new(c, 0.0);
    m
}

/// DoubleExcitationMinus(θ): e^(−iθ/2) on the untouched basis states
pub fn double_excitation_minus(theta: f64) -> Vec<Complex64> {
    excitation_with_diagonal(double_excitation(theta), phase(-theta / 2.0))
}

/// DoubleExcitationPlus(θ): e^(iθ/2) on the untouched basis states
pub fn double_excitation_plus(theta: f64) -> Vec<Complex64> {
    excitation_with_diagonal(double_excitation(theta), phase(theta / 2.0))
}

fn excitation_with_diagonal(mut m: Vec<Complex64>, diag: Complex64) -> Vec<Complex64> {
    for idx in 0..16 {
        if idx != 3 && idx != 12 {
            m[idx * 16 + idx] = diag;
        }
    }
    m
}

/// Kronecker product of two row-major square matrices
pub fn kron(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
    let da = (a.len() as f64).sqrt() as usize;
    let db = (b.len() as f64).sqrt() as usize;
    let dim = da * db;
    let mut out = vec![ZERO; dim * dim];
    for ra in 0..da {
        for ca in 0..da {
            for rb in 0..db {
                for cb in 0..db {
                    out[(ra * db + rb) * dim + (ca * db + cb)] = a[ra * da + ca] * b[rb * db + cb];
                }
            }
        }
    }
    out
}

/// Embed a matrix in the control-set subspace: |1⟩⟨1| ⊗ m + |0⟩⟨0| ⊗ 1
fn controlled(m: &[Complex64]) -> Vec<Complex64> {
    let dm = (m.len() as f64).sqrt() as usize;
    let dim = 2 * dm;
    let mut out = identity_matrix(dim);
    for r in 0..dm {
        for c in 0..dm {
            out[(dm + r) * dim + (dm + c)] = m[r * dm + c];
        }
    }
    out
}

fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

/// Hermitian generator matrices for the parametric gate families
///
/// Gate derivatives satisfy dU/dθ = i·c·G·U, where G is the matrix produced
/// here and c the scaling coefficient held by the generator registry. These
/// are not all unitary (the phase-shift generators are projectors), so they
/// go through the general matrix-apply path rather than the gate cache.
pub mod generators {
    use super::*;

    /// |1⟩⟨1| projector, the PhaseShift generator
    pub const P11: [Complex64; 4] = [ZERO, ZERO, ZERO, ONE];

    /// X⊗X, the IsingXX generator
    pub fn ising_xx() -> Vec<Complex64> {
        kron(&PAULI_X, &PAULI_X)
    }

    /// Y⊗Y, the IsingYY generator
    pub fn ising_yy() -> Vec<Complex64> {
        kron(&PAULI_Y, &PAULI_Y)
    }

    /// Z⊗Z, the IsingZZ generator
    pub fn ising_zz() -> Vec<Complex64> {
        kron(&PAULI_Z, &PAULI_Z)
    }

    /// |1⟩⟨1| ⊗ X, the CRX generator
    pub fn crx() -> Vec<Complex64> {
        projected(&PAULI_X)
    }

    /// |1⟩⟨1| ⊗ Y, the CRY generator
    pub fn cry() -> Vec<Complex64> {
        projected(&PAULI_Y)
    }

    /// |1⟩⟨1| ⊗ Z, the CRZ generator
    pub fn crz() -> Vec<Complex64> {
        projected(&PAULI_Z)
    }

    /// |1⟩⟨1| ⊗ |1⟩⟨1|, the ControlledPhaseShift generator
    pub fn controlled_phase_shift() -> Vec<Complex64> {
        projected(&P11)
    }

    /// The SingleExcitation generator: Y on the {|01⟩, |10⟩} subspace
    pub fn single_excitation() -> Vec<Complex64> {
        let mut m = vec![ZERO; 16];
        m[1 * 4 + 2] = NEG_I;
        m[2 * 4 + 1] = I;
        m
    }

    /// SingleExcitationMinus generator: the subspace Y plus +1 on |00⟩ and |11⟩
    pub fn single_excitation_minus() -> Vec<Complex64> {
        let mut m = single_excitation();
        m[0] = ONE;
        m[15] = ONE;
        m
    }

    /// SingleExcitationPlus generator: the subspace Y plus −1 on |00⟩ and |11⟩
    pub fn single_excitation_plus() -> Vec<Complex64> {
        let mut m = single_excitation();
        m[0] = NEG_ONE;
        m[15] = NEG_ONE;
        m
    }

    /// The DoubleExcitation generator: Y on the {|0011⟩, |1100⟩} subspace
    pub fn double_excitation() -> Vec<Complex64> {
        let mut m = vec![ZERO; 256];
        m[3 * 16 + 12] = NEG_I;
        m[12 * 16 + 3] = I;
        m
    }

    /// DoubleExcitationMinus generator: +1 on every untouched basis state
    pub fn double_excitation_minus() -> Vec<Complex64> {
        excitation_generator_diagonal(ONE)
    }

    /// DoubleExcitationPlus generator: −1 on every untouched basis state
    pub fn double_excitation_plus() -> Vec<Complex64> {
        excitation_generator_diagonal(NEG_ONE)
    }

    fn excitation_generator_diagonal(diag: Complex64) -> Vec<Complex64> {
        let mut m = double_excitation();
        for idx in 0..16 {
            if idx != 3 && idx != 12 {
                m[idx * 16 + idx] = diag;
            }
        }
        m
    }

    /// Embed a generator in the |1⟩⟨1| control subspace (zero elsewhere)
    fn projected(m: &[Complex64]) -> Vec<Complex64> {
        let dm = (m.len() as f64).sqrt() as usize;
        let dim = 2 * dm;
        let mut out = vec![ZERO; dim * dim];
        for r in 0..dm {
            for c in 0..dm {
                out[(dm + r) * dim + (dm + c)] = m[r * dm + c];
            }
        }
        out
    }
}
